//! Keyword lexicon - versioned category and urgency keyword tables.
//!
//! The classification rules live here as data, not as code branches: the
//! classifier and urgency scorer are pure functions over a loaded lexicon,
//! testable independently of this table's content. The built-in table is
//! loaded once per process; deployments can override it with a TOML file.
//!
//! Keyword matching is lowercase substring matching, so bare terms that are
//! substrings of common English words ("rent", "sue", "deed") are deliberately
//! absent; risky terms appear only inside longer phrases.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::urgency::UrgencyLevel;

/// Version tag of the built-in lexicon
pub const BUILTIN_LEXICON_VERSION: &str = "2026.08";

/// Category assigned when no keyword matches and no hint is given
pub const DEFAULT_CATEGORY: &str = "General";

/// A keyword and its base weight within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedKeyword {
    pub term: String,
    pub weight: u32,
}

/// One legal category and its weighted keyword set.
///
/// Declaration order matters: the classifier breaks score ties in favor of
/// the earlier-declared category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    pub keywords: Vec<WeightedKeyword>,
}

/// One urgency tier and its keyword set.
///
/// Tiers are declared highest-severity first; the scorer scans them in
/// declaration order and the first tier with a match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyTier {
    pub level: UrgencyLevel,
    pub keywords: Vec<String>,
}

/// The full lexicon: category tables plus urgency tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordLexicon {
    pub version: String,
    pub categories: Vec<CategoryEntry>,
    pub urgency_tiers: Vec<UrgencyTier>,
}

static BUILTIN: Lazy<KeywordLexicon> = Lazy::new(KeywordLexicon::builtin_table);

impl KeywordLexicon {
    /// The built-in lexicon, constructed once per process lifetime
    pub fn builtin() -> &'static KeywordLexicon {
        &BUILTIN
    }

    /// Load a lexicon override from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon file {}", path.display()))?;
        let lexicon: KeywordLexicon = toml::from_str(&content)
            .with_context(|| format!("failed to parse lexicon file {}", path.display()))?;
        Ok(lexicon)
    }

    /// Look up a category entry by name, case-insensitively
    pub fn category(&self, name: &str) -> Option<&CategoryEntry> {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn builtin_table() -> Self {
        fn cat(name: &str, keywords: &[(&str, u32)]) -> CategoryEntry {
            CategoryEntry {
                name: name.to_string(),
                keywords: keywords
                    .iter()
                    .map(|(term, weight)| WeightedKeyword {
                        term: term.to_string(),
                        weight: *weight,
                    })
                    .collect(),
            }
        }

        fn tier(level: UrgencyLevel, keywords: &[&str]) -> UrgencyTier {
            UrgencyTier {
                level,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            }
        }

        KeywordLexicon {
            version: BUILTIN_LEXICON_VERSION.to_string(),
            categories: vec![
                cat(
                    "Family Law",
                    &[
                        ("divorce", 3),
                        ("custody", 3),
                        ("child support", 4),
                        ("alimony", 3),
                        ("adoption", 3),
                        ("marriage", 2),
                        ("domestic violence", 4),
                        ("prenuptial", 3),
                    ],
                ),
                cat(
                    "Criminal Defense",
                    &[
                        ("arrest", 3),
                        ("criminal charge", 4),
                        ("bail", 3),
                        ("felony", 3),
                        ("misdemeanor", 3),
                        ("warrant", 3),
                        ("police custody", 4),
                        ("assault", 3),
                        ("theft", 2),
                    ],
                ),
                cat(
                    "Property Law",
                    &[
                        ("eviction", 3),
                        ("eviction notice", 4),
                        ("landlord", 3),
                        ("tenant", 3),
                        ("foreclosure", 4),
                        ("property", 2),
                        ("real estate", 3),
                        ("zoning", 3),
                        ("title deed", 3),
                        ("boundary dispute", 4),
                    ],
                ),
                cat(
                    "Employment Law",
                    &[
                        ("wrongful termination", 4),
                        ("fired", 2),
                        ("workplace", 2),
                        ("discrimination", 3),
                        ("harassment", 3),
                        ("severance", 3),
                        ("unpaid wages", 4),
                        ("overtime", 2),
                    ],
                ),
                cat(
                    "Corporate Law",
                    &[
                        ("contract", 2),
                        ("breach of contract", 4),
                        ("shareholder", 3),
                        ("merger", 3),
                        ("incorporation", 3),
                        ("partnership", 2),
                        ("trademark", 3),
                        ("intellectual property", 4),
                    ],
                ),
                cat(
                    "Consumer Protection",
                    &[
                        ("refund", 2),
                        ("defective", 3),
                        ("warranty", 3),
                        ("scam", 3),
                        ("fraud", 3),
                        ("debt collector", 4),
                        ("false advertising", 4),
                    ],
                ),
                cat(
                    "Immigration",
                    &[
                        ("visa", 3),
                        ("deportation", 4),
                        ("green card", 4),
                        ("citizenship", 3),
                        ("asylum", 3),
                        ("immigration", 3),
                        ("work permit", 3),
                    ],
                ),
                cat(
                    "Personal Injury",
                    &[
                        ("accident", 2),
                        ("injury", 3),
                        ("negligence", 3),
                        ("medical malpractice", 4),
                        ("slip and fall", 4),
                        ("insurance claim", 3),
                        ("compensation", 2),
                    ],
                ),
                cat(
                    "Civil Litigation",
                    &[
                        ("lawsuit", 3),
                        ("small claims", 4),
                        ("defamation", 3),
                        ("damages", 2),
                        ("settlement", 2),
                        ("court order", 3),
                    ],
                ),
            ],
            urgency_tiers: vec![
                tier(
                    UrgencyLevel::Critical,
                    &[
                        "immediately",
                        "urgent",
                        "emergency",
                        "right now",
                        "tonight",
                        "arrest",
                        "arrested",
                        "detained",
                        "life threatening",
                        "danger",
                        "deadline today",
                        "court tomorrow",
                    ],
                ),
                tier(
                    UrgencyLevel::High,
                    &[
                        "eviction notice",
                        "court date",
                        "summons",
                        "subpoena",
                        "deadline",
                        "this week",
                        "threatened",
                        "harassment",
                        "restraining order",
                    ],
                ),
                tier(
                    UrgencyLevel::Medium,
                    &[
                        "soon",
                        "dispute",
                        "disagreement",
                        "concerned",
                        "next month",
                        "ongoing",
                    ],
                ),
                tier(
                    UrgencyLevel::Low,
                    &[
                        "general question",
                        "curious",
                        "advice",
                        "someday",
                        "eventually",
                        "planning ahead",
                        "no rush",
                    ],
                ),
            ],
        }
    }
}
