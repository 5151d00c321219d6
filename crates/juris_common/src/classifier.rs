//! Case classifier - deterministic keyword scoring over the lexicon.
//!
//! For every known category the classifier sums the weights of lexicon
//! keywords found as substrings of the lowercased input, with longer terms
//! contributing proportionally more (specificity). The highest-scoring
//! category wins; ties fall to lexicon declaration order. A manually chosen
//! category hint wins unless a keyword category strictly out-scores it.
//!
//! This is a total function: empty or garbage text degrades to the default
//! category at the confidence floor, never an error. Case submission is
//! never blocked by analysis.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexicon::{CategoryEntry, KeywordLexicon, DEFAULT_CATEGORY};

/// Confidence floor / formula base
const CONFIDENCE_BASE: u32 = 60;

/// Confidence ceiling
const CONFIDENCE_CAP: u32 = 95;

/// Term length divisor for the specificity factor
const SPECIFICITY_DIVISOR: usize = 12;

/// Optional client-supplied hints accompanying a submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeHints {
    /// Manually chosen category; overrides weak keyword inference
    pub category: Option<String>,
    /// Free-text location; carried onto the case, not used for scoring
    pub location: Option<String>,
}

/// Result of classifying a case's free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    /// 0-100; low values mark a degraded best-effort result
    pub confidence: u8,
    /// Raw keyword score behind the confidence
    pub score: u32,
    /// Lexicon terms found in the text, in lexicon order
    pub matched_keywords: Vec<String>,
}

/// Classify free text into a legal category.
///
/// Deterministic: the same (text, hints) pair always yields the same result.
pub fn classify(text: &str, hints: &IntakeHints, lexicon: &KeywordLexicon) -> Classification {
    let haystack = text.to_lowercase();

    let mut best: Option<(&CategoryEntry, u32, Vec<String>)> = None;
    for entry in &lexicon.categories {
        let (score, matched) = score_category(&haystack, entry);
        // Strictly-greater keeps the earliest declared category on ties
        if score > 0 && best.as_ref().map_or(true, |(_, s, _)| score > *s) {
            best = Some((entry, score, matched));
        }
    }

    if let Some(hint) = hints.category.as_deref() {
        let (hint_name, hint_score, hint_matched) = match lexicon.category(hint) {
            Some(entry) => {
                let (score, matched) = score_category(&haystack, entry);
                (entry.name.clone(), score, matched)
            }
            // Unknown categories are allowed; the client chose them on purpose
            None => (hint.to_string(), 0, Vec::new()),
        };

        // The hint wins unless a keyword category strictly out-scores it
        let beaten = best
            .as_ref()
            .map_or(false, |(entry, score, _)| *score > hint_score && entry.name != hint_name);
        if !beaten {
            return Classification {
                category: hint_name,
                confidence: confidence_for(hint_score),
                score: hint_score,
                matched_keywords: hint_matched,
            };
        }
    }

    match best {
        Some((entry, score, matched)) => {
            debug!(
                category = %entry.name,
                score,
                matches = matched.len(),
                "classified case text"
            );
            Classification {
                category: entry.name.clone(),
                confidence: confidence_for(score),
                score,
                matched_keywords: matched,
            }
        }
        None => Classification {
            category: DEFAULT_CATEGORY.to_string(),
            confidence: confidence_for(0),
            score: 0,
            matched_keywords: Vec::new(),
        },
    }
}

fn score_category(haystack: &str, entry: &CategoryEntry) -> (u32, Vec<String>) {
    let mut score = 0u32;
    let mut matched = Vec::new();
    for kw in &entry.keywords {
        if haystack.contains(kw.term.as_str()) {
            let specificity = 1 + (kw.term.len() / SPECIFICITY_DIVISOR) as u32;
            score += kw.weight * specificity;
            matched.push(kw.term.clone());
        }
    }
    (score, matched)
}

fn confidence_for(score: u32) -> u8 {
    (CONFIDENCE_BASE + 2 * score).min(CONFIDENCE_CAP) as u8
}
