//! Urgency scorer - tiered keyword detection with critical-first precedence.
//!
//! Four ordered tiers (critical, high, medium, low), each with its own
//! keyword set and score band. The first tier with any match wins, so a text
//! containing both a low-urgency and a critical-urgency term is flagged
//! critical. Ambiguous texts default to medium rather than low: under-flagging
//! urgency costs more than over-flagging it.

use serde::{Deserialize, Serialize};

use crate::lexicon::KeywordLexicon;

/// Score added per matched keyword beyond the first, within the tier band
const EXTRA_MATCH_STEP: u8 = 3;

/// In-band bump for criminal matters (arrests and charges rarely wait)
const CRIMINAL_CATEGORY_BUMP: u8 = 2;

/// Urgency tier of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Inclusive (min, max) score band for this tier
    pub fn score_band(&self) -> (u8, u8) {
        match self {
            Self::Critical => (90, 99),
            Self::High => (70, 84),
            Self::Medium => (45, 64),
            Self::Low => (20, 34),
        }
    }

    /// Deterministic midpoint of the band, used when no tier keyword matches
    pub fn band_midpoint(&self) -> u8 {
        let (min, max) = self.score_band();
        (min + max) / 2
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of urgency detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyAssessment {
    pub level: UrgencyLevel,
    /// 0-100, inside the winning tier's band
    pub score: u8,
    /// Tier keywords found in the text, in lexicon order
    pub matched_keywords: Vec<String>,
}

/// Detect the urgency of a case from its free text.
///
/// Pure function of (text, category): no side effects, no randomness.
/// Never fails - an empty or unmatched text yields the medium midpoint.
pub fn detect_urgency(text: &str, category: &str, lexicon: &KeywordLexicon) -> UrgencyAssessment {
    let haystack = text.to_lowercase();

    // Tiers are declared critical-first; the first tier with a match wins
    for tier in &lexicon.urgency_tiers {
        let matched: Vec<String> = tier
            .keywords
            .iter()
            .filter(|kw| haystack.contains(kw.as_str()))
            .cloned()
            .collect();

        if matched.is_empty() {
            continue;
        }

        let (min, max) = tier.level.score_band();
        let extra = (matched.len() as u8 - 1).saturating_mul(EXTRA_MATCH_STEP);
        let mut score = min.saturating_add(extra).min(max);
        if category == "Criminal Defense" {
            score = score.saturating_add(CRIMINAL_CATEGORY_BUMP).min(max);
        }

        return UrgencyAssessment {
            level: tier.level,
            score,
            matched_keywords: matched,
        };
    }

    UrgencyAssessment {
        level: UrgencyLevel::Medium,
        score: UrgencyLevel::Medium.band_midpoint(),
        matched_keywords: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> &'static KeywordLexicon {
        KeywordLexicon::builtin()
    }

    #[test]
    fn test_critical_keyword_wins() {
        let result = detect_urgency("I need help immediately", "General", lexicon());
        assert_eq!(result.level, UrgencyLevel::Critical);
        let (min, max) = UrgencyLevel::Critical.score_band();
        assert!(result.score >= min && result.score <= max);
    }

    #[test]
    fn test_tier_precedence_critical_beats_low() {
        // "general question" is a low-tier term, "emergency" is critical
        let result = detect_urgency(
            "a general question about an emergency at my workplace",
            "General",
            lexicon(),
        );
        assert_eq!(result.level, UrgencyLevel::Critical);
    }

    #[test]
    fn test_high_tier_eviction_notice() {
        let result = detect_urgency("received an eviction notice", "Property Law", lexicon());
        assert_eq!(result.level, UrgencyLevel::High);
    }

    #[test]
    fn test_unmatched_defaults_to_medium_midpoint() {
        let result = detect_urgency("lorem ipsum dolor sit amet", "General", lexicon());
        assert_eq!(result.level, UrgencyLevel::Medium);
        assert_eq!(result.score, UrgencyLevel::Medium.band_midpoint());
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_empty_text_defaults_to_medium() {
        let result = detect_urgency("", "General", lexicon());
        assert_eq!(result.level, UrgencyLevel::Medium);
        assert_eq!(result.score, 54);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let text = "urgent court date next week, feeling threatened";
        let first = detect_urgency(text, "Family Law", lexicon());
        for _ in 0..10 {
            assert_eq!(detect_urgency(text, "Family Law", lexicon()), first);
        }
    }

    #[test]
    fn test_more_matches_score_higher_within_band() {
        let one = detect_urgency("this is urgent", "General", lexicon());
        let two = detect_urgency("this is an urgent emergency", "General", lexicon());
        assert_eq!(one.level, UrgencyLevel::Critical);
        assert_eq!(two.level, UrgencyLevel::Critical);
        assert!(two.score > one.score);
        assert!(two.score <= UrgencyLevel::Critical.score_band().1);
    }

    #[test]
    fn test_criminal_category_bump_stays_in_band() {
        let base = detect_urgency("I was arrested", "General", lexicon());
        let bumped = detect_urgency("I was arrested", "Criminal Defense", lexicon());
        assert_eq!(base.level, UrgencyLevel::Critical);
        assert_eq!(bumped.level, UrgencyLevel::Critical);
        assert!(bumped.score >= base.score);
        assert!(bumped.score <= UrgencyLevel::Critical.score_band().1);
    }

    #[test]
    fn test_score_bands_do_not_overlap() {
        let tiers = [
            UrgencyLevel::Low,
            UrgencyLevel::Medium,
            UrgencyLevel::High,
            UrgencyLevel::Critical,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[0].score_band().1 < pair[1].score_band().0);
        }
    }
}
