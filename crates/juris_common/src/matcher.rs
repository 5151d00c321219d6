//! Match ranker - ordered advocate recommendations for a case.
//!
//! Simple, explainable, additive scoring: round((rating x 10 + success
//! rate) / 2), plus a flat bonus when the advocate specializes in the case's
//! category. The multi-key sort makes identical inputs produce identical,
//! reproducible rankings. Recommendations are ephemeral projections and are
//! produced fresh on every call; advocate state may have changed since the
//! last one.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::case::Case;
use crate::provider::Advocate;

/// Maximum recommendations returned per ranking
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Flat score bonus for specialization overlap with the case category
pub const SPECIALIZATION_BONUS: u32 = 10;

/// A single ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub advocate_id: Uuid,
    /// 0-100
    pub match_score: u32,
    /// Ranked human-readable reasons behind the score
    pub reasons: Vec<String>,
}

/// Result of ranking a candidate pool against a case.
///
/// An empty eligible pool is a valid result, not a failure; it carries a
/// descriptive note instead of an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub recommendations: Vec<Recommendation>,
    /// Size of the pool after the verified/accepting filter
    pub eligible_pool: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RankingOutcome {
    pub fn no_providers_available(&self) -> bool {
        self.eligible_pool == 0
    }
}

/// Rank a candidate pool of advocates against a case.
///
/// Deterministic: descending match score, ties broken by experience desc,
/// rating desc, advocate id asc.
pub fn rank(case: &Case, pool: &[Advocate]) -> RankingOutcome {
    let mut scored: Vec<(Recommendation, u32, f32)> = pool
        .iter()
        .filter(|a| a.is_available())
        .map(|a| {
            let (score, reasons) = score_advocate(a, &case.category);
            (
                Recommendation {
                    advocate_id: a.id,
                    match_score: score,
                    reasons,
                },
                a.years_experience,
                a.rating,
            )
        })
        .collect();

    let eligible_pool = scored.len();

    scored.sort_by(|(a, a_years, a_rating), (b, b_years, b_rating)| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| b_years.cmp(a_years))
            .then_with(|| b_rating.partial_cmp(a_rating).unwrap_or(Ordering::Equal))
            .then_with(|| a.advocate_id.cmp(&b.advocate_id))
    });

    let recommendations: Vec<Recommendation> = scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(rec, _, _)| rec)
        .collect();

    let note = if eligible_pool == 0 {
        Some("no advocates are currently available for this case".to_string())
    } else {
        None
    };

    RankingOutcome {
        recommendations,
        eligible_pool,
        note,
    }
}

fn score_advocate(advocate: &Advocate, category: &str) -> (u32, Vec<String>) {
    let base = ((advocate.rating as f64 * 10.0 + advocate.success_rate as f64) / 2.0).round() as u32;
    let mut reasons = vec![
        format!("rated {:.1}/5", advocate.rating),
        format!("{:.0}% success rate", advocate.success_rate),
    ];

    let mut score = base;
    if advocate.specializes_in(category) {
        score += SPECIALIZATION_BONUS;
        reasons.push(format!("specializes in {category}"));
    }
    if advocate.years_experience > 0 {
        reasons.push(format!(
            "{} years of experience",
            advocate.years_experience
        ));
    }

    (score.min(100), reasons)
}
