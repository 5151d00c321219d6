//! Advocate profile - a verified legal-service professional.
//!
//! The workload counters on this record are mutated only through the
//! workload ledger, never directly by client-facing operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A legal-service provider in the matching pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advocate {
    pub id: Uuid,
    /// Owning user in the identity system (external collaborator)
    pub user_id: Uuid,
    /// Category tags this advocate specializes in
    pub specializations: Vec<String>,
    pub years_experience: u32,
    /// 0.0 - 5.0
    pub rating: f32,
    /// 0 - 100 percent
    pub success_rate: f32,
    pub accepting_cases: bool,
    pub verified: bool,
    /// Count of cases currently held in an active status; never negative
    pub current_case_load: u32,
    pub total_cases: u32,
}

impl Advocate {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            specializations: Vec::new(),
            years_experience: 0,
            rating: 0.0,
            success_rate: 0.0,
            accepting_cases: false,
            verified: false,
            current_case_load: 0,
            total_cases: 0,
        }
    }

    /// Eligible to receive assignment requests
    pub fn is_available(&self) -> bool {
        self.verified && self.accepting_cases
    }

    /// Whether this advocate's specializations cover the given category
    pub fn specializes_in(&self, category: &str) -> bool {
        self.specializations
            .iter()
            .any(|s| s.eq_ignore_ascii_case(category))
    }
}
