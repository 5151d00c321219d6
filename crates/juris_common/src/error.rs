//! Error types for the case lifecycle.

use thiserror::Error;
use uuid::Uuid;

use crate::case::CaseStatus;

/// Typed failures returned by lifecycle and assignment operations.
///
/// An empty ranking pool is NOT represented here: "no advocates available"
/// is a valid empty result, carried on `RankingOutcome` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: CaseStatus, to: CaseStatus },

    #[error("stale state: expected {expected}, case is {actual} (re-read and retry)")]
    StaleState {
        expected: CaseStatus,
        actual: CaseStatus,
    },

    #[error("case is already claimed by another advocate")]
    AlreadyClaimed,

    #[error("advocate is not verified or not accepting cases")]
    ProviderUnavailable,

    #[error("responder does not hold the pending claim on this case")]
    NotClaimant,

    #[error("case not found: {0}")]
    CaseNotFound(Uuid),

    #[error("advocate not found: {0}")]
    AdvocateNotFound(Uuid),
}

impl LifecycleError {
    /// Stable machine-readable code for wire payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::StaleState { .. } => "stale_state",
            Self::AlreadyClaimed => "already_claimed",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::NotClaimant => "not_claimant",
            Self::CaseNotFound(_) => "case_not_found",
            Self::AdvocateNotFound(_) => "advocate_not_found",
        }
    }

    /// Whether the caller should re-read current state and retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleState { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(LifecycleError::AlreadyClaimed.code(), "already_claimed");
        assert_eq!(
            LifecycleError::InvalidTransition {
                from: CaseStatus::Closed,
                to: CaseStatus::Submitted,
            }
            .code(),
            "invalid_transition"
        );
    }

    #[test]
    fn test_only_stale_state_is_retryable() {
        assert!(LifecycleError::StaleState {
            expected: CaseStatus::Assigned,
            actual: CaseStatus::InProgress,
        }
        .is_retryable());
        assert!(!LifecycleError::AlreadyClaimed.is_retryable());
        assert!(!LifecycleError::NotClaimant.is_retryable());
    }
}
