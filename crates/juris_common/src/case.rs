//! Case model - status state machine, immutable timeline, transition validation.
//!
//! All status knowledge lives in one place: `CaseStatus::can_transition_to`
//! is the single transition table, and `check_transition` is the single
//! validator every write path goes through. Illegal transitions are a
//! centrally-enforced concern, not scattered string comparisons.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::Classification;
use crate::error::LifecycleError;
use crate::urgency::{UrgencyAssessment, UrgencyLevel};

/// Status of a case through its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Submitted,
    Analyzing,
    PendingAdvocate,
    PendingAcceptance,
    Assigned,
    InProgress,
    Resolved,
    Completed,
    Closed,
    Withdrawn,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Analyzing => "analyzing",
            Self::PendingAdvocate => "pending_advocate",
            Self::PendingAcceptance => "pending_acceptance",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Completed => "completed",
            Self::Closed => "closed",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Withdrawn)
    }

    /// States in which an advocate actively holds the case
    pub fn has_active_work(&self) -> bool {
        matches!(self, Self::PendingAcceptance | Self::Assigned | Self::InProgress)
    }

    /// The single transition table for the case lifecycle.
    ///
    /// Withdrawn is reachable from every non-terminal state. The assignment
    /// states (pending_acceptance, assigned) appear here so the claim
    /// operations validate through the same table as everything else.
    pub fn can_transition_to(&self, to: CaseStatus) -> bool {
        use CaseStatus::*;
        if self.is_terminal() {
            return false;
        }
        if to == Withdrawn {
            return true;
        }
        match self {
            Submitted => matches!(to, Analyzing | PendingAdvocate | PendingAcceptance),
            Analyzing => matches!(to, PendingAdvocate),
            PendingAdvocate => matches!(to, PendingAcceptance),
            PendingAcceptance => matches!(to, Assigned | PendingAdvocate),
            Assigned => matches!(to, InProgress | Resolved | Completed),
            InProgress => matches!(to, Resolved | Completed),
            Resolved => matches!(to, Closed),
            Completed => matches!(to, Closed),
            Closed | Withdrawn => false,
        }
    }

    /// Human-readable description for timelines and notifications
    pub fn description(&self) -> &'static str {
        match self {
            Self::Submitted => "Case submitted",
            Self::Analyzing => "Analyzing case details",
            Self::PendingAdvocate => "Waiting for an advocate",
            Self::PendingAcceptance => "Waiting for advocate acceptance",
            Self::Assigned => "Advocate assigned",
            Self::InProgress => "Work in progress",
            Self::Resolved => "Case resolved",
            Self::Completed => "Case completed",
            Self::Closed => "Case closed",
            Self::Withdrawn => "Case withdrawn",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable audit record embedded in a case.
///
/// Appended atomically with the status change it documents; never edited or
/// removed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub event: String,
    pub description: String,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
}

/// A legal matter submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    // Derived at creation by the classifier and urgency scorer
    pub category: String,
    pub confidence: u8,
    pub urgency_level: UrgencyLevel,
    pub urgency_score: u8,

    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advocate_id: Option<Uuid>,
    pub timeline: Vec<TimelineEntry>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// Create a freshly submitted case from intake analysis results
    pub fn new(
        client_id: Uuid,
        title: String,
        description: String,
        location: Option<String>,
        classification: &Classification,
        urgency: &UrgencyAssessment,
    ) -> Self {
        let now = Utc::now();
        let mut case = Self {
            id: Uuid::new_v4(),
            client_id,
            title,
            description,
            location,
            category: classification.category.clone(),
            confidence: classification.confidence,
            urgency_level: urgency.level,
            urgency_score: urgency.score,
            status: CaseStatus::Submitted,
            advocate_id: None,
            timeline: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        case.record_event(
            "case_opened",
            "client",
            format!(
                "Case opened as {} ({} urgency)",
                case.category, case.urgency_level
            ),
        );
        case
    }

    /// Append an immutable timeline entry and touch `updated_at`
    pub fn record_event(&mut self, event: &str, actor: &str, description: String) {
        let now = Utc::now();
        self.timeline.push(TimelineEntry {
            event: event.to_string(),
            description,
            actor: actor.to_string(),
            timestamp: now,
        });
        self.updated_at = now;
    }

    /// Whether an advocate currently holds a non-terminal claim on this case
    pub fn has_active_claim(&self) -> bool {
        self.advocate_id.is_some() && self.status.has_active_work()
    }

    /// Seconds since the last recorded transition, the observable staleness
    /// duration external collaborators act on (expiry is just another
    /// transition call)
    pub fn seconds_since_last_event(&self, now: DateTime<Utc>) -> i64 {
        let last = self
            .timeline
            .last()
            .map(|e| e.timestamp)
            .unwrap_or(self.created_at);
        (now - last).num_seconds()
    }
}

/// Outcome of validating a requested transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCheck {
    /// The transition is legal and not yet applied
    Apply,
    /// The exact transition already succeeded; retrying is a no-op success
    AlreadyApplied,
}

/// Validate a requested status transition against the persisted status.
///
/// The `from_expected` comparison is the optimistic-concurrency guard: two
/// callers racing to transition the same case see exactly one `Apply`; the
/// loser gets `StaleState` and must re-read. A retry of a transition that
/// already landed (current == to, and from_expected -> to is a legal edge)
/// reports `AlreadyApplied` so at-least-once callers do not duplicate
/// timeline entries.
pub fn check_transition(
    current: CaseStatus,
    from_expected: CaseStatus,
    to: CaseStatus,
) -> Result<TransitionCheck, LifecycleError> {
    if current == to && from_expected != to && from_expected.can_transition_to(to) {
        return Ok(TransitionCheck::AlreadyApplied);
    }
    if current != from_expected {
        return Err(LifecycleError::StaleState {
            expected: from_expected,
            actual: current,
        });
    }
    if !current.can_transition_to(to) {
        return Err(LifecycleError::InvalidTransition { from: current, to });
    }
    Ok(TransitionCheck::Apply)
}
