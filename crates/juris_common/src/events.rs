//! Lifecycle events - fire-and-forget payloads for the notification collaborator.
//!
//! One event is emitted per successful lifecycle transition. Delivery
//! (push/email) lives outside this core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::case::CaseStatus;

/// Kind of lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEventKind {
    CaseSubmitted,
    AssignmentRequested,
    AssignmentAccepted,
    AssignmentRejected,
    StatusChanged,
    CaseCompleted,
    CaseWithdrawn,
}

/// Notification payload: (recipient, type, message, related case)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub recipient_id: Uuid,
    pub kind: LifecycleEventKind,
    pub message: String,
    pub case_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl LifecycleEvent {
    pub fn new(recipient_id: Uuid, kind: LifecycleEventKind, message: String, case_id: Uuid) -> Self {
        Self {
            recipient_id,
            kind,
            message,
            case_id,
            timestamp: Utc::now(),
        }
    }

    pub fn case_submitted(client_id: Uuid, case_id: Uuid, category: &str) -> Self {
        Self::new(
            client_id,
            LifecycleEventKind::CaseSubmitted,
            format!("Your case was submitted and classified as {category}"),
            case_id,
        )
    }

    pub fn assignment_requested(advocate_id: Uuid, case_id: Uuid, title: &str) -> Self {
        Self::new(
            advocate_id,
            LifecycleEventKind::AssignmentRequested,
            format!("You have been requested for the case \"{title}\""),
            case_id,
        )
    }

    pub fn assignment_accepted(client_id: Uuid, case_id: Uuid) -> Self {
        Self::new(
            client_id,
            LifecycleEventKind::AssignmentAccepted,
            "An advocate accepted your case".to_string(),
            case_id,
        )
    }

    pub fn assignment_rejected(client_id: Uuid, case_id: Uuid) -> Self {
        Self::new(
            client_id,
            LifecycleEventKind::AssignmentRejected,
            "The requested advocate declined; your case is back in the pool".to_string(),
            case_id,
        )
    }

    pub fn status_changed(recipient_id: Uuid, case_id: Uuid, to: CaseStatus) -> Self {
        let kind = match to {
            CaseStatus::Resolved | CaseStatus::Completed => LifecycleEventKind::CaseCompleted,
            CaseStatus::Withdrawn => LifecycleEventKind::CaseWithdrawn,
            _ => LifecycleEventKind::StatusChanged,
        };
        Self::new(
            recipient_id,
            kind,
            format!("Case status changed to {to}: {}", to.description()),
            case_id,
        )
    }
}
