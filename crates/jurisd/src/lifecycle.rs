//! Lifecycle engine - drives cases through the state machine.
//!
//! Only this engine writes case status or advocate counters. Every write is
//! a version-checked compare-and-update against the store, so concurrent
//! transitions on the same case are linearized: exactly one caller wins, the
//! rest observe a typed conflict and re-read. Transitions on different cases
//! never contend.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use juris_common::{
    check_transition, classify, detect_urgency, Advocate, Case, CaseStatus, Classification,
    IntakeHints, KeywordLexicon, LifecycleError, LifecycleEvent, RankingOutcome, TransitionCheck,
};

use crate::ledger::WorkloadLedger;
use crate::notifier::Notifier;
use crate::store::{AdvocateStore, CaseStore, StoreError};

/// Claim-write retry bound; each retry re-reads, so contention converges to
/// AlreadyClaimed or a state error within a couple of rounds
const MAX_CLAIM_ATTEMPTS: usize = 5;

/// Terminal-ish outcome of finished work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    Resolved,
    Completed,
}

impl CaseOutcome {
    pub fn status(self) -> CaseStatus {
        match self {
            Self::Resolved => CaseStatus::Resolved,
            Self::Completed => CaseStatus::Completed,
        }
    }
}

/// Everything a successful submission returns
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub case: Case,
    pub classification: Classification,
    pub urgency: juris_common::UrgencyAssessment,
}

pub struct LifecycleEngine {
    cases: Arc<CaseStore>,
    advocates: Arc<AdvocateStore>,
    ledger: Arc<WorkloadLedger>,
    lexicon: Arc<KeywordLexicon>,
    notifier: Arc<dyn Notifier>,
}

impl LifecycleEngine {
    pub fn new(
        cases: Arc<CaseStore>,
        advocates: Arc<AdvocateStore>,
        ledger: Arc<WorkloadLedger>,
        lexicon: Arc<KeywordLexicon>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cases,
            advocates,
            ledger,
            lexicon,
            notifier,
        }
    }

    pub fn ledger(&self) -> &WorkloadLedger {
        &self.ledger
    }

    /// Submit a new case: classify, score urgency, persist, notify.
    ///
    /// Analysis is best-effort enrichment and cannot fail, so submission
    /// always succeeds; a degraded result surfaces as low confidence, not as
    /// an error.
    pub async fn submit(
        &self,
        client_id: Uuid,
        title: String,
        description: String,
        hints: IntakeHints,
    ) -> SubmissionOutcome {
        // Title and description together are the analysis input
        let text = format!("{title} {description}");
        let classification = classify(&text, &hints, &self.lexicon);
        let urgency = detect_urgency(&text, &classification.category, &self.lexicon);

        let case = Case::new(
            client_id,
            title,
            description,
            hints.location,
            &classification,
            &urgency,
        );
        info!(
            case = %case.id,
            category = %case.category,
            urgency = %case.urgency_level,
            "case submitted"
        );

        self.cases.insert(case.clone()).await;
        self.notifier.notify(LifecycleEvent::case_submitted(
            client_id,
            case.id,
            &case.category,
        ));

        SubmissionOutcome {
            case,
            classification,
            urgency,
        }
    }

    pub async fn get_case(&self, case_id: Uuid) -> Result<Case, LifecycleError> {
        Ok(self.read_case(case_id).await?.0)
    }

    /// Apply a generic status transition.
    ///
    /// The assignment statuses are refused here: pending_acceptance and
    /// assigned are only reachable through the claim operations, otherwise
    /// the single-claim invariant could be bypassed by a status update.
    pub async fn transition(
        &self,
        case_id: Uuid,
        from_expected: CaseStatus,
        to: CaseStatus,
        actor: &str,
        note: Option<String>,
    ) -> Result<Case, LifecycleError> {
        let (case, version) = self.read_case(case_id).await?;

        if matches!(to, CaseStatus::PendingAcceptance | CaseStatus::Assigned) {
            return Err(LifecycleError::InvalidTransition {
                from: case.status,
                to,
            });
        }

        match check_transition(case.status, from_expected, to)? {
            TransitionCheck::AlreadyApplied => return Ok(case),
            TransitionCheck::Apply => {}
        }

        let previous = case.status;
        let holder = case.advocate_id;
        let client_id = case.client_id;

        let mut updated = case;
        updated.status = to;
        let description = note.unwrap_or_else(|| to.description().to_string());
        updated.record_event("status_changed", actor, description);

        match self
            .cases
            .compare_and_update(case_id, version, updated.clone())
            .await
        {
            Ok(_) => {}
            Err(StoreError::VersionConflict { .. }) => {
                // Lost the race. Re-read: a retry that already landed is a
                // no-op success, anything else is a stale caller.
                let (current, _) = self.read_case(case_id).await?;
                return match check_transition(current.status, from_expected, to) {
                    Ok(TransitionCheck::AlreadyApplied) => Ok(current),
                    Ok(TransitionCheck::Apply) => Err(LifecycleError::StaleState {
                        expected: from_expected,
                        actual: current.status,
                    }),
                    Err(err) => Err(err),
                };
            }
            Err(StoreError::NotFound(id)) => return Err(LifecycleError::CaseNotFound(id)),
        }

        info!(case = %case_id, from = %previous, to = %to, actor, "case transitioned");
        self.apply_ledger_effects(previous, to, holder).await;

        self.notifier
            .notify(LifecycleEvent::status_changed(client_id, case_id, to));
        if to == CaseStatus::Withdrawn {
            if let Some(advocate_id) = holder {
                if previous.has_active_work() {
                    self.notifier.notify(LifecycleEvent::status_changed(
                        advocate_id,
                        case_id,
                        to,
                    ));
                }
            }
        }

        Ok(updated)
    }

    /// Client requests a specific advocate for the case.
    ///
    /// Legal only while the case has no active claim; the CAS loop means two
    /// concurrent requests resolve to exactly one pending claim and one
    /// AlreadyClaimed.
    pub async fn request_assignment(
        &self,
        case_id: Uuid,
        advocate_id: Uuid,
        actor: &str,
    ) -> Result<Case, LifecycleError> {
        let mut last_seen = None;

        for _ in 0..MAX_CLAIM_ATTEMPTS {
            let (case, version) = self.read_case(case_id).await?;
            last_seen = Some(case.status);

            if case.has_active_claim() {
                if case.advocate_id == Some(advocate_id)
                    && case.status == CaseStatus::PendingAcceptance
                {
                    // Retried request for the claim we already hold
                    return Ok(case);
                }
                return Err(LifecycleError::AlreadyClaimed);
            }

            if !matches!(
                case.status,
                CaseStatus::Submitted | CaseStatus::PendingAdvocate
            ) {
                return Err(LifecycleError::InvalidTransition {
                    from: case.status,
                    to: CaseStatus::PendingAcceptance,
                });
            }

            let advocate = self
                .advocates
                .get(advocate_id)
                .await
                .map_err(|_| LifecycleError::AdvocateNotFound(advocate_id))?;
            if !advocate.is_available() {
                return Err(LifecycleError::ProviderUnavailable);
            }

            let title = case.title.clone();
            let mut updated = case;
            updated.advocate_id = Some(advocate_id);
            updated.status = CaseStatus::PendingAcceptance;
            updated.record_event(
                "assignment_requested",
                actor,
                format!("Assignment requested from advocate {advocate_id}"),
            );

            match self
                .cases
                .compare_and_update(case_id, version, updated.clone())
                .await
            {
                Ok(_) => {
                    info!(case = %case_id, advocate = %advocate_id, "assignment requested");
                    self.notifier.notify(LifecycleEvent::assignment_requested(
                        advocate_id,
                        case_id,
                        &title,
                    ));
                    return Ok(updated);
                }
                // Someone wrote first; re-read and re-evaluate the claim
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(StoreError::NotFound(id)) => return Err(LifecycleError::CaseNotFound(id)),
            }
        }

        let (current, _) = self.read_case(case_id).await?;
        Err(LifecycleError::StaleState {
            expected: last_seen.unwrap_or(current.status),
            actual: current.status,
        })
    }

    /// The requested advocate accepts or rejects the pending claim
    pub async fn respond_to_assignment(
        &self,
        case_id: Uuid,
        advocate_id: Uuid,
        accept: bool,
    ) -> Result<Case, LifecycleError> {
        let (case, version) = self.read_case(case_id).await?;
        let target = if accept {
            CaseStatus::Assigned
        } else {
            CaseStatus::PendingAdvocate
        };

        if case.status != CaseStatus::PendingAcceptance {
            if accept
                && case.status == CaseStatus::Assigned
                && case.advocate_id == Some(advocate_id)
            {
                // Retried accept that already landed
                return Ok(case);
            }
            return Err(LifecycleError::InvalidTransition {
                from: case.status,
                to: target,
            });
        }
        if case.advocate_id != Some(advocate_id) {
            return Err(LifecycleError::NotClaimant);
        }

        let client_id = case.client_id;
        let mut updated = case;
        if accept {
            updated.status = CaseStatus::Assigned;
            updated.record_event(
                "assignment_accepted",
                "advocate",
                format!("Advocate {advocate_id} accepted the case"),
            );
        } else {
            updated.status = CaseStatus::PendingAdvocate;
            updated.advocate_id = None;
            updated.record_event(
                "assignment_rejected",
                "advocate",
                format!("Advocate {advocate_id} declined the case"),
            );
        }

        match self
            .cases
            .compare_and_update(case_id, version, updated.clone())
            .await
        {
            Ok(_) => {}
            Err(StoreError::VersionConflict { .. }) => {
                let (current, _) = self.read_case(case_id).await?;
                if accept
                    && current.status == CaseStatus::Assigned
                    && current.advocate_id == Some(advocate_id)
                {
                    return Ok(current);
                }
                return Err(LifecycleError::StaleState {
                    expected: CaseStatus::PendingAcceptance,
                    actual: current.status,
                });
            }
            Err(StoreError::NotFound(id)) => return Err(LifecycleError::CaseNotFound(id)),
        }

        if accept {
            self.ledger.increment_load(advocate_id).await;
            info!(case = %case_id, advocate = %advocate_id, "assignment accepted");
            self.notifier
                .notify(LifecycleEvent::assignment_accepted(client_id, case_id));
        } else {
            info!(case = %case_id, advocate = %advocate_id, "assignment rejected");
            self.notifier
                .notify(LifecycleEvent::assignment_rejected(client_id, case_id));
        }

        Ok(updated)
    }

    /// Finish the case with an outcome; legal only from assigned/in_progress
    pub async fn complete(
        &self,
        case_id: Uuid,
        from_expected: CaseStatus,
        outcome: CaseOutcome,
        actor: &str,
        note: Option<String>,
    ) -> Result<Case, LifecycleError> {
        self.transition(case_id, from_expected, outcome.status(), actor, note)
            .await
    }

    /// Rank the live advocate pool against the case. Produced fresh on every
    /// call; never cached, because advocate state may have changed.
    pub async fn recommendations(&self, case_id: Uuid) -> Result<RankingOutcome, LifecycleError> {
        let (case, _) = self.read_case(case_id).await?;
        let pool = self.advocate_pool().await;
        Ok(juris_common::rank(&case, &pool))
    }

    /// Advocate profile with live workload counters merged in
    pub async fn advocate_view(&self, advocate_id: Uuid) -> Result<Advocate, LifecycleError> {
        let advocate = self
            .advocates
            .get(advocate_id)
            .await
            .map_err(|_| LifecycleError::AdvocateNotFound(advocate_id))?;
        Ok(self.merge_stats(advocate).await)
    }

    /// The full pool with live workload counters merged in
    pub async fn advocate_pool(&self) -> Vec<Advocate> {
        let mut pool = Vec::new();
        for advocate in self.advocates.list().await {
            pool.push(self.merge_stats(advocate).await);
        }
        pool
    }

    pub async fn register_advocate(&self, advocate: Advocate) {
        info!(advocate = %advocate.id, verified = advocate.verified, "advocate registered");
        self.advocates.insert(advocate).await;
    }

    pub async fn list_cases(&self) -> Vec<Case> {
        self.cases.list().await
    }

    async fn read_case(&self, case_id: Uuid) -> Result<(Case, u64), LifecycleError> {
        self.cases
            .get(case_id)
            .await
            .map_err(|_| LifecycleError::CaseNotFound(case_id))
    }

    async fn merge_stats(&self, mut advocate: Advocate) -> Advocate {
        let stats = self.ledger.stats(advocate.id).await;
        advocate.current_case_load = stats.current_case_load;
        advocate.total_cases = stats.total_cases;
        advocate
    }

    /// Counter side effects of a freshly applied transition. Runs after the
    /// CAS landed; idempotent retries never reach here, so counters cannot
    /// double-move.
    async fn apply_ledger_effects(
        &self,
        previous: CaseStatus,
        to: CaseStatus,
        holder: Option<Uuid>,
    ) {
        let Some(advocate_id) = holder else {
            return;
        };
        match to {
            CaseStatus::Resolved | CaseStatus::Completed => {
                self.ledger.decrement_load(advocate_id).await;
                self.ledger.increment_total(advocate_id).await;
            }
            CaseStatus::Withdrawn
                if matches!(previous, CaseStatus::Assigned | CaseStatus::InProgress) =>
            {
                self.ledger.decrement_load(advocate_id).await;
            }
            _ => {}
        }
    }
}
