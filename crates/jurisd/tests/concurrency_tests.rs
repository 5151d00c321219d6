//! Concurrency tests
//!
//! Races the engine deliberately:
//!
//! 1. Two clients hiring different advocates for the same case: exactly one
//!    claim wins, the loser sees AlreadyClaimed
//! 2. Many concurrent accept/complete cycles: the workload ledger balances
//!    exactly, never negative
//! 3. Conflicting transitions on one case: one applies, one is StaleState

use std::sync::Arc;

use uuid::Uuid;

use juris_common::{
    Advocate, CaseStatus, IntakeHints, KeywordLexicon, LifecycleError, LifecycleEvent,
};
use jurisd::ledger::WorkloadLedger;
use jurisd::lifecycle::{CaseOutcome, LifecycleEngine};
use jurisd::notifier::Notifier;
use jurisd::store::{AdvocateStore, CaseStore};

/// Discards events; these tests only watch state and counters
struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: LifecycleEvent) {}
}

fn engine() -> Arc<LifecycleEngine> {
    Arc::new(LifecycleEngine::new(
        Arc::new(CaseStore::new()),
        Arc::new(AdvocateStore::new()),
        Arc::new(WorkloadLedger::new()),
        Arc::new(KeywordLexicon::builtin().clone()),
        Arc::new(NullNotifier),
    ))
}

async fn register(engine: &LifecycleEngine) -> Uuid {
    let mut advocate = Advocate::new(Uuid::new_v4());
    advocate.rating = 4.0;
    advocate.success_rate = 80.0;
    advocate.verified = true;
    advocate.accepting_cases = true;
    let id = advocate.id;
    engine.register_advocate(advocate).await;
    id
}

async fn submit(engine: &LifecycleEngine) -> Uuid {
    engine
        .submit(
            Uuid::new_v4(),
            "Landlord dispute".to_string(),
            "my landlord served an eviction notice".to_string(),
            IntakeHints::default(),
        )
        .await
        .case
        .id
}

#[tokio::test]
async fn test_double_hire_exactly_one_claim_wins() {
    for _ in 0..20 {
        let engine = engine();
        let advocate_a = register(&engine).await;
        let advocate_b = register(&engine).await;
        let case_id = submit(&engine).await;

        let first = {
            let engine = Arc::clone(&engine);
            tokio::spawn(
                async move { engine.request_assignment(case_id, advocate_a, "client").await },
            )
        };
        let second = {
            let engine = Arc::clone(&engine);
            tokio::spawn(
                async move { engine.request_assignment(case_id, advocate_b, "client").await },
            )
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let losses = results
            .iter()
            .filter(|r| matches!(r, Err(LifecycleError::AlreadyClaimed)))
            .count();
        assert_eq!(wins, 1, "exactly one hire must win: {results:?}");
        assert_eq!(losses, 1, "the loser must see AlreadyClaimed: {results:?}");

        // The persisted claim belongs to the winner
        let case = engine.get_case(case_id).await.unwrap();
        assert_eq!(case.status, CaseStatus::PendingAcceptance);
        let winner = results.iter().find_map(|r| r.as_ref().ok()).unwrap();
        assert_eq!(case.advocate_id, winner.advocate_id);
    }
}

#[tokio::test]
async fn test_same_advocate_double_hire_is_idempotent() {
    let engine = engine();
    let advocate_id = register(&engine).await;
    let case_id = submit(&engine).await;

    let first = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.request_assignment(case_id, advocate_id, "client").await })
    };
    let second = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.request_assignment(case_id, advocate_id, "client").await })
    };

    // A retried request for the same claim is a no-op success, so both land
    assert!(first.await.unwrap().is_ok());
    assert!(second.await.unwrap().is_ok());

    let case = engine.get_case(case_id).await.unwrap();
    assert_eq!(case.advocate_id, Some(advocate_id));
}

#[tokio::test]
async fn test_concurrent_accept_complete_cycles_balance_the_ledger() {
    let engine = engine();
    let advocate_id = register(&engine).await;

    // 24 cases; even-numbered ones run to completion, odd ones stay assigned
    let mut case_ids = Vec::new();
    for _ in 0..24 {
        case_ids.push(submit(&engine).await);
    }

    let mut handles = Vec::new();
    for (i, case_id) in case_ids.into_iter().enumerate() {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .request_assignment(case_id, advocate_id, "client")
                .await
                .unwrap();
            engine
                .respond_to_assignment(case_id, advocate_id, true)
                .await
                .unwrap();
            if i % 2 == 0 {
                engine
                    .complete(
                        case_id,
                        CaseStatus::Assigned,
                        CaseOutcome::Completed,
                        "advocate",
                        None,
                    )
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stats = engine.ledger().stats(advocate_id).await;
    // 24 accepts minus 12 completes
    assert_eq!(stats.current_case_load, 12);
    assert_eq!(stats.total_cases, 12);
}

#[tokio::test]
async fn test_conflicting_transitions_one_applies_one_is_stale() {
    for _ in 0..20 {
        let engine = engine();
        let advocate_id = register(&engine).await;
        let case_id = submit(&engine).await;
        engine
            .request_assignment(case_id, advocate_id, "client")
            .await
            .unwrap();
        engine
            .respond_to_assignment(case_id, advocate_id, true)
            .await
            .unwrap();

        let progress = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .transition(
                        case_id,
                        CaseStatus::Assigned,
                        CaseStatus::InProgress,
                        "advocate",
                        None,
                    )
                    .await
            })
        };
        let finish = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .complete(
                        case_id,
                        CaseStatus::Assigned,
                        CaseOutcome::Completed,
                        "advocate",
                        None,
                    )
                    .await
            })
        };

        let results = [progress.await.unwrap(), finish.await.unwrap()];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let stale = results
            .iter()
            .filter(|r| matches!(r, Err(LifecycleError::StaleState { .. })))
            .count();
        assert_eq!(wins, 1, "exactly one transition applies: {results:?}");
        assert_eq!(stale, 1, "the loser must re-read: {results:?}");

        // Whatever happened, the counters stayed coherent
        let stats = engine.ledger().stats(advocate_id).await;
        let case = engine.get_case(case_id).await.unwrap();
        match case.status {
            CaseStatus::Completed => {
                assert_eq!(stats.current_case_load, 0);
                assert_eq!(stats.total_cases, 1);
            }
            CaseStatus::InProgress => {
                assert_eq!(stats.current_case_load, 1);
                assert_eq!(stats.total_cases, 0);
            }
            other => panic!("unexpected status {other}"),
        }
    }
}

#[tokio::test]
async fn test_retried_complete_never_underflows_the_ledger() {
    let engine = engine();
    let advocate_id = register(&engine).await;
    let case_id = submit(&engine).await;
    engine
        .request_assignment(case_id, advocate_id, "client")
        .await
        .unwrap();
    engine
        .respond_to_assignment(case_id, advocate_id, true)
        .await
        .unwrap();

    engine
        .complete(case_id, CaseStatus::Assigned, CaseOutcome::Resolved, "advocate", None)
        .await
        .unwrap();
    // At-least-once delivery retries the same call
    engine
        .complete(case_id, CaseStatus::Assigned, CaseOutcome::Resolved, "advocate", None)
        .await
        .unwrap();

    let stats = engine.ledger().stats(advocate_id).await;
    assert_eq!(stats.current_case_load, 0);
    assert_eq!(stats.total_cases, 1);
}
