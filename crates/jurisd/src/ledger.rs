//! Workload ledger - per-advocate case load and totals.
//!
//! The single place advocate counters are mutated. Lifecycle transitions
//! call into it; nothing else does. Counters are atomics, so increments and
//! decrements for the same advocate from different cases commute without a
//! read-modify-write window.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

#[derive(Default)]
struct LedgerEntry {
    current_case_load: AtomicU32,
    total_cases: AtomicU32,
}

/// Snapshot of an advocate's workload counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadStats {
    pub current_case_load: u32,
    pub total_cases: u32,
}

/// Tracks every advocate's active case load and lifetime totals
#[derive(Default)]
pub struct WorkloadLedger {
    inner: RwLock<HashMap<Uuid, Arc<LedgerEntry>>>,
}

impl WorkloadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, advocate_id: Uuid) -> Arc<LedgerEntry> {
        {
            let inner = self.inner.read().await;
            if let Some(entry) = inner.get(&advocate_id) {
                return Arc::clone(entry);
            }
        }
        let mut inner = self.inner.write().await;
        Arc::clone(inner.entry(advocate_id).or_default())
    }

    /// An advocate accepted a case
    pub async fn increment_load(&self, advocate_id: Uuid) {
        let entry = self.entry(advocate_id).await;
        entry.current_case_load.fetch_add(1, Ordering::SeqCst);
    }

    /// An active case left the advocate's plate (completed or withdrawn).
    ///
    /// The load invariant says this can never go below zero; if it would,
    /// something upstream double-counted, so log it and stay at zero.
    pub async fn decrement_load(&self, advocate_id: Uuid) {
        let entry = self.entry(advocate_id).await;
        let result = entry
            .current_case_load
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |load| {
                load.checked_sub(1)
            });
        if result.is_err() {
            warn!(%advocate_id, "workload decrement at zero load; counter left unchanged");
        }
    }

    /// A case reached resolved/completed under this advocate
    pub async fn increment_total(&self, advocate_id: Uuid) {
        let entry = self.entry(advocate_id).await;
        entry.total_cases.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn stats(&self, advocate_id: Uuid) -> WorkloadStats {
        let entry = self.entry(advocate_id).await;
        WorkloadStats {
            current_case_load: entry.current_case_load.load(Ordering::SeqCst),
            total_cases: entry.total_cases.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_then_decrement_balances() {
        let ledger = WorkloadLedger::new();
        let id = Uuid::new_v4();

        ledger.increment_load(id).await;
        ledger.increment_load(id).await;
        ledger.decrement_load(id).await;

        let stats = ledger.stats(id).await;
        assert_eq!(stats.current_case_load, 1);
    }

    #[tokio::test]
    async fn test_decrement_never_goes_negative() {
        let ledger = WorkloadLedger::new();
        let id = Uuid::new_v4();

        ledger.decrement_load(id).await;
        ledger.decrement_load(id).await;

        assert_eq!(ledger.stats(id).await.current_case_load, 0);
    }

    #[tokio::test]
    async fn test_totals_are_independent_of_load() {
        let ledger = WorkloadLedger::new();
        let id = Uuid::new_v4();

        ledger.increment_load(id).await;
        ledger.decrement_load(id).await;
        ledger.increment_total(id).await;

        let stats = ledger.stats(id).await;
        assert_eq!(stats.current_case_load, 0);
        assert_eq!(stats.total_cases, 1);
    }

    #[tokio::test]
    async fn test_concurrent_updates_commute() {
        let ledger = Arc::new(WorkloadLedger::new());
        let id = Uuid::new_v4();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                ledger.increment_load(id).await;
                ledger.increment_load(id).await;
                ledger.decrement_load(id).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(ledger.stats(id).await.current_case_load, 50);
    }
}
