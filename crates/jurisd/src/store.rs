//! In-memory case and advocate stores - the persistence collaborator.
//!
//! Case records carry a row version; every write goes through
//! `compare_and_update`, so concurrent read-modify-write cycles surface as
//! explicit `VersionConflict` failures instead of silent overwrites. The
//! status change and its timeline entry travel inside the same record, so
//! they land (or fail) as one unit.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use juris_common::{Advocate, Case};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(Uuid),

    #[error("version conflict on record {id}: expected v{expected}, found v{actual}")]
    VersionConflict {
        id: Uuid,
        expected: u64,
        actual: u64,
    },
}

struct VersionedCase {
    case: Case,
    version: u64,
}

/// Versioned case records keyed by id
#[derive(Default)]
pub struct CaseStore {
    inner: RwLock<HashMap<Uuid, VersionedCase>>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created case at version 1
    pub async fn insert(&self, case: Case) {
        let mut inner = self.inner.write().await;
        inner.insert(case.id, VersionedCase { case, version: 1 });
    }

    /// Read a case together with its current row version
    pub async fn get(&self, id: Uuid) -> Result<(Case, u64), StoreError> {
        let inner = self.inner.read().await;
        inner
            .get(&id)
            .map(|record| (record.case.clone(), record.version))
            .ok_or(StoreError::NotFound(id))
    }

    /// Atomic read-check-write: replaces the record only if the stored
    /// version still matches `expected_version`
    pub async fn compare_and_update(
        &self,
        id: Uuid,
        expected_version: u64,
        case: Case,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let record = inner.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if record.version != expected_version {
            return Err(StoreError::VersionConflict {
                id,
                expected: expected_version,
                actual: record.version,
            });
        }
        record.case = case;
        record.version += 1;
        Ok(record.version)
    }

    pub async fn list(&self) -> Vec<Case> {
        let inner = self.inner.read().await;
        inner.values().map(|record| record.case.clone()).collect()
    }
}

/// Advocate profiles keyed by id.
///
/// Profiles are written at registration; the workload counters live in the
/// ledger and are merged into views on read.
#[derive(Default)]
pub struct AdvocateStore {
    inner: RwLock<HashMap<Uuid, Advocate>>,
}

impl AdvocateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, advocate: Advocate) {
        let mut inner = self.inner.write().await;
        inner.insert(advocate.id, advocate);
    }

    pub async fn get(&self, id: Uuid) -> Result<Advocate, StoreError> {
        let inner = self.inner.read().await;
        inner.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    pub async fn list(&self) -> Vec<Advocate> {
        let inner = self.inner.read().await;
        inner.values().cloned().collect()
    }
}
