//! The record store seam.

use async_trait::async_trait;
use steward_id::RecordId;
use steward_managed::ManagedRecord;
use thiserror::Error;

/// Record persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic-concurrency write conflict; the caller should re-read the
    /// record and retry the whole pass.
    #[error("record write conflict: {0}")]
    Conflict(String),

    /// The store could not serve the request.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// True when the error is a stale-write conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

/// Persistence for reconciliation records.
///
/// Implementations are expected to use optimistic-concurrency semantics:
/// a stale write fails with [`StoreError::Conflict`] rather than silently
/// overwriting. The engine only ever calls `persist`; `get` and `delete`
/// exist for the trigger source's lifecycle bookkeeping.
#[async_trait]
pub trait RecordStore<D>: Send + Sync {
    /// Writes the record back.
    async fn persist(&self, record: &ManagedRecord<D>) -> Result<(), StoreError>;

    /// Reads a record by identity.
    async fn get(&self, id: RecordId) -> Result<Option<ManagedRecord<D>>, StoreError>;

    /// Removes a record once its external object no longer exists.
    async fn delete(&self, id: RecordId) -> Result<(), StoreError>;
}
