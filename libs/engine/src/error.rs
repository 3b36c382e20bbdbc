//! Engine error types and their retry classification.

use steward_managed::RecordError;
use thiserror::Error;

use crate::client::AdapterError;
use crate::store::StoreError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors surfaced from a reconciliation pass.
///
/// The engine performs no internal retries; every error carries enough
/// classification for the trigger source to pick a response:
///
/// - retryable: re-invoke after backoff
/// - conflict: re-read the record, then re-invoke
/// - fatal: stop retrying this path until an operator intervenes
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// An adapter call failed, wrapped with the operation name.
    #[error("{op} call failed: {source}")]
    Adapter {
        op: &'static str,
        #[source]
        source: AdapterError,
    },

    /// The record store rejected a write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A record-level invariant was violated; indicates state corruption,
    /// never retried automatically.
    #[error(transparent)]
    FatalPrecondition(#[from] RecordError),

    /// The pass deadline fired mid-call. The record is left untouched: in
    /// particular a cancelled create records no external identifier.
    #[error("{op} call exceeded the pass deadline")]
    DeadlineExceeded { op: &'static str },
}

impl ReconcileError {
    /// True when the underlying adapter error means the object is gone.
    ///
    /// Call sites fold this into state transitions; it is never surfaced to
    /// the trigger source as an error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReconcileError::Adapter { source, .. } if source.is_not_found())
    }

    /// True for stale-write conflicts from the record store.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, ReconcileError::Store(e) if e.is_conflict())
    }

    /// True for logic/state corruption that should halt automatic retries.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReconcileError::FatalPrecondition(_))
    }

    /// True when the trigger source should re-invoke after backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !self.is_fatal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_id::{ExternalId, RecordId};

    #[test]
    fn test_adapter_error_wraps_operation_name() {
        let err = ReconcileError::Adapter {
            op: "describe",
            source: AdapterError::throttled("rate exceeded"),
        };
        assert_eq!(err.to_string(), "describe call failed: rate exceeded");
        assert!(err.is_retryable());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_is_detected() {
        let err = ReconcileError::Adapter {
            op: "describe",
            source: AdapterError::not_found("gone"),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_conflict_classification() {
        let err = ReconcileError::from(StoreError::Conflict("stale".to_string()));
        assert!(err.is_conflict());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_fatal_precondition_is_not_retryable() {
        let err = ReconcileError::from(RecordError::ExternalIdAlreadySet {
            record_id: RecordId::new(),
            existing: ExternalId::new("arn:1").unwrap(),
        });
        assert!(err.is_fatal());
        assert!(!err.is_retryable());
    }
}
