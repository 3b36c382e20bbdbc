//! Reconciliation records: one declared spec bound to at most one external
//! object.

use serde::{Deserialize, Serialize};
use steward_id::{ExternalId, RecordId};
use thiserror::Error;

use crate::conditions::{Condition, ConditionedStatus};
use crate::status::LifecycleStatus;

/// Errors from record-level invariant violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// An external identifier was already recorded for this record.
    ///
    /// The engine only issues Create when no identifier is recorded, so
    /// hitting this means the record's state no longer matches what the
    /// state machine believes. It is surfaced as a fatal precondition
    /// failure, not retried.
    #[error("external identifier already recorded for {record_id}: {existing}")]
    ExternalIdAlreadySet {
        record_id: RecordId,
        existing: ExternalId,
    },
}

/// Binds one desired spec to zero-or-one external object.
///
/// The external identifier is set exactly once, at first successful create,
/// and cleared only by a successful delete. Everything else on the record is
/// freely mutable between passes by its owner (the caller); the engine
/// mutates the spec only through late initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedRecord<D> {
    /// Stable identity of this record.
    pub id: RecordId,

    /// The user-declared desired state.
    pub spec: D,

    /// Provider-assigned handle, present once the object has been created.
    external_id: Option<ExternalId>,

    /// Ready/Synced conditions reported to the user.
    pub conditions: ConditionedStatus,

    /// Set when the user has asked for the object to be removed.
    pub deletion_requested: bool,

    /// Lifecycle status from the most recent observation.
    pub last_status: LifecycleStatus,
}

impl<D> ManagedRecord<D> {
    /// Creates a record for a newly declared spec, with no external object.
    pub fn new(id: RecordId, spec: D) -> Self {
        Self {
            id,
            spec,
            external_id: None,
            conditions: ConditionedStatus::default(),
            deletion_requested: false,
            last_status: LifecycleStatus::Unknown,
        }
    }

    /// The recorded external identifier, if the object has been created.
    #[must_use]
    pub fn external_id(&self) -> Option<&ExternalId> {
        self.external_id.as_ref()
    }

    /// Records the external identifier returned by a successful create.
    ///
    /// Fails if an identifier is already recorded; it is never reassigned.
    pub fn record_external_id(&mut self, id: ExternalId) -> Result<(), RecordError> {
        if let Some(existing) = &self.external_id {
            return Err(RecordError::ExternalIdAlreadySet {
                record_id: self.id,
                existing: existing.clone(),
            });
        }
        self.external_id = Some(id);
        Ok(())
    }

    /// Clears the external identifier after a successful delete, returning
    /// the record to its pre-create state so repeated deletes are idempotent.
    pub fn clear_external_id(&mut self) {
        self.external_id = None;
    }

    /// Marks the record for removal of the external object.
    pub fn request_deletion(&mut self) {
        self.deletion_requested = true;
    }

    /// Sets a condition on the record.
    pub fn set_condition(&mut self, condition: Condition) {
        self.conditions.set(condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn external(raw: &str) -> ExternalId {
        ExternalId::new(raw).unwrap()
    }

    #[test]
    fn test_new_record_has_no_external_id() {
        let record = ManagedRecord::new(RecordId::new(), ());
        assert!(record.external_id().is_none());
        assert!(!record.deletion_requested);
        assert_eq!(record.last_status, LifecycleStatus::Unknown);
    }

    #[test]
    fn test_external_id_set_once() {
        let mut record = ManagedRecord::new(RecordId::new(), ());
        record.record_external_id(external("arn:1")).unwrap();

        let err = record.record_external_id(external("arn:2")).unwrap_err();
        assert!(matches!(err, RecordError::ExternalIdAlreadySet { .. }));
        assert_eq!(record.external_id().unwrap().as_str(), "arn:1");
    }

    #[test]
    fn test_clear_allows_re_record() {
        let mut record = ManagedRecord::new(RecordId::new(), ());
        record.record_external_id(external("arn:1")).unwrap();
        record.clear_external_id();
        assert!(record.external_id().is_none());

        // After a delete the record is back in its pre-create state.
        record.record_external_id(external("arn:3")).unwrap();
        assert_eq!(record.external_id().unwrap().as_str(), "arn:3");
    }

    #[test]
    fn test_serde_roundtrip_preserves_external_id() {
        let mut record = ManagedRecord::new(RecordId::new(), "spec".to_string());
        record.record_external_id(external("arn:1")).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let parsed: ManagedRecord<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.external_id().unwrap().as_str(), "arn:1");
        assert_eq!(parsed.spec, "spec");
    }
}
