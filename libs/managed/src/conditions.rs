//! User-visible conditions reported back to the record store.
//!
//! Two condition types exist: `Ready` tracks the external object's usability,
//! `Synced` tracks whether the last reconciliation pass succeeded. Status is
//! a tri-state; the reason is free text passed explicitly by whoever sets the
//! condition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of condition types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    /// The external object is provisioned and usable.
    Ready,
    /// The desired state matches the observed state.
    Synced,
}

/// Tri-state condition status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

/// One condition: type, status, free-text reason, transition timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub condition_type: ConditionType,
    pub status: ConditionStatus,
    pub reason: String,
    pub last_transition: DateTime<Utc>,
}

impl Condition {
    fn new(condition_type: ConditionType, status: ConditionStatus, reason: &str) -> Self {
        Self {
            condition_type,
            status,
            reason: reason.to_string(),
            last_transition: Utc::now(),
        }
    }

    /// Ready=True: the object is available.
    #[must_use]
    pub fn available() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::True, "Available")
    }

    /// Ready=False while a create is in flight.
    #[must_use]
    pub fn creating() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, "Creating")
    }

    /// Ready=False while a delete is in flight.
    #[must_use]
    pub fn deleting() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, "Deleting")
    }

    /// Ready=False with a caller-supplied reason.
    #[must_use]
    pub fn unavailable(reason: &str) -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, reason)
    }

    /// Ready=Unknown with a caller-supplied reason.
    #[must_use]
    pub fn ready_unknown(reason: &str) -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::Unknown, reason)
    }

    /// Synced=True: the last pass converged.
    #[must_use]
    pub fn reconcile_success() -> Self {
        Self::new(ConditionType::Synced, ConditionStatus::True, "ReconcileSuccess")
    }

    /// Synced=False with the failure reason.
    #[must_use]
    pub fn reconcile_error(reason: &str) -> Self {
        Self::new(ConditionType::Synced, ConditionStatus::False, reason)
    }
}

/// The set of conditions carried by a record, at most one per type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionedStatus {
    conditions: Vec<Condition>,
}

impl ConditionedStatus {
    /// Sets a condition, replacing any existing condition of the same type.
    ///
    /// When the status is unchanged the original transition timestamp is
    /// kept, so `last_transition` reflects actual status flips rather than
    /// every reconciliation pass.
    pub fn set(&mut self, condition: Condition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.condition_type == condition.condition_type)
        {
            Some(existing) => {
                let last_transition = if existing.status == condition.status {
                    existing.last_transition
                } else {
                    condition.last_transition
                };
                *existing = Condition {
                    last_transition,
                    ..condition
                };
            }
            None => self.conditions.push(condition),
        }
    }

    /// Returns the condition of the given type, if set.
    #[must_use]
    pub fn get(&self, condition_type: ConditionType) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
    }

    /// Returns true if the condition of the given type has the given status.
    #[must_use]
    pub fn is(&self, condition_type: ConditionType, status: ConditionStatus) -> bool {
        self.get(condition_type).is_some_and(|c| c.status == status)
    }

    /// All conditions currently set.
    #[must_use]
    pub fn all(&self) -> &[Condition] {
        &self.conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_same_type() {
        let mut status = ConditionedStatus::default();
        status.set(Condition::creating());
        status.set(Condition::available());

        assert_eq!(status.all().len(), 1);
        assert!(status.is(ConditionType::Ready, ConditionStatus::True));
    }

    #[test]
    fn test_set_keeps_transition_time_when_status_unchanged() {
        let mut status = ConditionedStatus::default();
        let first = Condition::available();
        let first_transition = first.last_transition;
        status.set(first);

        std::thread::sleep(std::time::Duration::from_millis(2));
        status.set(Condition::available());

        let current = status.get(ConditionType::Ready).unwrap();
        assert_eq!(current.last_transition, first_transition);
    }

    #[test]
    fn test_set_updates_transition_time_on_status_flip() {
        let mut status = ConditionedStatus::default();
        let first = Condition::creating();
        let first_transition = first.last_transition;
        status.set(first);

        std::thread::sleep(std::time::Duration::from_millis(2));
        status.set(Condition::available());

        let current = status.get(ConditionType::Ready).unwrap();
        assert!(current.last_transition > first_transition);
    }

    #[test]
    fn test_ready_and_synced_coexist() {
        let mut status = ConditionedStatus::default();
        status.set(Condition::available());
        status.set(Condition::reconcile_success());

        assert_eq!(status.all().len(), 2);
        assert!(status.is(ConditionType::Ready, ConditionStatus::True));
        assert!(status.is(ConditionType::Synced, ConditionStatus::True));
    }

    #[test]
    fn test_reconcile_error_carries_reason() {
        let mut status = ConditionedStatus::default();
        status.set(Condition::reconcile_error("describe failed"));

        let synced = status.get(ConditionType::Synced).unwrap();
        assert_eq!(synced.status, ConditionStatus::False);
        assert_eq!(synced.reason, "describe failed");
    }
}
