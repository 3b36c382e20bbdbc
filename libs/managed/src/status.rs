//! The closed lifecycle status vocabulary for external objects.

use serde::{Deserialize, Serialize};

use crate::conditions::Condition;

/// Provider lifecycle status, mapped into a closed set.
///
/// Adapters translate their provider's vocabulary into this enum when
/// producing an observation; the engine never sees raw provider strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// The provider is still provisioning the object.
    Creating,
    /// The object is fully provisioned and usable.
    Available,
    /// A mutation is in flight on the provider side.
    Modifying,
    /// The provider is tearing the object down.
    Deleting,
    /// The object is gone but the provider still reports it.
    Deleted,
    /// The provider gave up on the object.
    Failed,
    /// No status reported, or a vocabulary word we don't recognize.
    #[default]
    Unknown,
}

impl LifecycleStatus {
    /// Maps a provider status word into the closed set.
    ///
    /// Covers the vocabulary seen across providers (`CREATING`,
    /// `PENDING_CERTIFICATE`, `ACTIVE`, `ISSUED`, `MODIFYING`, ...); anything
    /// unrecognized maps to `Unknown` rather than failing the observation.
    #[must_use]
    pub fn from_provider(word: &str) -> Self {
        match word.to_ascii_uppercase().as_str() {
            "CREATING" | "PENDING" | "PENDING_CERTIFICATE" | "PENDING_VALIDATION" => Self::Creating,
            "ACTIVE" | "AVAILABLE" | "ISSUED" => Self::Available,
            "MODIFYING" | "UPDATING" => Self::Modifying,
            "DELETING" => Self::Deleting,
            "DELETED" => Self::Deleted,
            "FAILED" | "EXPIRED" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Returns true while the provider is mid-transition.
    ///
    /// The engine skips mutation calls against transitional objects so it
    /// never overlaps an in-flight provider operation.
    #[must_use]
    pub fn is_transitional(&self) -> bool {
        matches!(self, Self::Creating | Self::Modifying | Self::Deleting)
    }

    /// The Ready condition implied by this status.
    #[must_use]
    pub fn ready_condition(&self) -> Condition {
        match self {
            Self::Available => Condition::available(),
            Self::Deleting => Condition::deleting(),
            Self::Deleted => Condition::unavailable("Deleted"),
            Self::Failed => Condition::unavailable("Failed"),
            Self::Creating => Condition::creating(),
            Self::Modifying => Condition::ready_unknown("Modifying"),
            Self::Unknown => Condition::ready_unknown("Unknown"),
        }
    }
}

impl std::fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let word = match self {
            Self::Creating => "creating",
            Self::Available => "available",
            Self::Modifying => "modifying",
            Self::Deleting => "deleting",
            Self::Deleted => "deleted",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        };
        write!(f, "{word}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{ConditionStatus, ConditionType};
    use rstest::rstest;

    #[rstest]
    #[case("CREATING", LifecycleStatus::Creating)]
    #[case("pending_certificate", LifecycleStatus::Creating)]
    #[case("ACTIVE", LifecycleStatus::Available)]
    #[case("issued", LifecycleStatus::Available)]
    #[case("MODIFYING", LifecycleStatus::Modifying)]
    #[case("DELETED", LifecycleStatus::Deleted)]
    #[case("EXPIRED", LifecycleStatus::Failed)]
    #[case("SOMETHING_NEW", LifecycleStatus::Unknown)]
    fn test_from_provider(#[case] word: &str, #[case] expected: LifecycleStatus) {
        assert_eq!(LifecycleStatus::from_provider(word), expected);
    }

    #[test]
    fn test_transitional_statuses() {
        assert!(LifecycleStatus::Creating.is_transitional());
        assert!(LifecycleStatus::Modifying.is_transitional());
        assert!(LifecycleStatus::Deleting.is_transitional());
        assert!(!LifecycleStatus::Available.is_transitional());
        assert!(!LifecycleStatus::Failed.is_transitional());
    }

    #[test]
    fn test_available_maps_to_ready_true() {
        let cond = LifecycleStatus::Available.ready_condition();
        assert_eq!(cond.condition_type, ConditionType::Ready);
        assert_eq!(cond.status, ConditionStatus::True);
    }

    #[test]
    fn test_deleting_maps_to_ready_false_with_reason() {
        let cond = LifecycleStatus::Deleting.ready_condition();
        assert_eq!(cond.status, ConditionStatus::False);
        assert_eq!(cond.reason, "Deleting");
    }
}
