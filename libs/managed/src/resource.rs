//! The per-kind seam the generic engine is parameterized over.

use crate::status::LifecycleStatus;
use crate::tags::TagSet;

/// Pure, per-kind reconciliation hooks.
///
/// One implementation exists per managed resource kind. All methods are pure
/// functions over the kind's desired and observed types; everything that
/// touches the network lives behind the engine's adapter trait instead.
///
/// The defaulted methods are capability hooks: kinds that support a
/// renewal-style one-shot action, need a disable transition before
/// destruction, or want a best-effort grant after creation override them.
/// Kinds without those capabilities implement only the required methods.
pub trait ManagedResource: Send + Sync + 'static {
    /// Human-readable kind name, used in logs.
    const KIND: &'static str;

    /// The user-declared parameters for this kind.
    type Desired: Clone + PartialEq + Send + Sync + 'static;

    /// A point-in-time snapshot of the external object.
    type Observed: Send + Sync + 'static;

    /// Maps the observation onto the closed lifecycle status set.
    fn lifecycle_status(observed: &Self::Observed) -> LifecycleStatus;

    /// Field-level drift check across every modifiable field plus tags.
    ///
    /// Must not panic on partially-populated observations; a missing
    /// observed sub-structure counts as all-fields-mismatched.
    fn is_up_to_date(desired: &Self::Desired, observed: &Self::Observed, observed_tags: &TagSet)
        -> bool;

    /// Copies provider defaults into unset desired fields. Never overwrites
    /// a field the user set; must be idempotent.
    fn late_initialize(desired: &mut Self::Desired, observed: &Self::Observed);

    /// The desired tag set for the object.
    fn desired_tags(desired: &Self::Desired) -> &TagSet;

    /// True when the user has requested the one-shot renewal action.
    fn renewal_requested(_desired: &Self::Desired) -> bool {
        false
    }

    /// Clears the renewal request flag. Called regardless of whether the
    /// renewal succeeded so the action is never retried indefinitely.
    fn clear_renewal_request(_desired: &mut Self::Desired) {}

    /// True when the observed object is currently eligible for renewal.
    fn renewal_eligible(_observed: &Self::Observed) -> bool {
        false
    }

    /// True when the provider requires the object disabled before it can be
    /// destroyed. Return false when the observation shows the object already
    /// pending or disabled.
    fn disable_before_destroy(_observed: &Self::Observed) -> bool {
        false
    }

    /// True when a best-effort grant call should follow a successful create.
    fn grant_on_create(_desired: &Self::Desired) -> bool {
        false
    }
}
