//! # steward-managed
//!
//! Data model and pure algorithms for reconciling declared resource
//! specifications against externally-managed objects.
//!
//! This crate holds everything that needs no I/O:
//!
//! - **Tags**: the unordered key/value set, the up-to-date check, and the
//!   asymmetric remove/add diff.
//! - **Comparator helpers**: field-level drift detection with
//!   "absent desired means don't care" semantics.
//! - **Late initialization**: merging provider-assigned defaults into unset
//!   desired fields without ever overwriting user intent.
//! - **Lifecycle status**: the closed status vocabulary and its mapping to
//!   the Ready condition.
//! - **Conditions**: the Ready/Synced tri-state conditions reported back to
//!   the record store.
//! - **Records**: the binding of one desired spec to at most one external
//!   identifier.
//! - **The `ManagedResource` trait**: the per-kind seam the generic engine
//!   is parameterized over.
//!
//! # Invariants
//!
//! - A record's external identifier is set exactly once and cleared only by
//!   a successful delete.
//! - Late initialization is idempotent and never overwrites a set field.
//! - All comparisons here are pure; nothing in this crate talks to a remote
//!   system.

pub mod compare;
pub mod conditions;
pub mod late_init;
pub mod record;
pub mod resource;
pub mod status;
pub mod tags;

pub use conditions::{Condition, ConditionStatus, ConditionType, ConditionedStatus};
pub use record::{ManagedRecord, RecordError};
pub use resource::ManagedResource;
pub use status::LifecycleStatus;
pub use tags::{TagDiff, TagSet};
