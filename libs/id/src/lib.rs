//! # steward-id
//!
//! Typed identifiers for the steward reconciliation engine.
//!
//! Two families of identifier live here:
//!
//! - **Record identifiers** (`RecordId`, `PassId`): system-generated,
//!   ULID-backed, with a canonical `{prefix}_{ulid}` string form and strict
//!   parsing. These name things the engine itself creates.
//! - **External identifiers** (`ExternalId`): provider-assigned opaque
//!   handles (an ARN-like string). The remote system mints them, so they are
//!   validated but never generated locally, and they are immutable once
//!   recorded.
//!
//! All identifiers round-trip through serde as strings.

mod error;
mod external;
mod macros;
mod types;

pub use error::IdError;
pub use external::ExternalId;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
