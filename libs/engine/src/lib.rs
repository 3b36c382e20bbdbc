//! # steward-engine
//!
//! The generic reconciliation engine: one lifecycle state machine,
//! parameterized over a per-kind adapter, that converges externally-managed
//! objects to their declared specs.
//!
//! Each invocation runs one pass for one record:
//!
//! ```text
//! deletion requested ──> delete (disable first if the kind needs it)
//!         │
//!         └─> observe ──> absent ───────> create (identifier recorded once)
//!                    └──> present ──┬───> up to date: done
//!                                   └───> drifted: update (tags, fields,
//!                                         optional one-shot renewal)
//! ```
//!
//! The engine is stateless and reentrant across records: it holds only the
//! adapter, the record store, and configuration. Within a pass all calls are
//! sequential; the adapter offers no transactional guarantees, so the engine
//! never overlaps calls for the same record. Retry cadence belongs to the
//! trigger source that invokes the engine; every error reported here is
//! classified as retryable, conflict, or fatal so the trigger can decide.

pub mod client;
pub mod error;
pub mod mock;
pub mod outcome;
pub mod reconciler;
pub mod store;

pub use client::{AdapterError, AdapterErrorKind, ExternalClient};
pub use error::{ReconcileError, Result};
pub use outcome::{Action, ReconcileOutcome};
pub use reconciler::{PassContext, Reconciler, ReconcilerConfig};
pub use store::{RecordStore, StoreError};
