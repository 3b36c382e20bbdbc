//! The external client adapter seam.
//!
//! One adapter exists per managed resource kind. It owns the provider wire
//! format and credential plumbing; the engine only sees the typed desired
//! and observed states plus classified errors.

use async_trait::async_trait;
use steward_id::ExternalId;
use steward_managed::{ManagedResource, TagSet};
use thiserror::Error;

/// Classification of adapter failures.
///
/// The engine folds `NotFound` into state transitions and treats everything
/// else as retryable by the trigger source. Adapters classify at
/// construction time, typically from their provider's error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterErrorKind {
    /// The external object does not exist.
    NotFound,
    /// The provider rejected the call for rate/throughput reasons.
    Throttled,
    /// Any other remote failure.
    Remote,
}

/// An error returned by an external client adapter.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AdapterError {
    kind: AdapterErrorKind,
    message: String,
}

impl AdapterError {
    /// The external object was not found.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: AdapterErrorKind::NotFound,
            message: message.into(),
        }
    }

    /// The provider throttled the call.
    pub fn throttled(message: impl Into<String>) -> Self {
        Self {
            kind: AdapterErrorKind::Throttled,
            message: message.into(),
        }
    }

    /// Any other remote failure.
    pub fn remote(message: impl Into<String>) -> Self {
        Self {
            kind: AdapterErrorKind::Remote,
            message: message.into(),
        }
    }

    /// The failure classification.
    #[must_use]
    pub fn kind(&self) -> AdapterErrorKind {
        self.kind
    }

    /// True when the error means the external object is gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == AdapterErrorKind::NotFound
    }
}

/// Remote operations for one managed resource kind.
///
/// `describe` must be read-only and must return a fully-populated
/// observation or an error; the engine does not re-validate payloads. All
/// other operations mutate the external object.
///
/// The defaulted methods back the capability hooks on [`ManagedResource`]:
/// a kind whose hooks can return true must override the matching adapter
/// method, otherwise the engine surfaces the default "unsupported" error.
#[async_trait]
pub trait ExternalClient<R: ManagedResource>: Send + Sync {
    /// Fetches the current external state. Read-only.
    async fn describe(&self, id: &ExternalId) -> Result<R::Observed, AdapterError>;

    /// Creates the external object, returning its provider-assigned handle.
    async fn create(&self, desired: &R::Desired) -> Result<ExternalId, AdapterError>;

    /// Applies the modifiable (non-tag) fields to the external object.
    async fn modify(&self, id: &ExternalId, desired: &R::Desired) -> Result<(), AdapterError>;

    /// Destroys the external object.
    async fn destroy(&self, id: &ExternalId) -> Result<(), AdapterError>;

    /// Lists the tags currently on the external object. Read-only.
    async fn list_tags(&self, id: &ExternalId) -> Result<TagSet, AdapterError>;

    /// Adds (or overwrites) the given tags on the external object.
    async fn add_tags(&self, id: &ExternalId, tags: &TagSet) -> Result<(), AdapterError>;

    /// Removes the given tags from the external object.
    async fn remove_tags(&self, id: &ExternalId, tags: &TagSet) -> Result<(), AdapterError>;

    /// One-shot renewal action.
    async fn renew(&self, _id: &ExternalId) -> Result<(), AdapterError> {
        Err(AdapterError::remote("renew is not supported for this kind"))
    }

    /// Transitions the object to a disabled state ahead of destruction.
    async fn disable(&self, _id: &ExternalId) -> Result<(), AdapterError> {
        Err(AdapterError::remote("disable is not supported for this kind"))
    }

    /// Best-effort grant issued after a successful create.
    async fn grant(&self, _id: &ExternalId) -> Result<(), AdapterError> {
        Err(AdapterError::remote("grant is not supported for this kind"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = AdapterError::not_found("no such authority");
        assert!(err.is_not_found());
        assert_eq!(err.kind(), AdapterErrorKind::NotFound);
    }

    #[test]
    fn test_throttled_is_not_not_found() {
        let err = AdapterError::throttled("rate exceeded");
        assert!(!err.is_not_found());
        assert_eq!(err.kind(), AdapterErrorKind::Throttled);
    }

    #[test]
    fn test_display_carries_message() {
        let err = AdapterError::remote("internal failure");
        assert_eq!(err.to_string(), "internal failure");
    }
}
