//! Error types for identifier parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier string is empty.
    #[error("identifier cannot be empty")]
    Empty,

    /// The identifier has an invalid prefix.
    #[error("invalid identifier prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix {
        expected: &'static str,
        actual: String,
    },

    /// The identifier is missing the underscore separator.
    #[error("identifier missing underscore separator")]
    MissingSeparator,

    /// The ULID portion of the identifier is invalid.
    #[error("invalid ULID: {0}")]
    InvalidUlid(String),

    /// The external identifier exceeds the maximum accepted length.
    #[error("external identifier too long: {len} bytes (max {max})")]
    TooLong { len: usize, max: usize },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }

    /// Returns true if this error indicates a prefix mismatch.
    pub fn is_prefix_error(&self) -> bool {
        matches!(self, IdError::InvalidPrefix { .. })
    }
}
