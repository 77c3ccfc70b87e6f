//! Error types for hamenu.
//!
//! All errors are strongly typed using thiserror so callers can match on
//! the specific condition instead of parsing messages.

use thiserror::Error;

use crate::storage::StorageError;

/// Validation errors raised while accepting input from the server or user.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid entity identifier '{id}': {reason}")]
    InvalidEntityId {
        id: String,
        reason: &'static str,
    },

    #[error("Invalid live entity payload: {message}")]
    InvalidEntityPayload {
        message: String,
    },
}

/// Top-level error type for hamenu.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize menu items: {message}")]
    Serialization {
        message: String,
    },
}

impl MenuError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage backend error.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if the menu list could not be serialized.
    #[must_use]
    pub const fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

/// Result type alias for hamenu operations.
pub type MenuResult<T> = Result<T, MenuError>;
