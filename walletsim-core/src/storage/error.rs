//! Error types for the key-value storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store rejected or failed an operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A persisted record could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Creates a backend error from any displayable cause.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a serialization error from any displayable cause.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}
