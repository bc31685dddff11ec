//! Store error types and result alias.
//!
//! Every backend maps its internal failures to [`StoreError`]. Zero matched
//! or removed documents is never an error; it is reported through the
//! operation's count.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// A stored document does not have the expected shape.
    #[error("Data corruption detected: {0}")]
    Corruption(String),

    /// Backend-specific internal failure.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a corruption error
    pub fn corruption(message: impl Into<String>) -> Self {
        Self::Corruption(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
