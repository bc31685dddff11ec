//! Error types and handling for the todo service
//!
//! This module defines the crate-level error returned by the service layer.
//! Store failures keep their own type (`StoreError`) and are wrapped here so
//! callers see one uniform error instead of backend machinery.

use crate::storage::StoreError;
use crate::types::TodoId;
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the todo service
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input violates the todo shape (missing field, wrong type, unknown field)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No todo carries the requested id
    #[error("Todo with ID {0} not found.")]
    NotFound(TodoId),

    /// Document store failures
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Prometheus metrics errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(id: TodoId) -> Self {
        Self::NotFound(id)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NotFound(_))
    }

    /// Check if this is a server error (5xx equivalent)
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Check if retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Store(StoreError::Unavailable { .. }))
    }
}
