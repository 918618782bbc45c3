//! # Domain Errors
//!
//! Error types for the Artifact Store.
//!
//! ## Design Principles
//!
//! - `NotFound` is ordinary traffic (never issued, or already evicted)
//! - `AlreadyExists` guards write-once placement
//! - Everything the backing storage throws collapses into `Unavailable`

use thiserror::Error;

use crate::domain::ids::ArtifactId;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No artifact is stored under this id.
    #[error("artifact not found: {id}")]
    NotFound { id: ArtifactId },

    /// An artifact with this id already exists.
    #[error("artifact already exists: {id} (write-once)")]
    AlreadyExists { id: ArtifactId },

    /// The backing location cannot be created, written or read.
    #[error("storage unavailable during {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },

    /// The supplied value is not a well-formed artifact id.
    #[error("invalid artifact id: {value:?}")]
    InvalidId { value: String },
}

impl StoreError {
    /// Build an `Unavailable` error from an I/O failure.
    pub fn io(operation: &'static str, err: std::io::Error) -> Self {
        StoreError::Unavailable {
            operation,
            message: err.to_string(),
        }
    }

    /// True if this error means "no such artifact" from a client's point of view.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. } | StoreError::InvalidId { .. }
        )
    }

    /// True if this is a storage-class failure (the request cannot be served).
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable { .. } | StoreError::AlreadyExists { .. }
        )
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
