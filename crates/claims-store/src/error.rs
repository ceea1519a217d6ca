//! Error types for the claim store.

use thiserror::Error;

use crate::types::ClaimId;

/// Errors that can occur in claim store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller-supplied claim fields were rejected.
    #[error("invalid claim: {0}")]
    Validation(String),

    /// No stored claim carries the given ID (or the store file is absent).
    #[error("claim not found: {0}")]
    NotFound(ClaimId),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred reading or writing the store file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store configuration is unusable.
    #[error("invalid store config: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Returns true for failures of the storage medium rather than the request.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Serialization(_))
    }
}

/// Result type alias for claim store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
