//! Serializer error types
//!
//! # Design
//! Uses thiserror for ergonomic error definitions. Decoding reports at most one
//! error per call (the first failure wins); encoding a well-formed model never
//! fails, so encoder entry points return plain values.

use thiserror::Error;

/// Firestore serializer errors
///
/// Mirrors the two status codes the wire codec can produce. Both are
/// recoverable: the caller rejects the offending message and carries on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FirestoreError {
    /// Invalid argument (e.g. a resource name for the wrong database)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed, truncated or structurally invalid wire data
    #[error("Data loss: {0}")]
    DataLoss(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FirestoreError>;

impl FirestoreError {
    /// Create a data-loss error from a message
    pub fn data_loss(msg: impl Into<String>) -> Self {
        Self::DataLoss(msg.into())
    }

    /// Create an invalid-argument error from a message
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// gRPC status code equivalent of this error
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 3,
            Self::DataLoss(_) => 15,
        }
    }

    /// Check if error was caused by corrupt or truncated input
    pub fn is_data_loss(&self) -> bool {
        matches!(self, Self::DataLoss(_))
    }

    /// Check if error was caused by a rejected argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
