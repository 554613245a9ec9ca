//! Unified error types for the domain layer

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A square label outside `a1`..`h8`
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    /// A piece identifier that is not `<color>_<kind>`
    #[error("Invalid piece: {0}")]
    InvalidPiece(String),

    /// A color other than `white` or `black`
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

impl DomainError {
    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
