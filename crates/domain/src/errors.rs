//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Invalid channel identifier
    #[error("Invalid channel: {0}")]
    InvalidChannel(String),

    /// Invalid theme text
    #[error("Invalid theme: {0}")]
    InvalidTheme(String),

    /// Unknown cost tier name
    #[error("Unknown cost tier: {0}")]
    InvalidCostTier(String),

    /// Unknown output kind name
    #[error("Unknown output kind: {0}")]
    InvalidOutputKind(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
