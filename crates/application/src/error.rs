//! Application-level errors

use domain::DomainError;
use thiserror::Error;

use crate::ports::provider::{Capability, FailureKind};

/// One entry in a failed chain invocation's attempt trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttempt {
    /// Provider identifier
    pub provider: String,
    /// How the attempt failed
    pub kind: FailureKind,
}

/// Terminal failure of a generation: the fallback chain is exhausted or was
/// short-circuited by a non-retriable failure
///
/// Carries only provider ids and failure kinds; provider-internal error text
/// never crosses this boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationError {
    /// Capability that failed
    pub capability: Capability,
    /// Terminal failure kind
    pub kind: FailureKind,
    /// Providers tried, in invocation order
    pub attempts: Vec<ProviderAttempt>,
}

impl OrchestrationError {
    /// Every provider in the chain failed with a retriable kind
    pub fn exhausted(capability: Capability, attempts: Vec<ProviderAttempt>) -> Self {
        Self {
            capability,
            kind: FailureKind::Unavailable,
            attempts,
        }
    }

    /// A non-retriable failure stopped the chain early
    pub fn short_circuit(
        capability: Capability,
        kind: FailureKind,
        attempts: Vec<ProviderAttempt>,
    ) -> Self {
        Self {
            capability,
            kind,
            attempts,
        }
    }

    /// Provider ids in the order they were tried
    pub fn tried_providers(&self) -> Vec<&str> {
        self.attempts.iter().map(|a| a.provider.as_str()).collect()
    }
}

impl std::error::Error for OrchestrationError {}

impl std::fmt::Display for OrchestrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == FailureKind::InvalidInput {
            return write!(f, "{} request rejected as invalid input", self.capability);
        }
        if self.attempts.is_empty() {
            return write!(f, "{}: no provider is configured", self.capability);
        }
        write!(
            f,
            "{} unavailable: all {} provider(s) exhausted ({})",
            self.capability,
            self.attempts.len(),
            self.tried_providers().join(", ")
        )
    }
}

/// Errors that cross the application boundary
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level validation error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Terminal generation failure with attempt trail
    #[error(transparent)]
    Generation(#[from] OrchestrationError),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error (fatal at startup, never at request time)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
