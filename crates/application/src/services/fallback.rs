//! Provider fallback chain
//!
//! Ordered list of interchangeable providers per capability. Invocation tries
//! providers strictly in registration order, advances only past retriable
//! failures, and aggregates the attempt trail when the chain is exhausted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{OrchestrationError, ProviderAttempt};
use crate::ports::provider::{
    Capability, FailureKind, ProviderOutcome, ProviderPayload, ProviderPort, ProviderRequest,
};

/// Successful chain invocation
#[derive(Debug, Clone)]
pub struct ChainSuccess {
    /// Raw provider payload
    pub payload: ProviderPayload,
    /// Units the winning attempt consumed
    pub cost_units: u64,
    /// Provider that served the request
    pub provider: String,
}

/// Capability → ordered provider registry
///
/// Provider-count-agnostic: a chain of length one simply has no fallback,
/// and a third provider is added by registration, not by new branching.
pub struct FallbackChain {
    providers: HashMap<Capability, Vec<Arc<dyn ProviderPort>>>,
    attempt_timeout: Duration,
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registry = f.debug_map();
        for (capability, chain) in &self.providers {
            registry.entry(
                capability,
                &chain.iter().map(|p| p.id().to_string()).collect::<Vec<_>>(),
            );
        }
        registry.finish()
    }
}

impl FallbackChain {
    /// Create an empty chain with a per-attempt timeout
    pub fn new(attempt_timeout: Duration) -> Self {
        Self {
            providers: HashMap::new(),
            attempt_timeout,
        }
    }

    /// Register a provider at the end of a capability's chain
    pub fn register(&mut self, capability: Capability, provider: Arc<dyn ProviderPort>) {
        self.providers.entry(capability).or_default().push(provider);
    }

    /// Builder-style [`register`](Self::register)
    #[must_use]
    pub fn with_provider(
        mut self,
        capability: Capability,
        provider: Arc<dyn ProviderPort>,
    ) -> Self {
        self.register(capability, provider);
        self
    }

    /// Provider ids registered for a capability, in order
    pub fn provider_ids(&self, capability: Capability) -> Vec<&str> {
        self.providers
            .get(&capability)
            .map(|chain| chain.iter().map(|p| p.id()).collect())
            .unwrap_or_default()
    }

    /// Whether any provider serves the capability
    pub fn supports(&self, capability: Capability) -> bool {
        self.providers
            .get(&capability)
            .is_some_and(|chain| !chain.is_empty())
    }

    /// Try providers in order until one succeeds or the chain is exhausted
    pub async fn invoke(
        &self,
        request: &ProviderRequest,
    ) -> Result<ChainSuccess, OrchestrationError> {
        let capability = request.capability();
        let chain = self.providers.get(&capability).map_or(&[][..], Vec::as_slice);

        let mut attempts: Vec<ProviderAttempt> = Vec::new();

        for provider in chain {
            let outcome = match tokio::time::timeout(
                self.attempt_timeout,
                provider.attempt(request),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => ProviderOutcome::failure(
                    FailureKind::Timeout,
                    provider.id(),
                    format!("attempt exceeded {:?}", self.attempt_timeout),
                ),
            };

            match outcome {
                ProviderOutcome::Success {
                    payload,
                    cost_units,
                    provider,
                } => {
                    debug!(%capability, %provider, cost_units, "provider attempt succeeded");
                    return Ok(ChainSuccess {
                        payload,
                        cost_units,
                        provider,
                    });
                }
                ProviderOutcome::Failure {
                    kind,
                    provider,
                    retriable,
                    message,
                } => {
                    warn!(
                        %capability,
                        %provider,
                        %kind,
                        retriable,
                        detail = %message,
                        "provider attempt failed"
                    );
                    attempts.push(ProviderAttempt { provider, kind });
                    if !retriable {
                        return Err(OrchestrationError::short_circuit(
                            capability, kind, attempts,
                        ));
                    }
                }
            }
        }

        Err(OrchestrationError::exhausted(capability, attempts))
    }
}
