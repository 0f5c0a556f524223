//! Application layer for Clipforge
//!
//! Ports (artifact store, providers) and the services that orchestrate them:
//! the generation coordinator with its single-flight guarantee, the provider
//! fallback chain, the offline cost estimator and the request-rate gate.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, OrchestrationError, ProviderAttempt};
pub use ports::{
    ArtifactStorePort, Capability, FailureKind, Namespace, ProviderOutcome, ProviderPayload,
    ProviderPort, ProviderRequest, StoreStats, StoredArtifact,
};
pub use services::{
    Admission, CostEstimate, CostEstimator, ExecuteOptions, FallbackChain, Generated,
    GenerationService, PricingTable, RateLimiter, RateLimiterConfig, TierPricing, plan_batch,
};
