//! Port definitions for the application layer

pub mod artifact_store;
pub mod provider;

pub use artifact_store::{ArtifactStorePort, Namespace, StoreStats, StoredArtifact};
pub use provider::{
    Capability, FailureKind, ProviderOutcome, ProviderPayload, ProviderPort, ProviderRequest,
};
