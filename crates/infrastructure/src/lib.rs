//! Infrastructure layer for Clipforge
//!
//! Concrete implementations of the application ports: the redb-backed
//! fingerprint store, the moka-backed ephemeral store, provider adapters over
//! the backend clients, configuration loading and the bootstrap wiring that
//! assembles a runnable context.

pub mod adapters;
pub mod bootstrap;
pub mod cache;
pub mod config;

pub use adapters::{ImageProviderAdapter, SpeechProviderAdapter, TextProviderAdapter};
pub use bootstrap::AppContext;
pub use cache::{MemoryArtifactStore, RedbArtifactStore};
pub use config::AppConfig;
