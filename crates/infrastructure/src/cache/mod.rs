//! Artifact store implementations
//!
//! - [`RedbArtifactStore`]: persistent, namespaced, fingerprint-addressed
//! - [`MemoryArtifactStore`]: moka-backed, for tests and cache-disabled runs

mod memory_store;
mod redb_store;

pub use memory_store::MemoryArtifactStore;
pub use redb_store::RedbArtifactStore;
