//! Moka-backed in-memory artifact store
//!
//! Ephemeral counterpart of the redb store: same port, no persistence.
//! Used in tests and when caching is disabled in configuration, so the
//! coordinator's single-flight still has a store to consult.

use std::sync::atomic::{AtomicU64, Ordering};

use application::{
    error::ApplicationError,
    ports::{ArtifactStorePort, Namespace, StoreStats, StoredArtifact},
};
use async_trait::async_trait;
use domain::Fingerprint;
use moka::future::Cache;
use tracing::{debug, instrument};

/// Default entry capacity, ample for one process lifetime
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// In-memory fingerprint-addressed artifact store
pub struct MemoryArtifactStore {
    cache: Cache<String, StoredArtifact>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for MemoryArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryArtifactStore")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemoryArtifactStore {
    /// Create a store with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store bounded to `max_entries`
    #[must_use]
    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn key(namespace: Namespace, fingerprint: &Fingerprint) -> String {
        format!("{namespace}:{fingerprint}")
    }
}

impl Default for MemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStorePort for MemoryArtifactStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(
        &self,
        namespace: Namespace,
        fingerprint: &Fingerprint,
    ) -> Result<Option<StoredArtifact>, ApplicationError> {
        let found = self.cache.get(&Self::key(namespace, fingerprint)).await;
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(%namespace, %fingerprint, "artifact hit (memory)");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(%namespace, %fingerprint, "artifact miss (memory)");
        }
        Ok(found)
    }

    #[instrument(skip(self, artifact), level = "debug")]
    async fn put(
        &self,
        namespace: Namespace,
        artifact: StoredArtifact,
    ) -> Result<(), ApplicationError> {
        let key = Self::key(namespace, &artifact.fingerprint);
        self.cache.insert(key, artifact).await;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn clear(&self, namespace: Option<Namespace>) -> Result<u64, ApplicationError> {
        match namespace {
            None => {
                self.cache.run_pending_tasks().await;
                let removed = self.cache.entry_count();
                self.cache.invalidate_all();
                self.cache.run_pending_tasks().await;
                Ok(removed)
            }
            Some(namespace) => {
                let prefix = format!("{namespace}:");
                let keys: Vec<String> = self
                    .cache
                    .iter()
                    .filter(|(key, _)| key.starts_with(&prefix))
                    .map(|(key, _)| (*key).clone())
                    .collect();
                let removed = keys.len() as u64;
                for key in keys {
                    self.cache.invalidate(&key).await;
                }
                Ok(removed)
            }
        }
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}
