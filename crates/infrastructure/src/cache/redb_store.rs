//! Redb-backed fingerprint store
//!
//! One redb table per namespace, keyed by fingerprint hex. Entries are
//! immutable once written; `put` is insert-or-replace and only the explicit
//! bypass path reaches an existing key.
//!
//! Corruption never surfaces: an envelope that fails to decode is logged,
//! lazily deleted and reported as a miss so the coordinator regenerates it,
//! and a database file that cannot be opened is removed and recreated.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use application::{
    error::ApplicationError,
    ports::{ArtifactStorePort, Namespace, StoreStats, StoredArtifact},
};
use async_trait::async_trait;
use bincode::{Decode, Encode};
use chrono::{DateTime, Utc};
use domain::{Fingerprint, Operation};
use redb::ReadableTableMetadata;
use redb::{Database, ReadableDatabase, TableDefinition};
use tracing::{debug, instrument, warn};

const SCRIPTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("scripts");
const TITLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("titles");
const SHORTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("shorts");
const NARRATION_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("narration-audio");
const IMAGES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("images");
const API_RESPONSES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("api-responses");

const fn table_for(namespace: Namespace) -> TableDefinition<'static, &'static str, &'static [u8]> {
    match namespace {
        Namespace::Scripts => SCRIPTS_TABLE,
        Namespace::Titles => TITLES_TABLE,
        Namespace::Shorts => SHORTS_TABLE,
        Namespace::Narration => NARRATION_TABLE,
        Namespace::Images => IMAGES_TABLE,
        Namespace::ApiResponses => API_RESPONSES_TABLE,
    }
}

/// On-disk envelope around an artifact
#[derive(Debug, Encode, Decode)]
struct StoredEnvelope {
    /// Operation tag
    operation: String,
    /// Artifact payload as JSON bytes
    payload: Vec<u8>,
    /// Unix seconds
    created_at: i64,
    /// Producing provider
    provider: String,
}

/// Persistent fingerprint-addressed artifact store
///
/// # Auto-recovery
///
/// If the database file is corrupted or incompatible, the store deletes and
/// recreates it rather than failing to start.
pub struct RedbArtifactStore {
    db: Arc<Database>,
    path: Option<PathBuf>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for RedbArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbArtifactStore")
            .field("path", &self.path)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl RedbArtifactStore {
    /// Open (or create) the store at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ApplicationError> {
        let path_buf = path.as_ref().to_path_buf();

        if let Some(parent) = path_buf.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ApplicationError::Internal(format!("Failed to create cache directory: {e}"))
                })?;
            }
        }

        let db = match Database::create(&path_buf) {
            Ok(db) => db,
            Err(e) => {
                warn!(
                    path = %path_buf.display(),
                    error = %e,
                    "artifact database corrupted or incompatible, recreating"
                );
                if path_buf.exists() {
                    fs::remove_file(&path_buf).map_err(|e| {
                        ApplicationError::Internal(format!(
                            "Failed to remove corrupted database: {e}"
                        ))
                    })?;
                }
                Database::create(&path_buf).map_err(|e| {
                    ApplicationError::Internal(format!("Failed to create artifact database: {e}"))
                })?
            }
        };

        let store = Self {
            db: Arc::new(db),
            path: Some(path_buf),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        };
        store.ensure_tables()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, ApplicationError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| {
                ApplicationError::Internal(format!("Failed to create in-memory database: {e}"))
            })?;

        let store = Self {
            db: Arc::new(db),
            path: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        };
        store.ensure_tables()?;
        Ok(store)
    }

    /// Open every namespace table so later read transactions find them
    fn ensure_tables(&self) -> Result<(), ApplicationError> {
        let write_txn = self.db.begin_write().map_err(|e| {
            ApplicationError::Internal(format!("Failed to begin write transaction: {e}"))
        })?;
        {
            for namespace in Namespace::ALL {
                let _ = write_txn.open_table(table_for(namespace)).map_err(|e| {
                    ApplicationError::Internal(format!("Failed to open {namespace} table: {e}"))
                })?;
            }
        }
        write_txn.commit().map_err(|e| {
            ApplicationError::Internal(format!("Failed to commit transaction: {e}"))
        })?;
        Ok(())
    }

    /// Decode an envelope; `None` means damaged and to be treated as a miss
    fn decode_envelope(
        fingerprint: Fingerprint,
        bytes: &[u8],
    ) -> Option<StoredArtifact> {
        let config = bincode::config::standard();
        let (envelope, _): (StoredEnvelope, _) =
            bincode::decode_from_slice(bytes, config).ok()?;
        let operation = Operation::parse(&envelope.operation)?;
        let payload: serde_json::Value = serde_json::from_slice(&envelope.payload).ok()?;
        let created_at: DateTime<Utc> =
            DateTime::from_timestamp(envelope.created_at, 0).unwrap_or_default();

        Some(StoredArtifact {
            fingerprint,
            operation,
            payload,
            created_at,
            provider: envelope.provider,
        })
    }

    /// Best-effort removal of a damaged entry
    fn remove_entry(&self, namespace: Namespace, key: String) {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            if let Ok(write_txn) = db.begin_write() {
                let removed = write_txn
                    .open_table(table_for(namespace))
                    .is_ok_and(|mut table| table.remove(key.as_str()).is_ok());
                if removed {
                    let _ = write_txn.commit();
                }
            }
        });
    }

    fn namespace_len(&self, namespace: Namespace) -> u64 {
        self.db
            .begin_read()
            .ok()
            .and_then(|txn| txn.open_table(table_for(namespace)).ok())
            .and_then(|table| table.len().ok())
            .unwrap_or(0)
    }

    /// Drop and recreate one namespace table, returning the entry count
    fn clear_namespace(db: &Database, namespace: Namespace) -> Result<u64, redb::Error> {
        let removed = {
            let read_txn = db.begin_read()?;
            read_txn.open_table(table_for(namespace))?.len()?
        };

        let write_txn = db.begin_write()?;
        write_txn.delete_table(table_for(namespace))?;
        {
            let _ = write_txn.open_table(table_for(namespace))?;
        }
        write_txn.commit()?;

        Ok(removed)
    }

    /// Plant raw bytes under a fingerprint (test-only corruption helper)
    #[cfg(test)]
    fn insert_raw(
        &self,
        namespace: Namespace,
        fingerprint: &Fingerprint,
        bytes: Vec<u8>,
    ) -> Result<(), ApplicationError> {
        let write_txn = self.db.begin_write().map_err(|e| {
            ApplicationError::Internal(format!("Failed to begin write transaction: {e}"))
        })?;
        {
            let mut table = write_txn.open_table(table_for(namespace)).map_err(|e| {
                ApplicationError::Internal(format!("Failed to open table: {e}"))
            })?;
            table
                .insert(fingerprint.to_hex().as_str(), bytes.as_slice())
                .map_err(|e| ApplicationError::Internal(format!("Insert error: {e}")))?;
        }
        write_txn.commit().map_err(|e| {
            ApplicationError::Internal(format!("Failed to commit transaction: {e}"))
        })?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactStorePort for RedbArtifactStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(
        &self,
        namespace: Namespace,
        fingerprint: &Fingerprint,
    ) -> Result<Option<StoredArtifact>, ApplicationError> {
        let db = Arc::clone(&self.db);
        let key = fingerprint.to_hex();

        // Redb operations are blocking, wrap in spawn_blocking
        let result = tokio::task::spawn_blocking({
            let key = key.clone();
            move || {
                let read_txn = db.begin_read()?;
                let table = read_txn.open_table(table_for(namespace))?;
                Ok::<_, redb::Error>(table.get(key.as_str())?.map(|v| v.value().to_vec()))
            }
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| ApplicationError::Internal(format!("Artifact store read error: {e}")))?;

        let Some(bytes) = result else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(%namespace, %fingerprint, "artifact miss");
            return Ok(None);
        };

        match Self::decode_envelope(*fingerprint, &bytes) {
            Some(artifact) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(%namespace, %fingerprint, "artifact hit");
                Ok(Some(artifact))
            }
            None => {
                // Damaged entry: self-healing via regeneration, never fatal
                self.misses.fetch_add(1, Ordering::Relaxed);
                warn!(%namespace, %fingerprint, "damaged artifact entry, treating as miss");
                self.remove_entry(namespace, key);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, artifact), level = "debug")]
    async fn put(
        &self,
        namespace: Namespace,
        artifact: StoredArtifact,
    ) -> Result<(), ApplicationError> {
        let payload = serde_json::to_vec(&artifact.payload)
            .map_err(|e| ApplicationError::Internal(format!("Payload serialize error: {e}")))?;
        let envelope = StoredEnvelope {
            operation: artifact.operation.tag().to_string(),
            payload,
            created_at: artifact.created_at.timestamp(),
            provider: artifact.provider,
        };

        let config = bincode::config::standard();
        let envelope_bytes = bincode::encode_to_vec(&envelope, config)
            .map_err(|e| ApplicationError::Internal(format!("Envelope serialize error: {e}")))?;

        let db = Arc::clone(&self.db);
        let key = artifact.fingerprint.to_hex();

        tokio::task::spawn_blocking({
            let key = key.clone();
            move || {
                let write_txn = db.begin_write()?;
                {
                    let mut table = write_txn.open_table(table_for(namespace))?;
                    table.insert(key.as_str(), envelope_bytes.as_slice())?;
                }
                write_txn.commit()?;
                Ok::<_, redb::Error>(())
            }
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| ApplicationError::Internal(format!("Artifact store write error: {e}")))?;

        debug!(%namespace, fingerprint = %key, "artifact stored");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn clear(&self, namespace: Option<Namespace>) -> Result<u64, ApplicationError> {
        let db = Arc::clone(&self.db);

        let removed = tokio::task::spawn_blocking(move || {
            let mut removed = 0u64;
            let targets: Vec<Namespace> =
                namespace.map_or_else(|| Namespace::ALL.to_vec(), |ns| vec![ns]);
            for target in targets {
                removed += Self::clear_namespace(&db, target)?;
            }
            Ok::<_, redb::Error>(removed)
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
        .map_err(|e| ApplicationError::Internal(format!("Artifact store clear error: {e}")))?;

        debug!(removed, "artifact store cleared");
        Ok(removed)
    }

    fn stats(&self) -> StoreStats {
        let entries = Namespace::ALL
            .into_iter()
            .map(|ns| self.namespace_len(ns))
            .sum();

        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }
}
