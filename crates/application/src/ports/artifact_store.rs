//! Artifact store port
//!
//! Content-addressed persistent store mapping a request fingerprint to the
//! artifact a previous generation produced. Entries are grouped by operation
//! kind into namespaces and are immutable once written; `put` on an existing
//! fingerprint replaces the entry wholesale and is only reached via an
//! explicit cache bypass.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use domain::{Fingerprint, Operation};

use crate::error::ApplicationError;

/// Storage namespace, one per operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Namespace {
    Scripts,
    Titles,
    Shorts,
    Narration,
    Images,
    ApiResponses,
}

impl Namespace {
    /// All namespaces, in storage order
    pub const ALL: [Self; 6] = [
        Self::Scripts,
        Self::Titles,
        Self::Shorts,
        Self::Narration,
        Self::Images,
        Self::ApiResponses,
    ];

    /// Directory/table name for this namespace
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Scripts => "scripts",
            Self::Titles => "titles",
            Self::Shorts => "shorts",
            Self::Narration => "narration-audio",
            Self::Images => "images",
            Self::ApiResponses => "api-responses",
        }
    }

    /// The namespace an operation's artifacts live in
    pub const fn for_operation(operation: Operation) -> Self {
        match operation {
            Operation::Script => Self::Scripts,
            Operation::Titles => Self::Titles,
            Operation::ShortsExtraction => Self::Shorts,
            Operation::Narration => Self::Narration,
            Operation::Images => Self::Images,
        }
    }

    /// Parse a namespace from its directory name
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.dir() == raw)
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir())
    }
}

/// One cached generation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArtifact {
    /// Fingerprint of the request that produced this artifact
    pub fingerprint: Fingerprint,
    /// Operation kind
    pub operation: Operation,
    /// Opaque artifact payload
    pub payload: serde_json::Value,
    /// When the artifact was produced
    pub created_at: DateTime<Utc>,
    /// Provider that produced it
    pub provider: String,
}

impl StoredArtifact {
    /// Stamp a freshly generated artifact
    pub fn new(
        fingerprint: Fingerprint,
        operation: Operation,
        payload: serde_json::Value,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            fingerprint,
            operation,
            payload,
            created_at: Utc::now(),
            provider: provider.into(),
        }
    }

    /// Decode the payload into its typed view
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, ApplicationError> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| ApplicationError::Internal(format!("artifact payload decode error: {e}")))
    }
}

/// Hit/miss counters for monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// Port for fingerprint-addressed artifact stores
///
/// Implementations must be safe to call concurrently from many orchestration
/// requests; a stored entry that cannot be decoded is reported as a miss,
/// never as an error.
#[async_trait]
pub trait ArtifactStorePort: Send + Sync + std::fmt::Debug {
    /// Look up an artifact by fingerprint
    async fn get(
        &self,
        namespace: Namespace,
        fingerprint: &Fingerprint,
    ) -> Result<Option<StoredArtifact>, ApplicationError>;

    /// Store an artifact, replacing any existing entry wholesale
    async fn put(
        &self,
        namespace: Namespace,
        artifact: StoredArtifact,
    ) -> Result<(), ApplicationError>;

    /// Remove entries in one namespace, or everywhere; returns the count removed
    async fn clear(&self, namespace: Option<Namespace>) -> Result<u64, ApplicationError>;

    /// Hit/miss counters
    fn stats(&self) -> StoreStats;
}
