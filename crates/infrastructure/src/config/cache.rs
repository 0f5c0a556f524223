//! Artifact cache configuration

use std::path::PathBuf;

use serde::Deserialize;

/// Artifact cache settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Persist artifacts on disk; disabled keeps an in-memory store only
    pub enabled: bool,
    /// Directory the artifact database lives in
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(".cache/clipforge"),
        }
    }
}

impl CacheConfig {
    /// Path of the artifact database file
    pub fn artifact_db_path(&self) -> PathBuf {
        self.dir.join("artifacts.redb")
    }
}
