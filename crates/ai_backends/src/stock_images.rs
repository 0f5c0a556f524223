//! Pexels stock image client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use domain::ImageAsset;

use crate::error::BackendError;
use crate::ports::ImageSearchBackend;

/// Configuration for the Pexels backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PexelsConfig {
    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent in the Authorization header
    pub api_key: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.pexels.com".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

impl PexelsConfig {
    /// Minimal config with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Pexels photo search backend
pub struct PexelsImageBackend {
    client: Client,
    config: PexelsConfig,
}

impl std::fmt::Debug for PexelsImageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PexelsImageBackend")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl PexelsImageBackend {
    /// Create a new backend client
    pub fn new(config: PexelsConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        info!(base_url = %config.base_url, "initialized Pexels image backend");

        Ok(Self { client, config })
    }

    fn search_url(&self) -> String {
        format!("{}/v1/search", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    width: u32,
    height: u32,
    #[serde(default)]
    alt: String,
    src: PhotoSrc,
}

#[derive(Debug, Deserialize)]
struct PhotoSrc {
    large2x: String,
}

#[async_trait]
impl ImageSearchBackend for PexelsImageBackend {
    fn id(&self) -> &str {
        "pexels"
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, count: u8) -> Result<Vec<ImageAsset>, BackendError> {
        debug!("sending image search request");

        let response = self
            .client
            .get(self.search_url())
            .header("Authorization", &self.config.api_key)
            .query(&[("query", query), ("per_page", &count.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "image search request failed");
            return Err(BackendError::from_status(status, body));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .photos
            .into_iter()
            .map(|photo| ImageAsset {
                url: photo.src.large2x,
                alt: photo.alt,
                width: photo.width,
                height: photo.height,
            })
            .collect())
    }
}
