//! Speech synthesis client
//!
//! OpenAI-style `/v1/audio/speech` endpoint: JSON in, raw audio bytes out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::BackendError;
use crate::ports::{AudioClip, SpeechBackend};

/// Configuration for the speech backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as a bearer token
    pub api_key: String,

    /// TTS model to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Audio container to request
    #[serde(default = "default_format")]
    pub response_format: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "tts-1".to_string()
}

fn default_format() -> String {
    "mp3".to_string()
}

const fn default_timeout_ms() -> u64 {
    120_000 // long scripts take a while to synthesize
}

impl SpeechConfig {
    /// Minimal config with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            model: default_model(),
            response_format: default_format(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// MIME type matching the configured container
    pub fn media_type(&self) -> &'static str {
        match self.response_format.as_str() {
            "opus" => "audio/opus",
            "aac" => "audio/aac",
            "flac" => "audio/flac",
            "wav" => "audio/wav",
            _ => "audio/mpeg",
        }
    }
}

/// Speech synthesis backend
pub struct SpeechSynthesisBackend {
    client: Client,
    config: SpeechConfig,
}

impl std::fmt::Debug for SpeechSynthesisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSynthesisBackend")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl SpeechSynthesisBackend {
    /// Create a new backend client
    pub fn new(config: SpeechConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        info!(base_url = %config.base_url, model = %config.model, "initialized speech backend");

        Ok(Self { client, config })
    }

    fn speech_url(&self) -> String {
        format!(
            "{}/v1/audio/speech",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequestBody {
    model: String,
    input: String,
    voice: String,
    response_format: String,
}

#[async_trait]
impl SpeechBackend for SpeechSynthesisBackend {
    fn id(&self) -> &str {
        "openai-tts"
    }

    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip, BackendError> {
        let body = SpeechRequestBody {
            model: self.config.model.clone(),
            input: text.to_string(),
            voice: voice.to_string(),
            response_format: self.config.response_format.clone(),
        };

        debug!("sending speech synthesis request");

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "speech synthesis request failed");
            return Err(BackendError::from_status(status, body));
        }

        let data = response.bytes().await?.to_vec();
        if data.is_empty() {
            return Err(BackendError::InvalidResponse(
                "speech response was empty".to_string(),
            ));
        }

        Ok(AudioClip {
            media_type: self.config.media_type().to_string(),
            data,
        })
    }
}
