//! Google Gemini generateContent client
//!
//! Fallback text backend. Keeps the same [`TextCompletionBackend`] surface as
//! the primary so the fallback chain can hold both behind one trait object.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::BackendError;
use crate::ports::{ChatCompletion, CompletionRequest, TextCompletionBackend};

/// Configuration for the Gemini text backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key passed as a query parameter
    pub api_key: String,

    /// Model to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_timeout_ms() -> u64 {
    60000 // 60 seconds
}

impl GeminiConfig {
    /// Minimal config with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Gemini generateContent backend
pub struct GeminiTextBackend {
    client: Client,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiTextBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTextBackend")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl GeminiTextBackend {
    /// Create a new backend client
    pub fn new(config: GeminiConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        info!(base_url = %config.base_url, model = %config.model, "initialized Gemini text backend");

        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequestBody {
    system_instruction: ContentPart,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct ContentPart {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponseBody {
    candidates: Vec<Candidate>,
    #[serde(default, rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "totalTokenCount")]
    total_token_count: u32,
}

#[async_trait]
impl TextCompletionBackend for GeminiTextBackend {
    fn id(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion, BackendError> {
        let body = GenerateRequestBody {
            system_instruction: ContentPart {
                parts: vec![TextPart {
                    text: request.system.clone(),
                }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: self.config.temperature,
            },
        };

        debug!("sending generateContent request");

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "generateContent request failed");
            return Err(BackendError::from_status(status, body));
        }

        let parsed: GenerateResponseBody = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                BackendError::InvalidResponse("response had no candidates".to_string())
            })?;

        Ok(ChatCompletion {
            content,
            model: self.config.model.clone(),
            total_tokens: parsed.usage_metadata.map(|u| u.total_token_count),
        })
    }
}
