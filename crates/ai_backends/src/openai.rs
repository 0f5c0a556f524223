//! OpenAI-compatible chat completions client
//!
//! Primary text backend. Any server speaking the `/v1/chat/completions`
//! wire format works here, which is also what the test harness mocks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::BackendError;
use crate::ports::{ChatCompletion, CompletionRequest, TextCompletionBackend};

/// Configuration for the OpenAI text backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as a bearer token
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
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_timeout_ms() -> u64 {
    60000 // 60 seconds
}

impl OpenAiConfig {
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

/// OpenAI-compatible chat completions backend
pub struct OpenAiTextBackend {
    client: Client,
    config: OpenAiConfig,
}

impl std::fmt::Debug for OpenAiTextBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTextBackend")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiTextBackend {
    /// Create a new backend client
    pub fn new(config: OpenAiConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        info!(base_url = %config.base_url, model = %config.model, "initialized OpenAI text backend");

        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatRequestBody {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[async_trait]
impl TextCompletionBackend for OpenAiTextBackend {
    fn id(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion, BackendError> {
        let body = ChatRequestBody {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt.clone(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: request.max_tokens,
        };

        debug!("sending chat completion request");

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "chat completion request failed");
            return Err(BackendError::from_status(status, body));
        }

        let parsed: ChatResponseBody = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| BackendError::InvalidResponse("response had no choices".to_string()))?;

        Ok(ChatCompletion {
            content,
            model: parsed.model,
            total_tokens: parsed.usage.map(|u| u.total_tokens),
        })
    }
}
