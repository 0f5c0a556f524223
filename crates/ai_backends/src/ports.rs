//! Backend trait definitions and shared request/response types

use async_trait::async_trait;

use domain::ImageAsset;

use crate::error::BackendError;

/// One chat-style completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,
    /// User prompt
    pub prompt: String,
    /// Output token budget
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Build a request from its parts
    pub fn new(
        system: impl Into<String>,
        prompt: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// Completed text generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    /// Assistant message text
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Total tokens billed, when the backend reports usage
    pub total_tokens: Option<u32>,
}

/// Synthesized audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// MIME type, e.g. `audio/mpeg`
    pub media_type: String,
    /// Raw audio bytes
    pub data: Vec<u8>,
}

/// Chat-completion backend (primary or fallback text provider)
#[async_trait]
pub trait TextCompletionBackend: Send + Sync {
    /// Stable backend identifier
    fn id(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion, BackendError>;
}

/// Text-to-speech backend
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Stable backend identifier
    fn id(&self) -> &str;

    /// Synthesize narration audio
    async fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip, BackendError>;
}

/// Stock-image backend
#[async_trait]
pub trait ImageSearchBackend: Send + Sync {
    /// Stable backend identifier
    fn id(&self) -> &str;

    /// Search for up to `count` images
    async fn search(&self, query: &str, count: u8) -> Result<Vec<ImageAsset>, BackendError>;
}
