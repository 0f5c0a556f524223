//! Provider port
//!
//! Uniform interface over the generative backends. Every attempt produces a
//! tagged [`ProviderOutcome`] instead of raising — the fallback chain's
//! advance-or-stop rule works on these outcomes only, so no exception-style
//! control flow crosses a provider boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use domain::{ImageAsset, Operation};

/// A backend capability providers are registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Script, title and shorts text generation
    TextGeneration,
    /// Narration audio synthesis
    SpeechSynthesis,
    /// Stock image lookup
    ImageSearch,
}

impl Capability {
    /// The capability that serves an operation
    pub const fn for_operation(operation: Operation) -> Self {
        match operation {
            Operation::Script | Operation::Titles | Operation::ShortsExtraction => {
                Self::TextGeneration
            }
            Operation::Narration => Self::SpeechSynthesis,
            Operation::Images => Self::ImageSearch,
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextGeneration => write!(f, "text-generation"),
            Self::SpeechSynthesis => write!(f, "speech-synthesis"),
            Self::ImageSearch => write!(f, "image-search"),
        }
    }
}

/// What a provider is asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderRequest {
    /// Chat-style text generation
    Text {
        system: String,
        prompt: String,
        max_tokens: u32,
    },
    /// Text-to-speech synthesis
    Speech { text: String, voice: String },
    /// Stock image lookup
    ImageSearch { query: String, count: u8 },
}

impl ProviderRequest {
    /// Capability this request needs
    pub const fn capability(&self) -> Capability {
        match self {
            Self::Text { .. } => Capability::TextGeneration,
            Self::Speech { .. } => Capability::SpeechSynthesis,
            Self::ImageSearch { .. } => Capability::ImageSearch,
        }
    }
}

/// Raw payload a provider produced
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    /// Generated text
    Text(String),
    /// Synthesized audio
    Audio { media_type: String, data: Vec<u8> },
    /// Image search results
    Images(Vec<ImageAsset>),
}

/// How a provider attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Quota or rate limit hit at the provider
    QuotaExceeded,
    /// Provider unreachable or erroring
    Unavailable,
    /// The request itself is bad; retrying elsewhere cannot help
    InvalidInput,
    /// Attempt exceeded its deadline
    Timeout,
}

impl FailureKind {
    /// Whether the fallback chain may advance past this failure
    pub const fn is_retriable(self) -> bool {
        !matches!(self, Self::InvalidInput)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded => write!(f, "quota exceeded"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::InvalidInput => write!(f, "invalid input"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// Result of one provider attempt
#[derive(Debug, Clone)]
pub enum ProviderOutcome {
    /// The attempt produced a payload
    Success {
        payload: ProviderPayload,
        /// Units consumed (tokens, characters or items, per capability)
        cost_units: u64,
        provider: String,
    },
    /// The attempt failed
    Failure {
        kind: FailureKind,
        provider: String,
        retriable: bool,
        /// Provider-internal detail, logged but never surfaced to callers
        message: String,
    },
}

impl ProviderOutcome {
    /// Successful attempt
    pub fn success(
        payload: ProviderPayload,
        cost_units: u64,
        provider: impl Into<String>,
    ) -> Self {
        Self::Success {
            payload,
            cost_units,
            provider: provider.into(),
        }
    }

    /// Failed attempt; retriability follows from the kind
    pub fn failure(
        kind: FailureKind,
        provider: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Failure {
            kind,
            provider: provider.into(),
            retriable: kind.is_retriable(),
            message: message.into(),
        }
    }
}

/// Port every provider adapter implements
///
/// Providers are registered per capability; adding a backend is a
/// registration, not a branch.
#[async_trait]
pub trait ProviderPort: Send + Sync {
    /// Stable provider identifier (e.g. "openai", "gemini")
    fn id(&self) -> &str;

    /// Make one attempt at the request
    async fn attempt(&self, request: &ProviderRequest) -> ProviderOutcome;
}
