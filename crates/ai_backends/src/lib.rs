//! Backend clients for Clipforge
//!
//! Thin reqwest clients over the generative services the orchestrator calls:
//! OpenAI-style chat completions (primary text), Gemini (fallback text),
//! OpenAI-style speech synthesis (narration) and Pexels (stock images).
//! Each client maps transport and status errors into [`BackendError`]; the
//! orchestration layer decides what is retriable.

pub mod error;
pub mod gemini;
pub mod openai;
pub mod ports;
pub mod speech;
pub mod stock_images;

pub use error::BackendError;
pub use gemini::{GeminiConfig, GeminiTextBackend};
pub use openai::{OpenAiConfig, OpenAiTextBackend};
pub use ports::{
    AudioClip, ChatCompletion, CompletionRequest, ImageSearchBackend, SpeechBackend,
    TextCompletionBackend,
};
pub use speech::{SpeechConfig, SpeechSynthesisBackend};
pub use stock_images::{PexelsConfig, PexelsImageBackend};
