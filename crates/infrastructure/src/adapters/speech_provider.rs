//! Speech provider adapter

use ai_backends::SpeechBackend;
use application::ports::{
    FailureKind, ProviderOutcome, ProviderPayload, ProviderPort, ProviderRequest,
};
use async_trait::async_trait;
use tracing::debug;

/// Adapts any [`SpeechBackend`] to the provider port
///
/// Cost units are the characters submitted for synthesis, matching the
/// estimator's narration heuristic.
#[derive(Debug)]
pub struct SpeechProviderAdapter<B: SpeechBackend> {
    backend: B,
}

impl<B: SpeechBackend> SpeechProviderAdapter<B> {
    /// Wrap a speech backend
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: SpeechBackend + std::fmt::Debug> ProviderPort for SpeechProviderAdapter<B> {
    fn id(&self) -> &str {
        self.backend.id()
    }

    async fn attempt(&self, request: &ProviderRequest) -> ProviderOutcome {
        let ProviderRequest::Speech { text, voice } = request else {
            return ProviderOutcome::failure(
                FailureKind::InvalidInput,
                self.backend.id(),
                "speech provider received a non-speech request",
            );
        };

        match self.backend.synthesize(text, voice).await {
            Ok(clip) => {
                debug!(
                    provider = self.backend.id(),
                    bytes = clip.data.len(),
                    "speech synthesis succeeded"
                );
                ProviderOutcome::success(
                    ProviderPayload::Audio {
                        media_type: clip.media_type,
                        data: clip.data,
                    },
                    text.chars().count() as u64,
                    self.backend.id(),
                )
            }
            Err(err) => ProviderOutcome::failure(
                super::failure_kind(&err),
                self.backend.id(),
                err.to_string(),
            ),
        }
    }
}
