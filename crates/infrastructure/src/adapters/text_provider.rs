//! Text provider adapter

use ai_backends::{CompletionRequest, TextCompletionBackend};
use application::ports::{
    FailureKind, ProviderOutcome, ProviderPayload, ProviderPort, ProviderRequest,
};
use async_trait::async_trait;
use tracing::debug;

/// Adapts any [`TextCompletionBackend`] to the provider port
#[derive(Debug)]
pub struct TextProviderAdapter<B: TextCompletionBackend> {
    backend: B,
}

impl<B: TextCompletionBackend> TextProviderAdapter<B> {
    /// Wrap a text backend
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: TextCompletionBackend + std::fmt::Debug> ProviderPort for TextProviderAdapter<B> {
    fn id(&self) -> &str {
        self.backend.id()
    }

    async fn attempt(&self, request: &ProviderRequest) -> ProviderOutcome {
        let ProviderRequest::Text {
            system,
            prompt,
            max_tokens,
        } = request
        else {
            return ProviderOutcome::failure(
                FailureKind::InvalidInput,
                self.backend.id(),
                "text provider received a non-text request",
            );
        };

        let completion_request = CompletionRequest::new(system, prompt, *max_tokens);

        match self.backend.complete(&completion_request).await {
            Ok(completion) => {
                debug!(
                    provider = self.backend.id(),
                    tokens = completion.total_tokens,
                    "text generation succeeded"
                );
                ProviderOutcome::success(
                    ProviderPayload::Text(completion.content),
                    u64::from(completion.total_tokens.unwrap_or(0)),
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
