//! Image provider adapter

use ai_backends::ImageSearchBackend;
use application::ports::{
    FailureKind, ProviderOutcome, ProviderPayload, ProviderPort, ProviderRequest,
};
use async_trait::async_trait;
use tracing::debug;

/// Adapts any [`ImageSearchBackend`] to the provider port
#[derive(Debug)]
pub struct ImageProviderAdapter<B: ImageSearchBackend> {
    backend: B,
}

impl<B: ImageSearchBackend> ImageProviderAdapter<B> {
    /// Wrap an image backend
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: ImageSearchBackend + std::fmt::Debug> ProviderPort for ImageProviderAdapter<B> {
    fn id(&self) -> &str {
        self.backend.id()
    }

    async fn attempt(&self, request: &ProviderRequest) -> ProviderOutcome {
        let ProviderRequest::ImageSearch { query, count } = request else {
            return ProviderOutcome::failure(
                FailureKind::InvalidInput,
                self.backend.id(),
                "image provider received a non-image request",
            );
        };

        match self.backend.search(query, *count).await {
            Ok(assets) => {
                debug!(
                    provider = self.backend.id(),
                    found = assets.len(),
                    "image search succeeded"
                );
                let units = assets.len() as u64;
                ProviderOutcome::success(
                    ProviderPayload::Images(assets),
                    units,
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
