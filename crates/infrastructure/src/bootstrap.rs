//! Context assembly
//!
//! Builds the passed-down context the presentation layers share: artifact
//! store, provider chain, coordinator, estimator and rate limiter. There are
//! no ambient singletons; everything a request touches hangs off this
//! context, which is what keeps the orchestration invariants testable with a
//! fresh context per test.

use std::sync::Arc;
use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{ArtifactStorePort, Capability};
use application::services::{CostEstimator, FallbackChain, GenerationService, RateLimiter};
use tracing::info;

use ai_backends::{
    GeminiConfig, GeminiTextBackend, OpenAiConfig, OpenAiTextBackend, PexelsConfig,
    PexelsImageBackend, SpeechConfig, SpeechSynthesisBackend,
};

use crate::adapters::{ImageProviderAdapter, SpeechProviderAdapter, TextProviderAdapter};
use crate::cache::{MemoryArtifactStore, RedbArtifactStore};
use crate::config::AppConfig;

/// Everything a request handler needs, built once at startup
#[derive(Debug)]
pub struct AppContext {
    /// Generation coordinator
    pub generation: Arc<GenerationService>,
    /// Offline cost estimator
    pub estimator: Arc<CostEstimator>,
    /// Request admission gate
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppContext {
    /// Validate the configuration and assemble the context
    ///
    /// Fails fast on missing credentials or a diverging pricing table; no
    /// request is served past a broken configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        config.validate()?;

        let store: Arc<dyn ArtifactStorePort> = if config.cache.enabled {
            let path = config.cache.artifact_db_path();
            info!(path = %path.display(), "opening persistent artifact store");
            Arc::new(RedbArtifactStore::new(path)?)
        } else {
            info!("caching disabled, using in-memory artifact store");
            Arc::new(MemoryArtifactStore::new())
        };

        let chain = build_chain(config)?;
        info!(
            text_providers = ?chain.provider_ids(Capability::TextGeneration),
            speech = chain.supports(Capability::SpeechSynthesis),
            images = chain.supports(Capability::ImageSearch),
            "provider chain assembled"
        );

        Ok(Self {
            generation: Arc::new(GenerationService::new(store, chain)),
            estimator: Arc::new(CostEstimator::new(config.pricing.clone())),
            rate_limiter: Arc::new(RateLimiter::new(config.security.rate_limiter_config())),
        })
    }
}

/// Register every credentialed backend in chain order: primary text first,
/// fallback text second, then the single-provider capabilities
fn build_chain(config: &AppConfig) -> Result<FallbackChain, ApplicationError> {
    let mut chain = FallbackChain::new(Duration::from_secs(
        config.generation.attempt_timeout_secs,
    ));

    if let Some(api_key) = config.providers.primary_text.credential() {
        let mut backend_config = OpenAiConfig::with_api_key(api_key);
        if let Some(base_url) = &config.providers.primary_text.base_url {
            backend_config.base_url = base_url.clone();
        }
        if let Some(model) = &config.providers.primary_text.model {
            backend_config.model = model.clone();
        }
        backend_config.timeout_ms = config.providers.primary_text.timeout_ms;

        let backend = OpenAiTextBackend::new(backend_config)
            .map_err(|e| ApplicationError::Configuration(format!("primary text backend: {e}")))?;
        chain.register(
            Capability::TextGeneration,
            Arc::new(TextProviderAdapter::new(backend)),
        );
    }

    if let Some(api_key) = config.providers.fallback_text.credential() {
        let mut backend_config = GeminiConfig::with_api_key(api_key);
        if let Some(base_url) = &config.providers.fallback_text.base_url {
            backend_config.base_url = base_url.clone();
        }
        if let Some(model) = &config.providers.fallback_text.model {
            backend_config.model = model.clone();
        }
        backend_config.timeout_ms = config.providers.fallback_text.timeout_ms;

        let backend = GeminiTextBackend::new(backend_config)
            .map_err(|e| ApplicationError::Configuration(format!("fallback text backend: {e}")))?;
        chain.register(
            Capability::TextGeneration,
            Arc::new(TextProviderAdapter::new(backend)),
        );
    }

    if let Some(api_key) = config.providers.speech.credential() {
        let mut backend_config = SpeechConfig::with_api_key(api_key);
        if let Some(base_url) = &config.providers.speech.base_url {
            backend_config.base_url = base_url.clone();
        }
        if let Some(model) = &config.providers.speech.model {
            backend_config.model = model.clone();
        }
        backend_config.timeout_ms = config.providers.speech.timeout_ms;

        let backend = SpeechSynthesisBackend::new(backend_config)
            .map_err(|e| ApplicationError::Configuration(format!("speech backend: {e}")))?;
        chain.register(
            Capability::SpeechSynthesis,
            Arc::new(SpeechProviderAdapter::new(backend)),
        );
    }

    if let Some(api_key) = config.providers.images.credential() {
        let mut backend_config = PexelsConfig::with_api_key(api_key);
        if let Some(base_url) = &config.providers.images.base_url {
            backend_config.base_url = base_url.clone();
        }
        backend_config.timeout_ms = config.providers.images.timeout_ms;

        let backend = PexelsImageBackend::new(backend_config)
            .map_err(|e| ApplicationError::Configuration(format!("image backend: {e}")))?;
        chain.register(
            Capability::ImageSearch,
            Arc::new(ImageProviderAdapter::new(backend)),
        );
    }

    Ok(chain)
}
