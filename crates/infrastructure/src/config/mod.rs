//! Application configuration
//!
//! Loaded from `clipforge.toml` plus `CLIPFORGE_*` environment overrides at
//! process start. Every field has a default; what cannot be defaulted
//! (provider credentials) is checked by [`AppConfig::validate`] before the
//! process serves anything, so a misconfiguration is a startup failure and
//! never a request-time one.

mod cache;
mod generation;
mod providers;
mod security;
mod server;

use application::error::ApplicationError;
use application::services::PricingTable;
use serde::Deserialize;

pub use cache::CacheConfig;
pub use generation::GenerationConfig;
pub use providers::{
    ImageProviderConfig, ProvidersConfig, SpeechProviderConfig, TextProviderConfig,
};
pub use security::SecurityConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Authentication and rate limiting
    pub security: SecurityConfig,

    /// Artifact cache settings
    pub cache: CacheConfig,

    /// Generative backend credentials and endpoints
    pub providers: ProvidersConfig,

    /// Shared unit-price table for dry-run and live accounting
    pub pricing: PricingTable,

    /// Generation defaults
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Load configuration from `clipforge.toml` and `CLIPFORGE_*` env vars
    ///
    /// Missing file and missing variables fall back to defaults; validation
    /// is a separate step so defaults remain loadable in tests.
    pub fn load() -> Result<Self, ApplicationError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("clipforge").required(false))
            .add_source(config::Environment::with_prefix("CLIPFORGE").separator("__"))
            .build()
            .map_err(|e| ApplicationError::Configuration(format!("config load error: {e}")))?;

        settings
            .try_deserialize()
            .map_err(|e| ApplicationError::Configuration(format!("config parse error: {e}")))
    }

    /// Fail fast on anything the process cannot serve with
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.pricing.validate()?;

        if !self.providers.primary_text.has_credentials()
            && !self.providers.fallback_text.has_credentials()
        {
            return Err(ApplicationError::Configuration(
                "no text provider is configured; set providers.primary_text.api_key or \
                 providers.fallback_text.api_key"
                    .to_string(),
            ));
        }
        if self.providers.speech.enabled && self.providers.speech.api_key.is_none() {
            return Err(ApplicationError::Configuration(
                "providers.speech is enabled but has no api_key".to_string(),
            ));
        }
        if self.providers.images.enabled && self.providers.images.api_key.is_none() {
            return Err(ApplicationError::Configuration(
                "providers.images is enabled but has no api_key".to_string(),
            ));
        }

        if self.security.rate_limit_window_secs == 0 {
            return Err(ApplicationError::Configuration(
                "security.rate_limit_window_secs must be positive".to_string(),
            ));
        }
        if self.generation.duration_minutes == 0 {
            return Err(ApplicationError::Configuration(
                "generation.duration_minutes must be positive".to_string(),
            ));
        }
        if self.generation.attempt_timeout_secs == 0 {
            return Err(ApplicationError::Configuration(
                "generation.attempt_timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
