//! Authentication and rate limiting configuration

use std::time::Duration;

use application::services::RateLimiterConfig;
use secrecy::SecretString;
use serde::Deserialize;

/// Security settings for the HTTP surface
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shared API key; when unset, authentication is disabled
    pub api_key: Option<SecretString>,

    /// Enable per-identity rate limiting
    pub rate_limit_enabled: bool,

    /// Admitted requests per window per identity
    pub rate_limit_rpm: u32,

    /// Window horizon in seconds
    pub rate_limit_window_secs: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            rate_limit_enabled: true,
            rate_limit_rpm: 10,
            rate_limit_window_secs: 60,
        }
    }
}

impl SecurityConfig {
    /// Limiter configuration derived from these settings
    pub const fn rate_limiter_config(&self) -> RateLimiterConfig {
        RateLimiterConfig {
            max_requests: self.rate_limit_rpm,
            window: Duration::from_secs(self.rate_limit_window_secs),
        }
    }
}
