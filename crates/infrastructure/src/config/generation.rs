//! Generation defaults

use serde::Deserialize;

/// Defaults applied when a request leaves them unspecified
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Target long-form duration in minutes
    pub duration_minutes: u32,

    /// Theme used when the caller supplies none
    pub default_theme: String,

    /// Stock images fetched per long-form video
    pub images_per_video: u8,

    /// Outer deadline per provider attempt in seconds
    ///
    /// Sits above the per-backend client timeouts so a hung connection is
    /// still converted into a retriable timeout by the chain.
    pub attempt_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 30,
            default_theme: "divine love and devotion".to_string(),
            images_per_video: 15,
            attempt_timeout_secs: 90,
        }
    }
}
