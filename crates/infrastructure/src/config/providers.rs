//! Generative backend configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// All backend endpoints and credentials
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Primary text provider (OpenAI-compatible)
    pub primary_text: TextProviderConfig,
    /// Fallback text provider (Gemini)
    pub fallback_text: TextProviderConfig,
    /// Narration synthesis provider
    pub speech: SpeechProviderConfig,
    /// Stock image provider
    pub images: ImageProviderConfig,
}

/// One text backend's settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextProviderConfig {
    /// Register this provider in the chain
    pub enabled: bool,
    /// API key; absent means the provider is skipped
    pub api_key: Option<SecretString>,
    /// Override the backend's default base URL
    pub base_url: Option<String>,
    /// Override the backend's default model
    pub model: Option<String>,
    /// Per-request client timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for TextProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: None,
            model: None,
            timeout_ms: 60000,
        }
    }
}

impl TextProviderConfig {
    /// Whether this provider is enabled with a credential
    pub const fn has_credentials(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }

    /// The exposed credential, when enabled and present
    pub fn credential(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().to_string())
    }
}

/// Speech synthesis backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechProviderConfig {
    /// Register the narration capability
    pub enabled: bool,
    /// API key; required while enabled
    pub api_key: Option<SecretString>,
    /// Override the backend's default base URL
    pub base_url: Option<String>,
    /// Override the backend's default TTS model
    pub model: Option<String>,
    /// Narration voice
    pub voice: String,
    /// Per-request client timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SpeechProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: None,
            model: None,
            voice: "alloy".to_string(),
            timeout_ms: 120_000,
        }
    }
}

impl SpeechProviderConfig {
    /// The exposed credential, when enabled and present
    pub fn credential(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().to_string())
    }
}

/// Stock image backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageProviderConfig {
    /// Register the image capability
    pub enabled: bool,
    /// API key; required while enabled
    pub api_key: Option<SecretString>,
    /// Override the backend's default base URL
    pub base_url: Option<String>,
    /// Per-request client timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ImageProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: None,
            timeout_ms: 30000,
        }
    }
}

impl ImageProviderConfig {
    /// The exposed credential, when enabled and present
    pub fn credential(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().to_string())
    }
}
