//! Environment-sourced configuration for the Gemini client

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-pro-latest";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Why the Gemini client could not be configured
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("GEMINI_API_KEY is empty")]
    EmptyApiKey,
    #[error("invalid HTTP client configuration: {0}")]
    Client(String),
}

/// Configuration for the text-generation provider
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Model identifier; defaults to [`DEFAULT_MODEL`]
    pub model: Option<String>,
    /// API root, overridable for gateways and tests
    pub base_url: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            model: std::env::var("GEMINI_MODEL").ok().filter(|m| !m.is_empty()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .ok()
                .filter(|u| !u.is_empty()),
        }
    }

    /// Return the credential, or the reason it is unusable
    pub fn validate(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref() {
            None => Err(ConfigError::MissingApiKey),
            Some(key) if key.trim().is_empty() => Err(ConfigError::EmptyApiKey),
            Some(key) => Ok(key),
        }
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}
