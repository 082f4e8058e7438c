//! Text-generation provider abstraction
//!
//! Every substantive answer this app shows comes from a hosted model; this
//! module is the single seam through which prompts leave the process.

mod config;
mod error;
mod gemini;
mod types;

pub use config::{ConfigError, LlmConfig};
pub use error::LlmError;
#[cfg(test)]
pub use error::LlmErrorKind;
pub use gemini::GeminiService;
pub use types::{LlmRequest, LlmResponse};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for text-generation providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Submit one prompt and wait for the full response
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    prompt_chars = request.prompt.chars().count(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
