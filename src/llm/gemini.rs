//! Google Gemini provider implementation

use super::config::{ConfigError, LlmConfig};
use super::types::{LlmRequest, LlmResponse, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini `generateContent` client
pub struct GeminiService {
    client: Client,
    api_key: String,
    endpoint: String,
    model_id: String,
}

impl GeminiService {
    pub fn new(config: &LlmConfig) -> Result<Self, ConfigError> {
        let api_key = config.validate()?.to_string();
        let model_id = config.model().to_string();
        let endpoint = format!("{}/models/{}:generateContent", config.base_url(), model_id);

        // No explicit timeout: the transport default applies.
        let client = Client::builder()
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            model_id,
        })
    }

    fn translate_request(request: &LlmRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                }],
            }],
        }
    }

    fn normalize_response(resp: GeminiResponse) -> Result<LlmResponse, LlmError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::unknown("No candidates in response"))?;

        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        if parts.iter().all(|p| p.text.is_none()) {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "unspecified".to_string());
            return Err(LlmError::unknown(format!(
                "Response has no text (finish reason: {reason})"
            )));
        }

        let text = parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        let usage = resp.usage_metadata.map_or_else(Usage::default, |u| Usage {
            input_tokens: u64::from(u.prompt_token_count),
            output_tokens: u64::from(u.candidates_token_count),
        });

        Ok(LlmResponse { text, usage })
    }
}

#[async_trait]
impl LlmService for GeminiService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let gemini_request = Self::translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                // Messages reach logs and the browser; keep the endpoint out.
                let e = e.without_url();
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                LlmError::network(format!("Failed to read response: {}", e.without_url()))
            })?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
                let message = error_resp.error.message;
                return Err(match status.as_u16() {
                    400 => LlmError::invalid_request(format!("Invalid request: {message}")),
                    401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
                    429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
                    500..=599 => LlmError::server_error(format!("Server error: {message}")),
                    _ => LlmError::unknown(format!("HTTP {status}: {message}")),
                });
            }
            return Err(LlmError::unknown(format!("HTTP {status} error: {body}")));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}
