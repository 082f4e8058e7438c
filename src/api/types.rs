//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// "Get Verse and Explanation" form
#[derive(Debug, Deserialize)]
pub struct VerseRequest {
    #[serde(default)]
    pub reference: String,
}

/// "Check My Explanation" form
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub explanation: String,
}

/// Configuration state, polled by the page before it renders the form
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Sessions not polled within this many seconds are dropped
    pub idle_ttl_secs: u64,
}

/// Cached session strings
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub verse_text: Option<String>,
    pub explanation: Option<String>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = Some(kind);
        self
    }
}
