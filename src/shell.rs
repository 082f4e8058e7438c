//! The two user actions and their validation rules
//!
//! Validation failures come back as [`Outcome::Warning`]. Service errors on
//! the verse, explanation and verdict calls are returned as `Err` for the
//! HTTP layer to report.

use crate::bridge::VerseBridge;
use crate::llm::LlmError;
use crate::session::SessionContext;
use serde::Serialize;
use std::sync::Arc;

pub const MISSING_REFERENCE: &str = "Please enter a Bible verse reference.";
pub const MISSING_FIELDS: &str = "Please enter both a Bible verse reference and your explanation.";
pub const INVALID_REFERENCE: &str =
    "Invalid input. This app only processes Bible verse references (e.g., John 3:16).";

/// Result of one action, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Warning {
        message: String,
    },
    Verse {
        verse_text: String,
        explanation: String,
    },
    Verdict {
        verdict: String,
    },
}

impl Outcome {
    fn warning(message: &str) -> Self {
        Self::Warning {
            message: message.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Shell {
    bridge: Arc<VerseBridge>,
}

impl Shell {
    pub fn new(bridge: Arc<VerseBridge>) -> Self {
        Self { bridge }
    }

    pub fn model_id(&self) -> &str {
        self.bridge.model_id()
    }

    /// "Get Verse and Explanation": always re-fetches and overwrites the
    /// cached verse text.
    pub async fn get_verse_and_explanation(
        &self,
        ctx: &mut SessionContext,
        reference: &str,
    ) -> Result<Outcome, LlmError> {
        if reference.is_empty() {
            return Ok(Outcome::warning(MISSING_REFERENCE));
        }
        if !self.bridge.is_bible_verse(reference).await {
            return Ok(Outcome::warning(INVALID_REFERENCE));
        }

        let verse_text = self.bridge.get_verse_text(reference).await?;
        ctx.verse_text = Some(verse_text.clone());
        let explanation = self.bridge.verse_explain(&verse_text).await?;
        ctx.explanation = Some(explanation.clone());

        Ok(Outcome::Verse {
            verse_text,
            explanation,
        })
    }

    /// "Check My Explanation": reuses the cached verse text when there is
    /// one.
    pub async fn check_explanation(
        &self,
        ctx: &mut SessionContext,
        reference: &str,
        user_explanation: &str,
    ) -> Result<Outcome, LlmError> {
        if reference.is_empty() || user_explanation.is_empty() {
            return Ok(Outcome::warning(MISSING_FIELDS));
        }
        if !self.bridge.is_bible_verse(reference).await {
            return Ok(Outcome::warning(INVALID_REFERENCE));
        }

        let verse_text = match ctx.verse_text.as_deref() {
            Some(cached) if !cached.is_empty() => cached.to_string(),
            _ => {
                let fetched = self.bridge.get_verse_text(reference).await?;
                ctx.verse_text = Some(fetched.clone());
                fetched
            }
        };

        let verdict = self
            .bridge
            .truth_finder(&verse_text, user_explanation)
            .await?;
        Ok(Outcome::Verdict { verdict })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLlmClient;

    fn shell() -> (Shell, Arc<MockLlmClient>) {
        let mock = Arc::new(MockLlmClient::new("mock"));
        let bridge = Arc::new(VerseBridge::new(mock.clone()));
        (Shell::new(bridge), mock)
    }

    #[tokio::test]
    async fn test_get_with_empty_reference_warns_without_calls() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext::default();

        let outcome = shell.get_verse_and_explanation(&mut ctx, "").await.unwrap();
        assert_eq!(outcome, Outcome::warning(MISSING_REFERENCE));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_check_with_empty_explanation_warns_without_calls() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext::default();

        let outcome = shell
            .check_explanation(&mut ctx, "John 3:16", "")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::warning(MISSING_FIELDS));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_check_with_empty_reference_warns_without_calls() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext::default();

        let outcome = shell
            .check_explanation(&mut ctx, "", "God loves the world")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::warning(MISSING_FIELDS));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_input_is_not_empty() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext::default();

        // "   " has no colon or digit: past the emptiness check, rejected
        // locally by the pre-check
        let outcome = shell.get_verse_and_explanation(&mut ctx, "   ").await.unwrap();
        assert_eq!(outcome, Outcome::warning(INVALID_REFERENCE));
        assert_eq!(mock.call_count(), 0);

        // A whitespace explanation goes all the way to the verdict call
        mock.queue_text("Yes");
        mock.queue_text("Jesus wept.");
        mock.queue_text("False");
        let outcome = shell
            .check_explanation(&mut ctx, "John 11:35", " ")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Verdict { verdict: "False".to_string() });
        assert!(mock.recorded_prompts()[2].contains("\n\n' '\n\n"));
    }

    #[tokio::test]
    async fn test_check_refetches_empty_cached_text() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext {
            verse_text: Some(String::new()),
            explanation: None,
        };
        mock.queue_text("Yes");
        mock.queue_text("Jesus wept.");
        mock.queue_text("True");

        shell
            .check_explanation(&mut ctx, "John 11:35", "Jesus was sad")
            .await
            .unwrap();

        let prompts = mock.recorded_prompts();
        assert_eq!(prompts[1], "What is the text of the Bible verse John 11:35?");
        assert!(prompts[2].starts_with("Based on the following Bible verse:\n\nJesus wept."));
        assert_eq!(ctx.verse_text.as_deref(), Some("Jesus wept."));
    }

    #[tokio::test]
    async fn test_invalid_reference_warns() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext::default();

        let outcome = shell
            .get_verse_and_explanation(&mut ctx, "banana bread")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::warning(INVALID_REFERENCE));
        assert_eq!(mock.call_count(), 0);

        mock.queue_text("No");
        let outcome = shell
            .check_explanation(&mut ctx, "Room 101", "a room")
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::warning(INVALID_REFERENCE));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_get_fetches_explains_and_caches() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext::default();
        mock.queue_text("Yes");
        mock.queue_text("For God so loved the world...");
        mock.queue_text("This verse is about God's love...");

        let outcome = shell
            .get_verse_and_explanation(&mut ctx, "John 3:16")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Verse {
                verse_text: "For God so loved the world...".to_string(),
                explanation: "This verse is about God's love...".to_string(),
            }
        );
        assert_eq!(ctx.verse_text.as_deref(), Some("For God so loved the world..."));
        assert_eq!(
            ctx.explanation.as_deref(),
            Some("This verse is about God's love...")
        );

        let prompts = mock.recorded_prompts();
        assert_eq!(prompts.len(), 3);
        assert_eq!(prompts[1], "What is the text of the Bible verse John 3:16?");
        assert_eq!(
            prompts[2],
            "Explain the following Bible verse in simple terms:\n\nFor God so loved the world..."
        );
    }

    #[tokio::test]
    async fn test_get_always_refetches() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext {
            verse_text: Some("old text".to_string()),
            explanation: Some("old explanation".to_string()),
        };
        mock.queue_text("yes");
        mock.queue_text("Jesus wept.");
        mock.queue_text("He grieved.");

        shell
            .get_verse_and_explanation(&mut ctx, "John 11:35")
            .await
            .unwrap();
        assert_eq!(ctx.verse_text.as_deref(), Some("Jesus wept."));
        assert_eq!(ctx.explanation.as_deref(), Some("He grieved."));
    }

    #[tokio::test]
    async fn test_check_twice_fetches_verse_once() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext::default();
        // first check: plausibility, fetch, verdict
        mock.queue_text("Yes");
        mock.queue_text("For God so loved the world...");
        mock.queue_text("True");
        // second check: plausibility, verdict
        mock.queue_text("Yes");
        mock.queue_text("False");

        let first = shell
            .check_explanation(&mut ctx, "John 3:16", "God loves the world")
            .await
            .unwrap();
        let second = shell
            .check_explanation(&mut ctx, "John 3:16", "It is about fishing")
            .await
            .unwrap();

        assert_eq!(first, Outcome::Verdict { verdict: "True".to_string() });
        assert_eq!(second, Outcome::Verdict { verdict: "False".to_string() });

        let fetches = mock
            .recorded_prompts()
            .iter()
            .filter(|p| p.starts_with("What is the text"))
            .count();
        assert_eq!(fetches, 1);
        assert_eq!(mock.call_count(), 5);
    }

    #[tokio::test]
    async fn test_check_reuses_text_from_get() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext::default();
        mock.queue_text("Yes");
        mock.queue_text("Jesus wept.");
        mock.queue_text("He grieved.");
        mock.queue_text("Yes");
        mock.queue_text("True");

        shell
            .get_verse_and_explanation(&mut ctx, "John 11:35")
            .await
            .unwrap();
        shell
            .check_explanation(&mut ctx, "John 11:35", "Jesus was sad")
            .await
            .unwrap();

        let prompts = mock.recorded_prompts();
        assert!(prompts[4].starts_with("Based on the following Bible verse:\n\nJesus wept."));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_but_plausibility_error_does_not() {
        let (shell, mock) = shell();
        let mut ctx = SessionContext::default();
        mock.queue_error(LlmError::network("offline"));
        mock.queue_error(LlmError::network("still offline"));

        let result = shell.get_verse_and_explanation(&mut ctx, "John 3:16").await;
        assert!(result.is_err());
        assert_eq!(mock.call_count(), 2);
        assert_eq!(ctx, SessionContext::default());
    }

    #[test]
    fn test_outcome_wire_format() {
        let json = serde_json::to_value(Outcome::Verdict {
            verdict: "True".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"kind": "verdict", "verdict": "True"}));

        let json = serde_json::to_value(Outcome::warning(MISSING_REFERENCE)).unwrap();
        assert_eq!(json["kind"], "warning");
    }
}
