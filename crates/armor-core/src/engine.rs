//! The filter decision engine.
//!
//! [`FilterDecisionEngine`] screens one complete body and returns the
//! action the transport should apply. It owns nothing but a shared handle to
//! the sanitization client, so one engine serves any number of concurrent
//! streams.

use std::sync::Arc;

use armor_sanitizer::{Direction, SanitizationClient};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::{
    action::{self, PipelineAction},
    interpreter,
    outcome::Outcome,
    payload, Result,
};

/// Orchestrates extraction, sanitization, interpretation and translation.
///
/// # State Machine
///
/// ```text
/// Start ──► extract ──► Absent ──────────────────────────► PassThrough
///              │
///              └──► Extracted ──► sanitize ──► interpret ──► translate ──► Action
/// ```
///
/// One pass per body, no retries. If the future is dropped while the
/// backend call is in flight, nothing is returned and nothing is applied.
#[derive(Clone)]
pub struct FilterDecisionEngine {
    sanitizer: Arc<dyn SanitizationClient>,
}

impl FilterDecisionEngine {
    /// Create an engine around a long-lived sanitization client.
    pub fn new(sanitizer: Arc<dyn SanitizationClient>) -> Self {
        Self { sanitizer }
    }

    /// Screen a prompt body.
    pub async fn screen_prompt(&self, raw: &[u8]) -> Result<PipelineAction> {
        self.screen(Direction::Prompt, raw).await
    }

    /// Screen a model response body.
    pub async fn screen_response(&self, raw: &[u8]) -> Result<PipelineAction> {
        self.screen(Direction::Response, raw).await
    }

    /// Screen `raw` for `direction`.
    ///
    /// # Errors
    ///
    /// - [`crate::CalloutError::MalformedPayload`] if the body cannot be read
    /// - [`crate::CalloutError::ScreeningUnavailable`] if the backend gave no verdict
    ///
    /// Neither error is turned into an allow or a block here.
    pub async fn screen(&self, direction: Direction, raw: &[u8]) -> Result<PipelineAction> {
        let Some(text) = payload::extract(direction, raw)? else {
            debug!("No {} text to screen, passing through", direction);
            return Ok(PipelineAction::PassThrough);
        };

        let digest = text_digest(&text);
        debug!(
            "Screening {} text ({} bytes, sha256 {})",
            direction,
            text.len(),
            digest
        );

        let verdict = self.sanitizer.sanitize(direction, &text).await?;
        let outcome = interpreter::interpret(&verdict, &text);

        match &outcome {
            Outcome::Allow { .. } => {
                debug!("{} {} allowed", direction, digest);
            }
            Outcome::Rewrite { .. } => {
                info!("{} {} rewritten by de-identification", direction, digest);
            }
            Outcome::Block { reason } => {
                warn!("{} {} blocked: {}", direction, digest, reason);
            }
        }

        Ok(action::translate(direction, raw, &outcome)?)
    }
}

/// Short SHA-256 fingerprint of a text, for correlating log lines without
/// logging the text itself.
pub fn text_digest(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    hash.iter().take(6).map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_sanitizer::{FilterName, FilterResult, StaticSanitizer, Verdict};

    fn engine(verdict: Verdict) -> (FilterDecisionEngine, Arc<StaticSanitizer>) {
        let sanitizer = Arc::new(StaticSanitizer::new(verdict));
        (FilterDecisionEngine::new(sanitizer.clone()), sanitizer)
    }

    #[tokio::test]
    async fn test_clean_prompt_passes_through() {
        let (engine, sanitizer) = engine(Verdict::clean());
        let action = engine.screen_prompt(br#"{"prompt":"hello"}"#).await.unwrap();
        assert!(action.is_pass_through());
        assert_eq!(sanitizer.calls(), 1);
    }

    #[tokio::test]
    async fn test_absent_text_skips_backend() {
        let (engine, sanitizer) = engine(Verdict::flagged());
        let action = engine.screen_prompt(b"   ").await.unwrap();
        assert!(action.is_pass_through());
        assert_eq!(sanitizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let (engine, sanitizer) = engine(Verdict::clean());
        let err = engine.screen_prompt(b"{not json").await.unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(sanitizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_response_rewrite() {
        let verdict =
            Verdict::flagged().with_filter(FilterName::Sdp, FilterResult::rewritten("call [PHONE]"));
        let (engine, _) = engine(verdict);
        let action = engine
            .screen_response(br#"{"choices":[{"message":{"content":"call 555-0100"}}]}"#)
            .await
            .unwrap();
        assert_eq!(
            action,
            PipelineAction::MutateBody {
                body: br#"{"choices":[{"message":{"content":"call [PHONE]"}}]}"#.to_vec()
            }
        );
    }

    #[test]
    fn test_text_digest_is_stable_and_short() {
        let digest = text_digest("hello");
        assert_eq!(digest, "2cf24dba5fb0");
        assert_eq!(digest, text_digest("hello"));
        assert_ne!(digest, text_digest("hello!"));
    }
}
