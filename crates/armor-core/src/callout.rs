//! Transport-facing body handlers with a failure policy.
//!
//! The engine reports internal errors instead of guessing. [`BodyCallout`]
//! is where a transport adapter resolves them: fail-closed answers with the
//! direction's rejection, fail-open forwards the body unchanged.

use armor_sanitizer::Direction;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::action::{rejection, PipelineAction};
use crate::engine::FilterDecisionEngine;

/// What to do when screening fails without a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Reject the traffic. Unscreened content is never forwarded.
    #[default]
    Closed,
    /// Forward the traffic unchanged.
    Open,
}

impl FailureMode {
    /// The action applied in place of a screening result.
    pub fn fallback(&self, direction: Direction) -> PipelineAction {
        match self {
            Self::Closed => rejection(direction),
            Self::Open => PipelineAction::PassThrough,
        }
    }
}

/// Request and response body handlers for an interception transport.
///
/// Every call yields an action; errors are logged and resolved through the
/// configured [`FailureMode`].
#[derive(Clone)]
pub struct BodyCallout {
    engine: FilterDecisionEngine,
    failure_mode: FailureMode,
}

impl BodyCallout {
    /// Create a fail-closed callout.
    pub fn new(engine: FilterDecisionEngine) -> Self {
        Self::with_failure_mode(engine, FailureMode::Closed)
    }

    /// Create a callout with an explicit failure mode.
    pub fn with_failure_mode(engine: FilterDecisionEngine, failure_mode: FailureMode) -> Self {
        Self {
            engine,
            failure_mode,
        }
    }

    /// The configured failure mode.
    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Handle a request body (prompt direction).
    pub async fn on_request_body(&self, raw: &[u8]) -> PipelineAction {
        self.handle(Direction::Prompt, raw).await
    }

    /// Handle a response body (response direction).
    pub async fn on_response_body(&self, raw: &[u8]) -> PipelineAction {
        self.handle(Direction::Response, raw).await
    }

    /// Handle a body for an explicit direction.
    pub async fn handle(&self, direction: Direction, raw: &[u8]) -> PipelineAction {
        match self.engine.screen(direction, raw).await {
            Ok(action) => action,
            Err(e) => {
                let fallback = self.failure_mode.fallback(direction);
                error!(
                    kind = e.kind(),
                    "{} screening failed, failing {:?} with {}: {}",
                    direction,
                    self.failure_mode,
                    fallback.kind(),
                    e
                );
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armor_sanitizer::{StaticSanitizer, Verdict};
    use std::sync::Arc;

    fn callout(mode: FailureMode) -> BodyCallout {
        let engine = FilterDecisionEngine::new(Arc::new(StaticSanitizer::new(Verdict::clean())));
        BodyCallout::with_failure_mode(engine, mode)
    }

    #[test]
    fn test_default_mode_is_closed() {
        assert_eq!(FailureMode::default(), FailureMode::Closed);
    }

    #[tokio::test]
    async fn test_malformed_prompt_fails_closed() {
        let action = callout(FailureMode::Closed).on_request_body(b"{oops").await;
        assert_eq!(action, rejection(Direction::Prompt));
    }

    #[tokio::test]
    async fn test_malformed_response_fails_open() {
        let action = callout(FailureMode::Open).on_response_body(b"[1,2]").await;
        assert!(action.is_pass_through());
    }

    #[tokio::test]
    async fn test_success_is_untouched_by_mode() {
        let action = callout(FailureMode::Closed)
            .on_request_body(br#"{"prompt":"hi"}"#)
            .await;
        assert!(action.is_pass_through());
    }
}
