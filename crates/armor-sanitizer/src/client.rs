//! The sanitization seam.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::direction::Direction;
use crate::error::SanitizerError;
use crate::verdict::Verdict;

/// Something that can screen a text and return a [`Verdict`].
///
/// Implementations are long-lived and shared across concurrent screening
/// calls, so they must be `Send + Sync` and hold no per-call state.
#[async_trait]
pub trait SanitizationClient: Send + Sync {
    /// Screen `text` with the template configured for `direction`.
    ///
    /// # Errors
    ///
    /// Any failure to obtain a verdict (network, auth, quota, malformed
    /// response) is returned as a [`SanitizerError`].
    async fn sanitize(&self, direction: Direction, text: &str) -> Result<Verdict, SanitizerError>;
}

/// A client that answers every call with the same verdict.
///
/// Used to replay a saved backend response offline and as a test double.
#[derive(Debug, Default)]
pub struct StaticSanitizer {
    verdict: Verdict,
    calls: AtomicUsize,
}

impl StaticSanitizer {
    /// Create a client returning `verdict`.
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `sanitize` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SanitizationClient for StaticSanitizer {
    async fn sanitize(&self, _direction: Direction, _text: &str) -> Result<Verdict, SanitizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.verdict.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::{FilterName, FilterResult};

    #[test]
    fn test_static_sanitizer_returns_verdict() {
        let verdict = Verdict::flagged().with_filter(FilterName::Rai, FilterResult::matched());
        let client = StaticSanitizer::new(verdict.clone());

        let got = tokio_test::block_on(client.sanitize(Direction::Prompt, "text")).unwrap();
        assert_eq!(got, verdict);
    }

    #[test]
    fn test_static_sanitizer_counts_calls() {
        let client = StaticSanitizer::new(Verdict::clean());
        assert_eq!(client.calls(), 0);

        tokio_test::block_on(client.sanitize(Direction::Prompt, "a")).unwrap();
        tokio_test::block_on(client.sanitize(Direction::Response, "b")).unwrap();
        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn test_usable_as_trait_object() {
        let client: Box<dyn SanitizationClient> = Box::new(StaticSanitizer::default());
        let got = tokio_test::block_on(client.sanitize(Direction::Response, "x")).unwrap();
        assert!(!got.matched);
    }
}
