//! Error types for the sanitization client.

use thiserror::Error;

/// Errors raised while obtaining a verdict from the backend.
///
/// Every variant means "no verdict is available". Callers must not treat any
/// of them as a clean or a blocking verdict.
#[derive(Debug, Error)]
pub enum SanitizerError {
    /// Provider configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced an HTTP response (DNS, TLS, connect, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status (auth, quota, bad template).
    #[error("Backend returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response body is not the expected JSON document.
    #[error("Failed to decode sanitize response: {0}")]
    Decode(String),

    /// The response decoded but does not describe a usable verdict.
    #[error("Invalid sanitize response: {0}")]
    InvalidResponse(String),

    /// The backend reported that the sanitization invocation failed.
    #[error("Sanitization invocation failed")]
    InvocationFailed,
}

impl From<reqwest::Error> for SanitizerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
