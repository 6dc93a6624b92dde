//! Error types for the Model Armor callout core.

use armor_sanitizer::SanitizerError;
use thiserror::Error;

/// Core error type for screening operations.
///
/// Neither variant is a policy decision. The transport chooses whether an
/// error fails open or closed; see [`crate::FailureMode`].
#[derive(Debug, Error)]
pub enum CalloutError {
    /// The body could not be read as the expected structured document.
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// No verdict could be obtained from the sanitization backend.
    #[error("Screening unavailable: {0}")]
    ScreeningUnavailable(#[from] SanitizerError),
}

impl CalloutError {
    /// Returns true for [`CalloutError::MalformedPayload`].
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPayload(_))
    }

    /// Returns true for [`CalloutError::ScreeningUnavailable`].
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ScreeningUnavailable(_))
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedPayload(_) => "malformed_payload",
            Self::ScreeningUnavailable(_) => "screening_unavailable",
        }
    }
}

/// Errors raised by the payload codec.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The body is not valid UTF-8.
    #[error("body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The body is not valid JSON.
    #[error("body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body is valid JSON but not an object.
    #[error("body is not a JSON object")]
    NotAnObject,

    /// The text field holds something other than a string.
    #[error("field '{path}' is not a string")]
    TextNotString {
        /// Path of the field.
        path: &'static str,
    },

    /// The text field to rewrite does not exist.
    #[error("field '{path}' is missing")]
    MissingField {
        /// Path of the field.
        path: &'static str,
    },
}
