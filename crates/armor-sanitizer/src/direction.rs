//! Screening direction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of an LLM exchange a body belongs to.
///
/// The direction selects the backend template, the endpoint method and the
/// JSON path the text is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outbound user prompt, screened before it reaches the model.
    Prompt,
    /// Inbound model response, screened before it reaches the client.
    Response,
}

impl Direction {
    /// Returns true for the prompt direction.
    pub fn is_prompt(&self) -> bool {
        matches!(self, Self::Prompt)
    }

    /// Returns true for the response direction.
    pub fn is_response(&self) -> bool {
        matches!(self, Self::Response)
    }

    /// Lowercase name, as used in logs and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
