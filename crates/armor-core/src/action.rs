//! Pipeline actions handed back to the interception transport.

use armor_sanitizer::Direction;
use serde::{Serialize, Serializer};

use crate::error::PayloadError;
use crate::outcome::Outcome;
use crate::payload;

/// Status code of the prompt-direction rejection.
pub const PROMPT_BLOCK_STATUS: u16 = 403;

/// Header carried by the prompt-direction rejection.
pub const PROMPT_BLOCK_HEADER: &str = "model-armour-message";

/// Value of [`PROMPT_BLOCK_HEADER`].
pub const PROMPT_BLOCK_MESSAGE: &str = "Provided prompt does not comply with Responsible AI filter";

/// Operator-facing message of the response-direction denial.
pub const RESPONSE_DENY_MESSAGE: &str = "Model response violates responsible AI filters. Update the prompt or contact application admin if issue persists.";

/// What the transport should do with the live request or response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PipelineAction {
    /// Forward the body unchanged.
    PassThrough,

    /// Replace the body.
    MutateBody {
        /// New raw body.
        #[serde(serialize_with = "serialize_body")]
        body: Vec<u8>,
    },

    /// Short-circuit with a response; the upstream is never contacted.
    ImmediateResponse {
        /// HTTP status code.
        status: u16,
        /// Response headers.
        headers: Vec<(String, String)>,
    },

    /// Terminate the in-flight exchange.
    Deny {
        /// Operator-facing message.
        message: String,
    },
}

impl PipelineAction {
    /// Returns true for [`PipelineAction::PassThrough`].
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }

    /// Returns true for the two rejecting actions.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::ImmediateResponse { .. } | Self::Deny { .. })
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PassThrough => "pass_through",
            Self::MutateBody { .. } => "mutate_body",
            Self::ImmediateResponse { .. } => "immediate_response",
            Self::Deny { .. } => "deny",
        }
    }
}

/// The fixed rejection for a direction.
///
/// Prompts are answered with a 403 before reaching the upstream; responses
/// are denied before reaching the client.
pub fn rejection(direction: Direction) -> PipelineAction {
    match direction {
        Direction::Prompt => PipelineAction::ImmediateResponse {
            status: PROMPT_BLOCK_STATUS,
            headers: vec![(
                PROMPT_BLOCK_HEADER.to_string(),
                PROMPT_BLOCK_MESSAGE.to_string(),
            )],
        },
        Direction::Response => PipelineAction::Deny {
            message: RESPONSE_DENY_MESSAGE.to_string(),
        },
    }
}

/// Translate an outcome into a transport action.
///
/// # Errors
///
/// Rewriting re-encodes `raw`, which fails if the text field is gone.
pub fn translate(
    direction: Direction,
    raw: &[u8],
    outcome: &Outcome,
) -> Result<PipelineAction, PayloadError> {
    match outcome {
        Outcome::Allow { .. } => Ok(PipelineAction::PassThrough),
        Outcome::Rewrite { text } => Ok(PipelineAction::MutateBody {
            body: payload::inject(direction, raw, text)?,
        }),
        Outcome::Block { .. } => Ok(rejection(direction)),
    }
}

fn serialize_body<B, S>(body: &B, serializer: S) -> Result<S::Ok, S::Error>
where
    B: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(body.as_ref()))
}
