//! Model Armor REST wire schema.
//!
//! Request bodies and the `sanitizationResult` document, plus the validating
//! conversion into a [`Verdict`]. Field names follow the v1 JSON mapping
//! (camelCase, `SCREAMING_SNAKE_CASE` enum values).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::direction::Direction;
use crate::error::SanitizerError;
use crate::verdict::{FilterName, FilterResult, Verdict};

/// Text container used by both request kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    /// The text to screen, or the de-identified text in responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Body of a `sanitizeUserPrompt` or `sanitizeModelResponse` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SanitizeRequest {
    /// Prompt-direction request.
    #[serde(rename = "userPromptData")]
    UserPrompt(DataItem),
    /// Response-direction request.
    #[serde(rename = "modelResponseData")]
    ModelResponse(DataItem),
}

impl SanitizeRequest {
    /// Build the request body for a direction.
    pub fn new(direction: Direction, text: &str) -> Self {
        let item = DataItem {
            text: Some(text.to_string()),
        };
        match direction {
            Direction::Prompt => Self::UserPrompt(item),
            Direction::Response => Self::ModelResponse(item),
        }
    }

    /// REST method suffix appended to the template resource name.
    pub fn method(direction: Direction) -> &'static str {
        match direction {
            Direction::Prompt => "sanitizeUserPrompt",
            Direction::Response => "sanitizeModelResponse",
        }
    }
}

/// Filter match state as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchState {
    /// The backend did not say.
    #[default]
    FilterMatchStateUnspecified,
    /// The filter ran and found nothing.
    NoMatchFound,
    /// The filter triggered.
    MatchFound,
}

impl MatchState {
    /// Returns true for `MATCH_FOUND`.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::MatchFound)
    }
}

/// Outcome of the sanitization invocation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvocationResult {
    /// Not reported.
    #[default]
    InvocationResultUnspecified,
    /// All filters ran.
    Success,
    /// Some filters ran.
    Partial,
    /// The invocation failed.
    Failure,
}

/// Top-level response of both sanitize methods.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeResponse {
    /// The findings.
    pub sanitization_result: SanitizationResult,
}

/// Aggregate findings for one text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizationResult {
    /// Overall match state across all filters.
    #[serde(default)]
    pub filter_match_state: MatchState,

    /// Filter results keyed by backend filter name.
    #[serde(default)]
    pub filter_results: BTreeMap<String, FilterEntry>,

    /// Invocation status.
    #[serde(default)]
    pub invocation_result: InvocationResult,
}

/// One entry of `filterResults`: a single `<kind>FilterResult` object keyed
/// by its kind (`raiFilterResult`, `sdpFilterResult`, ...).
pub type FilterEntry = BTreeMap<String, FilterPayload>;

/// Body of a `<kind>FilterResult` object.
///
/// Most filters only report `matchState`. The SDP filter nests its state in
/// `inspectResult` or `deidentifyResult`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPayload {
    /// Match state of a plain filter.
    #[serde(default)]
    pub match_state: MatchState,

    /// SDP inspection result.
    #[serde(default)]
    pub inspect_result: Option<SdpResult>,

    /// SDP de-identification result.
    #[serde(default)]
    pub deidentify_result: Option<SdpResult>,
}

/// SDP inspection or de-identification result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdpResult {
    /// Match state.
    #[serde(default)]
    pub match_state: MatchState,

    /// De-identified text (de-identification only).
    #[serde(default)]
    pub data: Option<DataItem>,
}

const SDP_KEY: &str = "sdp";

impl TryFrom<SanitizationResult> for Verdict {
    type Error = SanitizerError;

    fn try_from(result: SanitizationResult) -> Result<Self, Self::Error> {
        if result.invocation_result == InvocationResult::Failure {
            return Err(SanitizerError::InvocationFailed);
        }

        let matched = match result.filter_match_state {
            MatchState::MatchFound => true,
            MatchState::NoMatchFound => false,
            MatchState::FilterMatchStateUnspecified => {
                return Err(SanitizerError::InvalidResponse(
                    "filterMatchState is missing or unspecified".to_string(),
                ))
            }
        };

        let mut verdict = Verdict {
            matched,
            filters: BTreeMap::new(),
        };

        for (key, entry) in result.filter_results {
            if entry.is_empty() {
                return Err(SanitizerError::InvalidResponse(format!(
                    "filter '{}' carried no result",
                    key
                )));
            }

            if key == SDP_KEY {
                let (deidentify, inspect) = sdp_results(&entry);
                verdict.filters.insert(FilterName::Sdp, deidentify);
                if let Some(inspect) = inspect {
                    verdict.filters.insert(FilterName::SdpInspect, inspect);
                }
            } else {
                let any_match = entry.values().any(payload_matched);
                let result = if any_match {
                    FilterResult::matched()
                } else {
                    FilterResult::Unmatched
                };
                verdict.filters.insert(FilterName::from(key.as_str()), result);
            }
        }

        Ok(verdict)
    }
}

/// Split an SDP entry into its de-identification result and, when the
/// inspection matched, a separate inspection finding.
fn sdp_results(entry: &FilterEntry) -> (FilterResult, Option<FilterResult>) {
    let mut deidentify = FilterResult::Unmatched;
    let mut inspect = None;

    for payload in entry.values() {
        if let Some(result) = &payload.deidentify_result {
            if result.match_state.is_match() {
                let rewrite = result.data.as_ref().and_then(|d| d.text.clone());
                deidentify = FilterResult::Matched { rewrite };
            }
        }
        if let Some(result) = &payload.inspect_result {
            if result.match_state.is_match() {
                inspect = Some(FilterResult::matched());
            }
        }
    }

    // A de-identification supersedes the inspection that fed it.
    if deidentify.is_matched() {
        inspect = None;
    }

    (deidentify, inspect)
}

fn payload_matched(payload: &FilterPayload) -> bool {
    payload.match_state.is_match()
        || payload
            .inspect_result
            .as_ref()
            .is_some_and(|r| r.match_state.is_match())
        || payload
            .deidentify_result
            .as_ref()
            .is_some_and(|r| r.match_state.is_match())
}

/// Decode a raw sanitize response into a validated [`Verdict`].
pub fn parse_sanitize_response(body: &[u8]) -> Result<Verdict, SanitizerError> {
    let response: SanitizeResponse =
        serde_json::from_slice(body).map_err(|e| SanitizerError::Decode(e.to_string()))?;
    Verdict::try_from(response.sanitization_result)
}
