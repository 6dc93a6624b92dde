//! Payload codec.
//!
//! Reads the screened text out of a JSON body and writes a replacement back
//! into the same field. Everything outside that field is left as it was
//! (key order and number literals included).
//!
//! | Direction | Field |
//! |-----------|-------|
//! | Prompt | `prompt` |
//! | Response | `choices[0].message.content` |

use armor_sanitizer::Direction;
use serde_json::{Map, Value};

use crate::error::PayloadError;

/// Top-level field holding the prompt text.
pub const PROMPT_FIELD: &str = "prompt";

/// Display path of the response text field.
pub const RESPONSE_PATH: &str = "choices[0].message.content";

/// Display path of the text field for a direction.
pub fn text_path(direction: Direction) -> &'static str {
    match direction {
        Direction::Prompt => PROMPT_FIELD,
        Direction::Response => RESPONSE_PATH,
    }
}

/// Extract the text to screen.
///
/// Returns `Ok(None)` when there is nothing to screen: an empty or
/// whitespace-only body, a missing field, a `null` field or an empty string.
///
/// # Errors
///
/// A body that is not UTF-8, not JSON, not a JSON object, or whose text
/// field holds a non-string value is a [`PayloadError`].
pub fn extract(direction: Direction, raw: &[u8]) -> Result<Option<String>, PayloadError> {
    let Some(mut document) = parse(raw)? else {
        return Ok(None);
    };

    match text_slot(direction, &mut document) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(std::mem::take(text))),
        Some(_) => Err(PayloadError::TextNotString {
            path: text_path(direction),
        }),
    }
}

/// Replace the text field with `text` and re-serialize the body.
///
/// # Errors
///
/// Fails like [`extract`] on unreadable bodies, and with
/// [`PayloadError::MissingField`] if the field path does not exist.
pub fn inject(direction: Direction, raw: &[u8], text: &str) -> Result<Vec<u8>, PayloadError> {
    let path = text_path(direction);
    let mut document = parse(raw)?.ok_or(PayloadError::MissingField { path })?;

    let slot = text_slot(direction, &mut document).ok_or(PayloadError::MissingField { path })?;
    *slot = Value::String(text.to_string());

    Ok(serde_json::to_vec(&document)?)
}

fn parse(raw: &[u8]) -> Result<Option<Map<String, Value>>, PayloadError> {
    let content = std::str::from_utf8(raw)?.trim();
    if content.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(content)? {
        Value::Object(document) => Ok(Some(document)),
        _ => Err(PayloadError::NotAnObject),
    }
}

fn text_slot(direction: Direction, document: &mut Map<String, Value>) -> Option<&mut Value> {
    match direction {
        Direction::Prompt => document.get_mut(PROMPT_FIELD),
        Direction::Response => document
            .get_mut("choices")?
            .get_mut(0)?
            .get_mut("message")?
            .get_mut("content"),
    }
}
