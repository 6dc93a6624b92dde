//! # Model Armor Callout Core
//!
//! Screening-and-mutation decision engine for an inline LLM traffic filter.
//! A reverse proxy hands each complete request or response body to the
//! callout; the callout screens the text with the sanitization backend and
//! answers with a pass-through, a body mutation or a rejection.
//!
//! ## Decision Table
//!
//! | Verdict | Prompt | Response |
//! |---------|--------|----------|
//! | no text in body | PassThrough | PassThrough |
//! | `matched = false` | PassThrough | PassThrough |
//! | `sdp` matched | MutateBody | MutateBody |
//! | other filter matched | ImmediateResponse 403 | Deny |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    MODEL ARMOR CALLOUT CORE                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   raw body ──► ┌──────────┐   text   ┌──────────────────────┐   │
//! │                │ payload  │ ───────► │ SanitizationClient   │   │
//! │                │  codec   │          │   (armor-sanitizer)  │   │
//! │                └──────────┘          └──────────┬───────────┘   │
//! │                     ▲                           │ Verdict       │
//! │                     │ inject                    ▼               │
//! │                ┌──────────┐  Outcome ┌──────────────────────┐   │
//! │                │  action  │ ◄─────── │     interpreter      │   │
//! │                │translator│          └──────────────────────┘   │
//! │                └────┬─────┘                                     │
//! │                     ▼                                           │
//! │               PipelineAction                                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use armor_core::{BodyCallout, CalloutConfig, FilterDecisionEngine};
//! use armor_sanitizer::ModelArmorClient;
//!
//! let config = CalloutConfig::from_env()?;
//! let client = Arc::new(ModelArmorClient::new(config.sanitizer.clone())?);
//! let callout = BodyCallout::with_failure_mode(
//!     FilterDecisionEngine::new(client),
//!     config.failure_mode(),
//! );
//!
//! let action = callout.on_request_body(br#"{"prompt":"hello"}"#).await;
//! ```
//!
//! ## Security Notes
//!
//! - Malformed bodies and backend failures are errors, never Allow or Block
//! - The default failure mode is fail-closed
//! - Screened text is never logged; a short SHA-256 digest is logged instead
//! - No state is shared between screening calls

pub mod action;
mod callout;
mod config;
mod engine;
mod error;
pub mod interpreter;
mod outcome;
pub mod payload;

pub use action::{rejection, translate, PipelineAction};
pub use callout::{BodyCallout, FailureMode};
pub use config::{parse_flag, CalloutConfig, GlobalConfig, ENV_FAIL_OPEN};
pub use engine::{text_digest, FilterDecisionEngine};
pub use error::{CalloutError, PayloadError};
pub use interpreter::interpret;
pub use outcome::{BlockReason, Outcome};

// Re-export sanitizer types for convenience
pub use armor_sanitizer::{
    ArmorConfig, Direction, FilterName, FilterResult, ModelArmorClient, SanitizationClient,
    SanitizerError, StaticSanitizer, Verdict,
};

/// Core result type for callout operations.
pub type Result<T> = std::result::Result<T, CalloutError>;
