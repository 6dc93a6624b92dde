//! # Armor Sanitizer
//!
//! Client side of the content-safety backend used by the Model Armor callout.
//! This crate knows how to ask the backend about a piece of text and how to
//! turn its answer into a typed [`Verdict`]. It makes no decisions about
//! traffic; that is the job of `armor-core`.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`Direction`] | Which side of the exchange is being screened |
//! | [`Verdict`] | Typed backend finding: overall match plus per-filter results |
//! | [`SanitizationClient`] | Async seam the decision engine calls through |
//! | [`ModelArmorClient`] | REST implementation against the regional Model Armor API |
//! | [`StaticSanitizer`] | Fixed-verdict implementation for offline replay and tests |
//! | [`ArmorConfig`] | Location and per-direction template identifiers |
//!
//! ## Wire Flow
//!
//! ```text
//! Direction::Prompt   ──► POST {base}/v1/{prompt_template}:sanitizeUserPrompt
//! Direction::Response ──► POST {base}/v1/{response_template}:sanitizeModelResponse
//!
//!                 sanitizationResult
//!                        │
//!                        ▼
//!              ┌───────────────────┐
//!              │  wire validation  │  unknown / unspecified states rejected
//!              └─────────┬─────────┘
//!                        ▼
//!                     Verdict
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use armor_sanitizer::{ArmorConfig, Direction, ModelArmorClient, SanitizationClient};
//!
//! let config = ArmorConfig::from_env()?;
//! let client = ModelArmorClient::new(config)?;
//!
//! let verdict = client.sanitize(Direction::Prompt, "hello").await?;
//! if !verdict.matched {
//!     // nothing triggered
//! }
//! ```
//!
//! ## Security Notes
//!
//! - Only the `sdp` filter ever carries rewritten text
//! - A response without a definite match state is an error, never a clean verdict
//! - The access token is redacted from `Debug` output

mod client;
mod config;
mod direction;
mod error;
mod model_armor;
mod verdict;
pub mod wire;

pub use client::{SanitizationClient, StaticSanitizer};
pub use config::{
    ArmorConfig, ENV_ACCESS_TOKEN, ENV_ENDPOINT, ENV_LOCATION, ENV_PROMPT_TEMPLATE,
    ENV_RESPONSE_TEMPLATE,
};
pub use direction::Direction;
pub use error::SanitizerError;
pub use model_armor::{ModelArmorClient, MAX_ERROR_BODY};
pub use verdict::{FilterName, FilterResult, Verdict};
pub use wire::parse_sanitize_response;

/// Result type for sanitizer operations.
pub type Result<T> = std::result::Result<T, SanitizerError>;
