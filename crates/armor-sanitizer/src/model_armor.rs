//! REST client for the regional Model Armor API.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::SanitizationClient;
use crate::config::ArmorConfig;
use crate::direction::Direction;
use crate::error::SanitizerError;
use crate::verdict::Verdict;
use crate::wire::{self, SanitizeRequest};

const USER_AGENT: &str = concat!("armor-callout/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in [`SanitizerError::Status`], in bytes.
pub const MAX_ERROR_BODY: usize = 512;

/// Model Armor client.
///
/// Owns one connection pool for the life of the process. Construct it once
/// at startup and share it (behind an `Arc`) with every screening call.
#[derive(Debug)]
pub struct ModelArmorClient {
    http: reqwest::Client,
    config: ArmorConfig,
}

impl ModelArmorClient {
    /// Validate `config` and build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizerError::Config`] if the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: ArmorConfig) -> Result<Self, SanitizerError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SanitizerError::Config(format!("failed to build HTTP client: {}", e)))?;

        debug!("Model Armor client ready for {}", config.base_url());

        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ArmorConfig {
        &self.config
    }

    /// Full URL of the sanitize method for a direction.
    pub fn request_url(&self, direction: Direction) -> String {
        format!(
            "{}/v1/{}:{}",
            self.config.base_url(),
            self.config.template(direction),
            SanitizeRequest::method(direction)
        )
    }
}

#[async_trait]
impl SanitizationClient for ModelArmorClient {
    async fn sanitize(&self, direction: Direction, text: &str) -> Result<Verdict, SanitizerError> {
        let url = self.request_url(direction);
        let mut request = self
            .http
            .post(&url)
            .json(&SanitizeRequest::new(direction, text));
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = truncate_error_body(response.text().await.unwrap_or_default());
            warn!("Model Armor returned {} for {} screening", status, direction);
            return Err(SanitizerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        wire::parse_sanitize_response(&body)
    }
}

/// Cut `body` to at most [`MAX_ERROR_BODY`] bytes on a char boundary.
fn truncate_error_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}
