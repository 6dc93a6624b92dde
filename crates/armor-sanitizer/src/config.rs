//! Backend configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::direction::Direction;
use crate::error::SanitizerError;

/// Environment variable holding the backend region.
pub const ENV_LOCATION: &str = "MA_LOCATION";
/// Environment variable holding the prompt template resource name.
pub const ENV_PROMPT_TEMPLATE: &str = "MA_PROMPT_TEMPLATE";
/// Environment variable holding the response template resource name.
pub const ENV_RESPONSE_TEMPLATE: &str = "MA_RESPONSE_TEMPLATE";
/// Optional base URL override (private endpoints, local emulators).
pub const ENV_ENDPOINT: &str = "MA_ENDPOINT";
/// Optional OAuth access token sent as a bearer credential.
pub const ENV_ACCESS_TOKEN: &str = "MA_ACCESS_TOKEN";

const TEMPLATE_PATTERN: &str = r"^projects/[^/]+/locations/([^/]+)/templates/[^/]+$";

/// Configuration for the sanitization backend.
///
/// Built once at startup and handed to [`crate::ModelArmorClient::new`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorConfig {
    /// Backend region, e.g. `us-central1`.
    pub location: String,

    /// Template used for prompts:
    /// `projects/<project>/locations/<location>/templates/<id>`.
    pub prompt_template: String,

    /// Template used for model responses.
    pub response_template: String,

    /// Base URL override. Defaults to the regional endpoint.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token for the backend.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

impl ArmorConfig {
    /// Create a configuration for a location and the two templates.
    pub fn new(
        location: impl Into<String>,
        prompt_template: impl Into<String>,
        response_template: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            prompt_template: prompt_template.into(),
            response_template: response_template.into(),
            endpoint: None,
            access_token: None,
        }
    }

    /// Set a base URL override.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the bearer token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizerError::Config`] if a required variable is unset.
    pub fn from_env() -> Result<Self, SanitizerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SanitizerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| SanitizerError::Config(format!("{} is not set", key)))
        };

        Ok(Self {
            location: require(ENV_LOCATION)?,
            prompt_template: require(ENV_PROMPT_TEMPLATE)?,
            response_template: require(ENV_RESPONSE_TEMPLATE)?,
            endpoint: get(ENV_ENDPOINT),
            access_token: get(ENV_ACCESS_TOKEN),
        })
    }

    /// Template resource name for a direction.
    pub fn template(&self, direction: Direction) -> &str {
        match direction {
            Direction::Prompt => &self.prompt_template,
            Direction::Response => &self.response_template,
        }
    }

    /// Base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://modelarmor.{}.rep.googleapis.com", self.location),
        }
    }

    /// Check the configuration for obvious mistakes.
    ///
    /// The location must be a region name and each template a full resource
    /// name. With the regional endpoint, a template must live in the
    /// configured location.
    pub fn validate(&self) -> Result<(), SanitizerError> {
        let location_ok = !self.location.is_empty()
            && self
                .location
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !location_ok {
            return Err(SanitizerError::Config(format!(
                "invalid location '{}'",
                self.location
            )));
        }

        let pattern = Regex::new(TEMPLATE_PATTERN)
            .map_err(|e| SanitizerError::Config(format!("template pattern: {}", e)))?;

        for direction in [Direction::Prompt, Direction::Response] {
            let template = self.template(direction);
            let captures = pattern.captures(template).ok_or_else(|| {
                SanitizerError::Config(format!(
                    "{} template '{}' is not a template resource name",
                    direction, template
                ))
            })?;

            if self.endpoint.is_none() && &captures[1] != self.location {
                return Err(SanitizerError::Config(format!(
                    "{} template '{}' is not in location '{}'",
                    direction, template, self.location
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ArmorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArmorConfig")
            .field("location", &self.location)
            .field("prompt_template", &self.prompt_template)
            .field("response_template", &self.response_template)
            .field("endpoint", &self.endpoint)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
