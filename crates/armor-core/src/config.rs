//! Configuration types for the Model Armor callout.

use armor_sanitizer::{ArmorConfig, SanitizerError};
use serde::{Deserialize, Serialize};

use crate::callout::FailureMode;

/// Environment variable that switches the callout to fail-open.
pub const ENV_FAIL_OPEN: &str = "CALLOUT_FAIL_OPEN";

/// Process-wide configuration, built once at startup.
///
/// The decision engine itself takes no configuration; this struct feeds the
/// sanitization client and the transport-side failure policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalloutConfig {
    /// Sanitization backend configuration.
    pub sanitizer: ArmorConfig,

    /// Global settings.
    #[serde(default)]
    pub global: GlobalConfig,
}

/// Global callout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Fail-closed mode: screening errors reject traffic instead of forwarding it.
    pub fail_closed: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self { fail_closed: true }
    }
}

impl CalloutConfig {
    /// Create a fail-closed configuration.
    pub fn new(sanitizer: ArmorConfig) -> Self {
        Self {
            sanitizer,
            global: GlobalConfig::default(),
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, SanitizerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SanitizerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sanitizer = ArmorConfig::from_lookup(&lookup)?;
        let fail_open = lookup(ENV_FAIL_OPEN)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            sanitizer,
            global: GlobalConfig {
                fail_closed: !fail_open,
            },
        })
    }

    /// Failure mode implied by [`GlobalConfig::fail_closed`].
    pub fn failure_mode(&self) -> FailureMode {
        if self.global.fail_closed {
            FailureMode::Closed
        } else {
            FailureMode::Open
        }
    }
}

/// Interpret a boolean flag value (`1`, `true`, `yes`, `on`).
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
