//! Typed verdicts returned by the sanitization backend.
//!
//! A [`Verdict`] is the validated form of one backend answer. Filter results
//! are keyed by [`FilterName`] rather than by raw string, and only the
//! de-identification filter can ever carry rewritten text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Names of the backend filters.
///
/// The backend reports results under string keys. Known keys map to their
/// own variant; anything else is preserved as [`FilterName::Other`] so a new
/// backend filter still blocks instead of being silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum FilterName {
    /// Sensitive Data Protection de-identification. The only filter with
    /// rewrite authority.
    Sdp,
    /// Sensitive Data Protection inspection finding (matched, but no
    /// de-identified text was produced).
    SdpInspect,
    /// Responsible AI categories (hate, harassment, dangerous, sexual).
    Rai,
    /// Prompt injection and jailbreak detection.
    PiAndJailbreak,
    /// Malicious URL detection.
    MaliciousUris,
    /// Child safety filter.
    Csam,
    /// Malware scanning of embedded content.
    VirusScan,
    /// A filter this crate does not know by name.
    Other(String),
}

impl FilterName {
    /// Backend key for this filter.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sdp => "sdp",
            Self::SdpInspect => "sdp_inspect",
            Self::Rai => "rai",
            Self::PiAndJailbreak => "pi_and_jailbreak",
            Self::MaliciousUris => "malicious_uris",
            Self::Csam => "csam",
            Self::VirusScan => "virus_scan",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for FilterName {
    fn from(name: &str) -> Self {
        match name {
            "sdp" => Self::Sdp,
            "sdp_inspect" => Self::SdpInspect,
            "rai" => Self::Rai,
            "pi_and_jailbreak" => Self::PiAndJailbreak,
            "malicious_uris" => Self::MaliciousUris,
            "csam" => Self::Csam,
            "virus_scan" => Self::VirusScan,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FilterName {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<FilterName> for String {
    fn from(name: FilterName) -> Self {
        name.as_str().to_string()
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterResult {
    /// The filter triggered. `rewrite` holds de-identified text when the
    /// filter produced one.
    Matched {
        /// Replacement text, only ever set for [`FilterName::Sdp`].
        rewrite: Option<String>,
    },
    /// The filter ran and did not trigger.
    Unmatched,
}

impl FilterResult {
    /// A match without rewrite.
    pub fn matched() -> Self {
        Self::Matched { rewrite: None }
    }

    /// A match carrying rewritten text.
    pub fn rewritten(text: impl Into<String>) -> Self {
        Self::Matched {
            rewrite: Some(text.into()),
        }
    }

    /// Returns true if the filter triggered.
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Rewritten text, if any.
    pub fn rewrite(&self) -> Option<&str> {
        match self {
            Self::Matched { rewrite } => rewrite.as_deref(),
            Self::Unmatched => None,
        }
    }
}

/// The backend's finding for one screened text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether any filter triggered.
    pub matched: bool,

    /// Per-filter results.
    pub filters: BTreeMap<FilterName, FilterResult>,
}

impl Verdict {
    /// A verdict where nothing matched.
    pub fn clean() -> Self {
        Self::default()
    }

    /// A verdict flagged as matched, with no filter results yet.
    pub fn flagged() -> Self {
        Self {
            matched: true,
            filters: BTreeMap::new(),
        }
    }

    /// Add or replace a filter result.
    pub fn with_filter(mut self, name: FilterName, result: FilterResult) -> Self {
        self.filters.insert(name, result);
        self
    }

    /// Look up one filter result.
    pub fn filter(&self, name: &FilterName) -> Option<&FilterResult> {
        self.filters.get(name)
    }

    /// Names of all filters that triggered, in key order.
    pub fn matched_filters(&self) -> Vec<FilterName> {
        self.filters
            .iter()
            .filter(|(_, result)| result.is_matched())
            .map(|(name, _)| name.clone())
            .collect()
    }
}
