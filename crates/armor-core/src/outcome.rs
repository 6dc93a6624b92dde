//! Screening outcomes.

use armor_sanitizer::FilterName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The engine's decision for one screened text.
///
/// Exactly one variant is produced per screening call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing triggered. Forward unchanged.
    Allow {
        /// The original text.
        text: String,
    },

    /// The de-identification filter produced safe text to forward instead.
    Rewrite {
        /// Replacement text.
        text: String,
    },

    /// A policy filter triggered. Do not forward.
    Block {
        /// Why the text was blocked.
        reason: BlockReason,
    },
}

impl Outcome {
    /// Create an Allow outcome.
    pub fn allow(text: impl Into<String>) -> Self {
        Self::Allow { text: text.into() }
    }

    /// Create a Rewrite outcome.
    pub fn rewrite(text: impl Into<String>) -> Self {
        Self::Rewrite { text: text.into() }
    }

    /// Create a Block outcome.
    pub fn block(reason: BlockReason) -> Self {
        Self::Block { reason }
    }

    /// Returns true if this is an Allow outcome.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Returns true if this is a Rewrite outcome.
    pub fn is_rewrite(&self) -> bool {
        matches!(self, Self::Rewrite { .. })
    }

    /// Returns true if this is a Block outcome.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    /// Text to forward, if the outcome forwards anything.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Allow { text } | Self::Rewrite { text } => Some(text),
            Self::Block { .. } => None,
        }
    }
}

/// Reasons for blocking a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// One or more filters without rewrite authority triggered.
    FilterMatch {
        /// The filters that triggered.
        filters: Vec<FilterName>,
    },

    /// The backend flagged the text without attributing it to a filter.
    UnattributedMatch,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilterMatch { filters } => {
                let names: Vec<&str> = filters.iter().map(FilterName::as_str).collect();
                write!(f, "content violates safety policy ({})", names.join(", "))
            }
            Self::UnattributedMatch => write!(f, "content violates safety policy"),
        }
    }
}
