//! Verdict interpretation.
//!
//! Pure mapping from a backend [`Verdict`] to an [`Outcome`]:
//!
//! ```text
//! matched == false            ──► Allow(original)
//! matched && sdp matched      ──► Rewrite(sdp rewrite, or original)
//! matched otherwise           ──► Block
//! ```
//!
//! Only the `sdp` filter has rewrite authority. Any other match blocks, even
//! when `sdp` is present and unmatched.

use armor_sanitizer::{FilterName, Verdict};

use crate::outcome::{BlockReason, Outcome};

/// Map a verdict to an outcome. Deterministic, no I/O.
///
/// When `sdp` matched but produced no rewritten text (absent or empty), the
/// original text is used. This holds for both directions.
pub fn interpret(verdict: &Verdict, original: &str) -> Outcome {
    if !verdict.matched {
        return Outcome::allow(original);
    }

    if let Some(sdp) = verdict.filter(&FilterName::Sdp) {
        if sdp.is_matched() {
            let text = sdp
                .rewrite()
                .filter(|rewrite| !rewrite.is_empty())
                .unwrap_or(original);
            return Outcome::rewrite(text);
        }
    }

    let filters = verdict.matched_filters();
    if filters.is_empty() {
        Outcome::block(BlockReason::UnattributedMatch)
    } else {
        Outcome::block(BlockReason::FilterMatch { filters })
    }
}
