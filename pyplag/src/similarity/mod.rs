//! Edit-distance similarity between canonical forms.
//!
//! The scorer treats its inputs as opaque strings and has no knowledge of
//! Python syntax.

mod distance;
mod score;

pub use distance::{edit_distance, sequence_distance};
pub use score::{normalize, score, DegenerateInputError};

use crate::canonical::CanonicalForm;
use serde::Serialize;

/// Result of scoring one pair of canonical forms
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairScore {
    /// Normalized similarity, `1 - distance / min(left_len, right_len)`
    pub score: f64,
    /// Character edit distance between the two forms
    pub distance: usize,
    /// Character length of the left form
    pub left_len: usize,
    /// Character length of the right form
    pub right_len: usize,
}

/// Score two canonical forms, keeping the distance and lengths for reporting.
///
/// # Errors
/// Returns [`DegenerateInputError`] when the shorter form is empty.
pub fn compare(left: &CanonicalForm, right: &CanonicalForm) -> Result<PairScore, DegenerateInputError> {
    let distance = edit_distance(left.as_str(), right.as_str());
    let score = normalize(distance, left.char_len(), right.char_len())?;
    Ok(PairScore {
        score,
        distance,
        left_len: left.char_len(),
        right_len: right.char_len(),
    })
}
