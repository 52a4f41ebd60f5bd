//! Normalization of an edit distance into a similarity score.

use super::distance::edit_distance;

/// Raised when the shorter of two canonical forms is empty, which would
/// make the normalized score a division by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot score against an empty canonical form (lengths {left_len} and {right_len})")]
pub struct DegenerateInputError {
    /// Character length of the left input
    pub left_len: usize,
    /// Character length of the right input
    pub right_len: usize,
}

/// `1 - distance / min(left_len, right_len)`.
///
/// The result is not clamped: a distance larger than the shorter input
/// yields a negative score.
///
/// # Errors
/// Returns [`DegenerateInputError`] when the shorter length is zero.
#[allow(clippy::cast_precision_loss)]
pub fn normalize(
    distance: usize,
    left_len: usize,
    right_len: usize,
) -> Result<f64, DegenerateInputError> {
    let shorter = left_len.min(right_len);
    if shorter == 0 {
        return Err(DegenerateInputError {
            left_len,
            right_len,
        });
    }
    Ok(1.0 - distance as f64 / shorter as f64)
}

/// Similarity of two canonical strings.
///
/// # Errors
/// Returns [`DegenerateInputError`] when either string is empty.
pub fn score(left: &str, right: &str) -> Result<f64, DegenerateInputError> {
    let distance = edit_distance(left, right);
    normalize(distance, left.chars().count(), right.chars().count())
}
