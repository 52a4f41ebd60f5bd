//! Wagner–Fischer edit distance.
//!
//! Only two rows of the DP table are kept, each as long as the shorter
//! input, so memory is O(min(n, m)) while time stays O(n * m).

/// Levenshtein distance between two strings, counted in characters.
///
/// ASCII-only inputs are compared byte-wise, which gives the same result
/// without decoding.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a.is_ascii() && b.is_ascii() {
        return sequence_distance(a.as_bytes(), b.as_bytes());
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    sequence_distance(&a, &b)
}

/// Levenshtein distance between two sequences of comparable items.
///
/// The shorter sequence indexes the columns so the rolling rows stay small.
#[must_use]
pub fn sequence_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let n = short.len();

    let mut prev_row: Vec<usize> = (0..=n).collect();
    let mut curr_row = vec![0usize; n + 1];

    for (i, long_item) in long.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, short_item) in short.iter().enumerate() {
            let substitute = prev_row[j] + usize::from(short_item != long_item);
            let delete = prev_row[j + 1] + 1;
            let insert = curr_row[j] + 1;
            curr_row[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_distances() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("gumbo", "gambol"), 2);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abcd", ""), 4);
    }

    #[test]
    fn test_identity() {
        assert_eq!(edit_distance("Module(Pass)", "Module(Pass)"), 0);
    }

    #[test]
    fn test_unicode_counts_characters() {
        assert_eq!(edit_distance("héllo", "hello"), 1);
        assert_eq!(edit_distance("", "日本"), 2);
    }

    #[test]
    fn test_symmetric_when_lengths_differ() {
        assert_eq!(
            edit_distance("Num:1", "Assign(Num:12)"),
            edit_distance("Assign(Num:12)", "Num:1")
        );
    }

    #[test]
    fn test_sequence_distance_on_tokens() {
        let a = ["if", "assign", "return"];
        let b = ["if", "assign", "assign", "return"];
        assert_eq!(sequence_distance(&a, &b), 1);
    }
}
