//! Utilities module for pyplag.
//!
//! This module provides various utility functions used across the codebase.

mod paths;

pub use paths::{has_python_name, has_text_name, normalize_display_path, resolve_against};

use ruff_text_size::TextSize;

/// A utility struct to convert byte offsets to line and column numbers.
///
/// The parser reports byte offsets; errors are shown to users as line:column.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration for performance since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        // Binary search to find which line range the offset falls into.
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a byte offset to a 1-indexed (line, column) pair.
    /// Columns count characters, not bytes.
    #[must_use]
    pub fn line_column(&self, source: &str, offset: TextSize) -> (usize, usize) {
        let line = self.line_index(offset);
        let start = self.line_starts[line - 1];
        let end = offset.to_usize().clamp(start, source.len());
        let column = source
            .get(start..end)
            .map_or(end - start, |prefix| prefix.chars().count())
            + 1;
        (line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("a = 1\nb = 2\n");
        assert_eq!(index.line_index(TextSize::from(0)), 1);
        assert_eq!(index.line_index(TextSize::from(5)), 1);
        assert_eq!(index.line_index(TextSize::from(6)), 2);
    }

    #[test]
    fn test_line_column_counts_chars() {
        let source = "a = 'é'\nbb";
        let index = LineIndex::new(source);
        let end = TextSize::try_from(source.len()).unwrap();
        assert_eq!(index.line_column(source, end), (2, 3));
        assert_eq!(index.line_column(source, TextSize::from(0)), (1, 1));
        // Byte 7 is the closing quote, after the two-byte 'é'.
        assert_eq!(index.line_column(source, TextSize::from(7)), (1, 7));
    }
}
