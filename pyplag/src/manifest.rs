//! Pairs manifest parsing.
//!
//! A manifest is a text file listing one comparison per line as two
//! whitespace-separated paths:
//!
//! ```text
//! # week 3 submissions
//! alice/solution.py bob/solution.py
//! alice/solution.py carol/solution.py
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::{normalize_display_path, resolve_against};

/// Errors raised while reading a manifest. All of them occur before any
/// comparison runs.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// A non-blank, non-comment line did not hold exactly two paths.
    #[error("line {line}: expected 2 file paths per comparison, found {found}")]
    PairCount {
        /// 1-indexed manifest line
        line: usize,
        /// Number of tokens on the line
        found: usize,
    },
    /// The manifest file could not be read.
    #[error("cannot read manifest {}: {source}", normalize_display_path(.path))]
    Read {
        /// Manifest path as given
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// One requested comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPair {
    /// 0-indexed position among the manifest's pairs
    pub index: usize,
    /// 1-indexed manifest line the pair came from
    pub line: usize,
    /// First file
    pub left: PathBuf,
    /// Second file
    pub right: PathBuf,
}

impl ComparisonPair {
    /// Short label used in reports, e.g. `#2 (line 4)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("#{} (line {})", self.index + 1, self.line)
    }
}

/// The ordered list of pairs read from a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Pairs in file order
    pub pairs: Vec<ComparisonPair>,
}

impl Manifest {
    /// Parses manifest text.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    /// Returns [`ManifestError::PairCount`] for the first line that does not
    /// hold exactly two tokens.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut pairs = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            let [left, right] = tokens.as_slice() else {
                return Err(ManifestError::PairCount {
                    line: i + 1,
                    found: tokens.len(),
                });
            };
            pairs.push(ComparisonPair {
                index: pairs.len(),
                line: i + 1,
                left: PathBuf::from(*left),
                right: PathBuf::from(*right),
            });
        }
        Ok(Self { pairs })
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    /// Returns [`ManifestError::Read`] if the file cannot be read, or any
    /// error from [`Manifest::parse`].
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Rewrites relative pair paths against `base`.
    #[must_use]
    pub fn resolved_against(mut self, base: &Path) -> Self {
        for pair in &mut self.pairs {
            pair.left = resolve_against(&pair.left, Some(base));
            pair.right = resolve_against(&pair.right, Some(base));
        }
        self
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the manifest lists no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
