//! Batch comparison of manifest pairs.
//!
//! Every distinct file is read and canonicalized once, then the pairs are
//! scored in parallel. Results come back in manifest order regardless of
//! which worker finished first.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::canonical::{canonicalize, CanonicalForm, ParseError};
use crate::manifest::ComparisonPair;
use crate::output::create_progress_bar;
use crate::similarity::{compare, DegenerateInputError, PairScore};
use crate::utils::{has_python_name, normalize_display_path};

/// What a batch does with a pair that cannot be scored.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Fail the whole batch on the first failing pair; nothing is written.
    #[default]
    Abort,
    /// Drop failing pairs and keep the remaining scores in order.
    Skip,
}

/// Knobs for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Require source files to be named `*.py`.
    pub check_extensions: bool,
    /// Refuse canonical forms longer than this many characters.
    pub max_chars: Option<usize>,
    /// Size of the worker pool; `None` uses rayon's global pool.
    pub jobs: Option<usize>,
    /// Draw a progress bar on stderr while canonicalizing.
    pub show_progress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            check_extensions: true,
            max_chars: None,
            jobs: None,
            show_progress: false,
        }
    }
}

/// Why a single source file could not be canonicalized.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),
    /// The file name does not end in `.py`.
    #[error("incorrect file name, expected a *.py source file")]
    Extension,
    /// The canonical form exceeds the configured limit.
    #[error("canonical form has {chars} characters, over the limit of {limit}")]
    TooLarge {
        /// Characters in the canonical form
        chars: usize,
        /// Configured `max_chars`
        limit: usize,
    },
    /// The file is not valid Python.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Underlying cause of a [`CompareError`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum FailureReason {
    /// One of the two files failed to load or parse.
    #[error(transparent)]
    Source(Arc<SourceError>),
    /// One of the canonical forms is empty.
    #[error(transparent)]
    Degenerate(#[from] DegenerateInputError),
}

/// A pair that could not be scored, with enough context to find it.
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "pair #{} (line {line}) failed on {}: {source}",
    .index + 1,
    normalize_display_path(.file)
)]
pub struct CompareError {
    /// 0-indexed position of the pair
    pub index: usize,
    /// 1-indexed manifest line
    pub line: usize,
    /// The file responsible for the failure
    pub file: PathBuf,
    /// What went wrong
    pub source: FailureReason,
}

/// The outcome for one pair.
#[derive(Debug, Clone)]
pub struct PairResult {
    /// The pair as listed in the manifest
    pub pair: ComparisonPair,
    /// Its score, or why it has none
    pub outcome: Result<PairScore, CompareError>,
}

/// Outcomes for a whole batch, in manifest order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One entry per requested pair
    pub results: Vec<PairResult>,
    /// Number of distinct files that were canonicalized
    pub files: usize,
}

impl BatchReport {
    /// The score list to write, according to `policy`.
    ///
    /// # Errors
    /// Under [`ErrorPolicy::Abort`], returns the first failing pair in
    /// manifest order.
    pub fn scores(&self, policy: ErrorPolicy) -> Result<Vec<f64>, CompareError> {
        let mut scores = Vec::with_capacity(self.results.len());
        for result in &self.results {
            match (&result.outcome, policy) {
                (Ok(score), _) => scores.push(score.score),
                (Err(err), ErrorPolicy::Abort) => return Err(err.clone()),
                (Err(_), ErrorPolicy::Skip) => {}
            }
        }
        Ok(scores)
    }

    /// Failed pairs in manifest order.
    pub fn failures(&self) -> impl Iterator<Item = &CompareError> {
        self.results.iter().filter_map(|r| r.outcome.as_ref().err())
    }

    /// Number of pairs that were scored.
    #[must_use]
    pub fn scored(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }

    /// Number of pairs that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.scored()
    }
}

type CacheEntry = Result<Arc<CanonicalForm>, Arc<SourceError>>;

/// Runs a list of comparison pairs.
#[derive(Debug, Clone, Default)]
pub struct BatchComparer {
    options: BatchOptions,
}

impl BatchComparer {
    /// Creates a comparer with the given options.
    #[must_use]
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    /// Scores every pair. Failures are recorded per pair; the policy is
    /// applied later by [`BatchReport::scores`].
    #[must_use]
    pub fn run(&self, pairs: &[ComparisonPair]) -> BatchReport {
        if let Some(jobs) = self.options.jobs {
            // A pool that cannot be built leaves the global pool in charge.
            if let Ok(pool) = rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                return pool.install(|| self.run_in_pool(pairs));
            }
        }
        self.run_in_pool(pairs)
    }

    fn run_in_pool(&self, pairs: &[ComparisonPair]) -> BatchReport {
        let mut files: Vec<&Path> = pairs
            .iter()
            .flat_map(|p| [p.left.as_path(), p.right.as_path()])
            .collect();
        files.sort_unstable();
        files.dedup();

        let pb = if self.options.show_progress {
            create_progress_bar(files.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let cache: FxHashMap<&Path, CacheEntry> = files
            .par_iter()
            .map(|path| {
                let entry = self.load(path);
                pb.inc(1);
                (*path, entry)
            })
            .collect();
        pb.finish_and_clear();

        let results = pairs
            .par_iter()
            .map(|pair| PairResult {
                pair: pair.clone(),
                outcome: self.score_pair(pair, &cache),
            })
            .collect();

        BatchReport {
            results,
            files: files.len(),
        }
    }

    fn load(&self, path: &Path) -> CacheEntry {
        self.canonicalize_file(path)
            .map(Arc::new)
            .map_err(Arc::new)
    }

    /// Reads and canonicalizes one source file, applying the batch checks.
    ///
    /// # Errors
    /// Returns a [`SourceError`] describing the first check that failed.
    pub fn canonicalize_file(&self, path: &Path) -> Result<CanonicalForm, SourceError> {
        if self.options.check_extensions && !has_python_name(path) {
            return Err(SourceError::Extension);
        }
        let source = fs::read_to_string(path)?;
        let form = canonicalize(&source)?;
        if let Some(limit) = self.options.max_chars {
            if form.char_len() > limit {
                return Err(SourceError::TooLarge {
                    chars: form.char_len(),
                    limit,
                });
            }
        }
        Ok(form)
    }

    fn score_pair(
        &self,
        pair: &ComparisonPair,
        cache: &FxHashMap<&Path, CacheEntry>,
    ) -> Result<PairScore, CompareError> {
        let fail = |file: &Path, source: FailureReason| CompareError {
            index: pair.index,
            line: pair.line,
            file: file.to_path_buf(),
            source,
        };
        let lookup = |path: &Path| -> Result<Arc<CanonicalForm>, CompareError> {
            cache
                .get(path)
                .cloned()
                .unwrap_or_else(|| self.load(path))
                .map_err(|err| fail(path, FailureReason::Source(err)))
        };

        let left = lookup(&pair.left)?;
        let right = lookup(&pair.right)?;
        compare(&left, &right).map_err(|err| {
            let file = if err.left_len == 0 {
                &pair.left
            } else {
                &pair.right
            };
            fail(file, FailureReason::Degenerate(err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn manifest_in(dir: &TempDir, text: &str) -> Manifest {
        Manifest::parse(text).unwrap().resolved_against(dir.path())
    }

    #[test]
    fn test_identical_files_score_one() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "print(1)\n");
        write(&dir, "b.py", "print( 1 )  # same\n");
        let manifest = manifest_in(&dir, "a.py b.py\n");

        let report = BatchComparer::default().run(&manifest.pairs);
        let scores = report.scores(ErrorPolicy::Abort).unwrap();
        assert_eq!(scores.len(), 1);
        assert!((scores[0] - 1.0).abs() < f64::EPSILON);
        assert_eq!(report.files, 2);
    }

    #[test]
    fn test_abort_and_skip_policies() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "x = 1\n");
        write(&dir, "b.py", "x = 2\n");
        write(&dir, "broken.py", "def f(:\n");
        let manifest = manifest_in(&dir, "a.py b.py\na.py broken.py\nb.py a.py\n");

        let report = BatchComparer::default().run(&manifest.pairs);
        assert_eq!(report.scored(), 2);
        assert_eq!(report.failed(), 1);

        let err = report.scores(ErrorPolicy::Abort).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.line, 2);
        assert!(err.file.ends_with("broken.py"));
        assert!(matches!(
            &err.source,
            FailureReason::Source(source) if matches!(**source, SourceError::Parse(_))
        ));

        let scores = report.scores(ErrorPolicy::Skip).unwrap();
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - scores[1]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_extension_check() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "pass\n");
        write(&dir, "b.txt", "pass\n");
        let manifest = manifest_in(&dir, "a.py b.txt\n");

        let report = BatchComparer::default().run(&manifest.pairs);
        let err = report.scores(ErrorPolicy::Abort).unwrap_err();
        assert!(err.file.ends_with("b.txt"));
        assert!(err.to_string().contains("*.py"));

        let lenient = BatchComparer::new(BatchOptions {
            check_extensions: false,
            ..BatchOptions::default()
        });
        assert!(lenient.run(&manifest.pairs).scores(ErrorPolicy::Abort).is_ok());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "pass\n");
        let manifest = manifest_in(&dir, "a.py gone.py\n");

        let report = BatchComparer::default().run(&manifest.pairs);
        let err = report.failures().next().unwrap();
        assert!(matches!(
            &err.source,
            FailureReason::Source(source) if matches!(**source, SourceError::Read(_))
        ));
    }

    #[test]
    fn test_max_chars_guardrail() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "def f(a, b):\n    return a + b\n");
        write(&dir, "b.py", "pass\n");
        let manifest = manifest_in(&dir, "a.py b.py\n");

        let comparer = BatchComparer::new(BatchOptions {
            max_chars: Some(20),
            ..BatchOptions::default()
        });
        let err = comparer.run(&manifest.pairs).scores(ErrorPolicy::Abort).unwrap_err();
        assert!(err.file.ends_with("a.py"));
        assert!(err.to_string().contains("over the limit of 20"));
    }

    #[test]
    fn test_order_is_preserved_with_custom_pool() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "x = 1\n");
        write(&dir, "b.py", "x = 1\ny = 2\n");
        write(&dir, "c.py", "for i in range(10):\n    print(i)\n");
        let manifest = manifest_in(&dir, "a.py a.py\na.py c.py\na.py b.py\nc.py c.py\n");

        let comparer = BatchComparer::new(BatchOptions {
            jobs: Some(2),
            ..BatchOptions::default()
        });
        let report = comparer.run(&manifest.pairs);
        let indices: Vec<usize> = report.results.iter().map(|r| r.pair.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);

        let scores = report.scores(ErrorPolicy::Abort).unwrap();
        assert!((scores[0] - 1.0).abs() < f64::EPSILON);
        assert!(scores[1] < scores[2]);
        assert!((scores[3] - 1.0).abs() < f64::EPSILON);
        assert_eq!(report.files, 3);
    }

    #[test]
    fn test_empty_batch() {
        let report = BatchComparer::default().run(&[]);
        assert!(report.scores(ErrorPolicy::Abort).unwrap().is_empty());
        assert_eq!(report.files, 0);
    }
}
