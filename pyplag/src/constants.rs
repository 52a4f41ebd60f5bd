use regex::Regex;
use std::sync::OnceLock;

/// Project configuration file name.
pub const CONFIG_FILENAME: &str = ".pyplag.toml";

/// Python project file that may carry a `[tool.pyplag]` table.
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

/// Decimal places written per score unless configured otherwise.
pub const DEFAULT_PRECISION: usize = 2;

/// Scores at or above this value are highlighted in the terminal report.
pub const DEFAULT_HIGHLIGHT: f64 = 0.8;

/// Regex for file names accepted as source files.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_python_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"^.+\.py$").expect("Invalid python file regex pattern"))
}

/// Regex for file names accepted as the pairs manifest and the scores file.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_text_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"^.+\.txt$").expect("Invalid text file regex pattern"))
}
