//! Path utilities for pyplag.
//!
//! Display normalization, file-name checks for sources and manifests, and
//! resolution of manifest entries against a base directory.

use std::path::{Path, PathBuf};

use crate::constants::{get_python_file_re, get_text_file_re};

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" or ".\" prefix (for cleaner output)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use pyplag::utils::normalize_display_path;
///
/// assert_eq!(normalize_display_path(Path::new(".\\batch\\a.py")), "batch/a.py");
/// assert_eq!(normalize_display_path(Path::new("./src/b.py")), "src/b.py");
/// ```
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    let clean = s.trim_start_matches(r"\\?\");
    let normalized = clean.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

fn file_name_matches(path: &Path, re: &regex::Regex) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| re.is_match(name))
}

/// Whether the file name ends in `.py` with a non-empty stem.
#[must_use]
pub fn has_python_name(path: &Path) -> bool {
    file_name_matches(path, get_python_file_re())
}

/// Whether the file name ends in `.txt` with a non-empty stem.
#[must_use]
pub fn has_text_name(path: &Path) -> bool {
    file_name_matches(path, get_text_file_re())
}

/// Joins a relative `path` onto `base`. Absolute paths and a missing base
/// leave the path untouched.
#[must_use]
pub fn resolve_against(path: &Path, base: Option<&Path>) -> PathBuf {
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}
