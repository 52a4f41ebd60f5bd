use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::ErrorPolicy;
use crate::constants::{CONFIG_FILENAME, PYPROJECT_FILENAME};

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for pyplag.
    pub pyplag: PyplagConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for pyplag. Every key is optional; CLI flags win.
pub struct PyplagConfig {
    /// What to do when a pair cannot be scored (`abort` or `skip`).
    pub on_error: Option<ErrorPolicy>,
    /// Decimal places written per score.
    pub precision: Option<usize>,
    /// Refuse source files whose canonical form exceeds this many characters.
    pub max_chars: Option<usize>,
    /// Worker threads used for comparison (defaults to one per core).
    pub jobs: Option<usize>,
    /// Scores at or above this value are highlighted in the report.
    pub highlight: Option<f64>,
    /// Whether to require `.py` sources and `.txt` manifest/output names.
    pub check_extensions: Option<bool>,
    /// Resolve relative paths in the manifest against its own directory.
    pub relative_to_manifest: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
struct PyProject {
    tool: ToolConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct ToolConfig {
    pyplag: PyplagConfig,
}

impl Config {
    /// Loads configuration from default locations (.pyplag.toml or pyproject.toml in current dir).
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            // 1. Try CONFIG_FILENAME
            let pyplag_toml = current.join(CONFIG_FILENAME);
            if pyplag_toml.exists() {
                if let Ok(content) = fs::read_to_string(&pyplag_toml) {
                    if let Ok(mut config) = toml::from_str::<Config>(&content) {
                        config.config_file_path = Some(pyplag_toml);
                        return config;
                    }
                }
            }

            // 2. Try PYPROJECT_FILENAME
            let pyproject_toml = current.join(PYPROJECT_FILENAME);
            if pyproject_toml.exists() {
                if let Ok(content) = fs::read_to_string(&pyproject_toml) {
                    if let Ok(pyproject) = toml::from_str::<PyProject>(&content) {
                        return Config {
                            pyplag: pyproject.tool.pyplag,
                            config_file_path: Some(pyproject_toml),
                        };
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_path_no_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(dir.path());
        assert!(config.pyplag.on_error.is_none());
        assert!(config.pyplag.precision.is_none());
    }

    #[test]
    fn test_load_from_path_pyplag_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".pyplag.toml")).unwrap();
        writeln!(
            file,
            r#"[pyplag]
on_error = "skip"
precision = 3
max_chars = 50000
"#
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.pyplag.on_error, Some(ErrorPolicy::Skip));
        assert_eq!(config.pyplag.precision, Some(3));
        assert_eq!(config.pyplag.max_chars, Some(50000));
        assert!(config.config_file_path.is_some());
    }

    #[test]
    fn test_load_from_path_pyproject_toml() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("pyproject.toml")).unwrap();
        writeln!(
            file,
            r"[tool.pyplag]
jobs = 2
check_extensions = false
"
        )
        .unwrap();

        let config = Config::load_from_path(dir.path());
        assert_eq!(config.pyplag.jobs, Some(2));
        assert_eq!(config.pyplag.check_extensions, Some(false));
    }

    #[test]
    fn test_load_from_path_traverses_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("batches").join("week1");
        std::fs::create_dir_all(&nested).unwrap();

        let mut file = std::fs::File::create(dir.path().join(".pyplag.toml")).unwrap();
        writeln!(
            file,
            r"[pyplag]
highlight = 0.9
"
        )
        .unwrap();

        let config = Config::load_from_path(&nested);
        assert_eq!(config.pyplag.highlight, Some(0.9));
    }

    #[test]
    fn test_load_from_file_path() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join(".pyplag.toml")).unwrap();
        writeln!(
            file,
            r"[pyplag]
relative_to_manifest = true
"
        )
        .unwrap();

        let manifest = dir.path().join("input.txt");
        std::fs::write(&manifest, "a.py b.py\n").unwrap();

        let config = Config::load_from_path(&manifest);
        assert_eq!(config.pyplag.relative_to_manifest, Some(true));
    }
}
