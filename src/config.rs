//! Application configuration: defaults, optional JSON file, CLI overrides.

use crate::data::{PresentationSpec, ViewMode, DEFAULT_ROWS, MAX_ROWS, MIN_ROWS};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Config file layout. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    output_dir: Option<PathBuf>,
    mode: Option<ViewMode>,
    max_rows: Option<usize>,
    preferred_columns: Option<Vec<String>>,
    performance_labels: Option<Vec<(String, String)>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub mode: ViewMode,
    pub max_rows: usize,
    pub presentation: PresentationSpec,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            mode: ViewMode::default(),
            max_rows: DEFAULT_ROWS,
            presentation: PresentationSpec::default(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, falling back to defaults for absent fields.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let file: ConfigFile = serde_json::from_str(content)?;
        let defaults = Self::default();
        let presentation = PresentationSpec {
            preferred_columns: file
                .preferred_columns
                .unwrap_or(defaults.presentation.preferred_columns),
            performance_labels: file
                .performance_labels
                .unwrap_or(defaults.presentation.performance_labels),
        };

        Ok(Self {
            output_dir: file.output_dir.unwrap_or(defaults.output_dir),
            mode: file.mode.unwrap_or(defaults.mode),
            max_rows: file
                .max_rows
                .unwrap_or(defaults.max_rows)
                .clamp(MIN_ROWS, MAX_ROWS),
            presentation,
        })
    }

    /// Apply command line overrides.
    pub fn with_overrides(mut self, output_dir: Option<PathBuf>, mode: Option<ViewMode>) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(mode) = mode {
            self.mode = mode;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.mode, ViewMode::Filtered);
        assert_eq!(config.presentation.preferred_columns.len(), 8);
        assert_eq!(
            config.presentation.label_for("6M"),
            Some("6M Performance")
        );
    }

    #[test]
    fn test_config_file_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("viewer.json");
        fs::write(
            &path,
            r#"{
                "output_dir": "data/out",
                "mode": "pass-through",
                "max_rows": 5000,
                "preferred_columns": ["symbol", "1W"],
                "performance_labels": [["1W", "1W Performance"]]
            }"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("data/out"));
        assert_eq!(config.mode, ViewMode::PassThrough);
        assert_eq!(config.max_rows, MAX_ROWS);
        assert_eq!(config.presentation.preferred_columns, vec!["symbol", "1W"]);
        assert_eq!(config.presentation.label_for("1W"), Some("1W Performance"));
        assert_eq!(config.presentation.label_for("1M"), None);
    }

    #[test]
    fn test_config_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            AppConfig::load_from(&dir.path().join("missing.json")),
            Err(ConfigError::Read { .. })
        ));

        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"mode": "sideways"}"#).unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = AppConfig::default()
            .with_overrides(Some(PathBuf::from("elsewhere")), Some(ViewMode::PassThrough));
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.mode, ViewMode::PassThrough);

        let unchanged = AppConfig::default().with_overrides(None, None);
        assert_eq!(unchanged, AppConfig::default());
    }
}
