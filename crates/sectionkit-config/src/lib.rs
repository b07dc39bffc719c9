use sectionkit_engine::{DEFAULT_EDGE_COMPLETION_OFFSET, DataSourceOptions, RowAnimation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid edge_completion_offset {value} in {config_path}: must be a non-negative number")]
    InvalidEdgeOffset { config_path: PathBuf, value: f64 },
}

/// Host-facing list behaviour, stored as TOML. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Distance from the top or bottom edge at which the reached-edge callbacks fire
    pub edge_completion_offset: f64,
    pub row_animation: RowAnimation,
    pub deselect_after_tap: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from(DataSourceOptions::default())
    }
}

impl From<DataSourceOptions> for Config {
    fn from(options: DataSourceOptions) -> Self {
        Self {
            edge_completion_offset: options.edge_completion_offset,
            row_animation: options.row_animation,
            deselect_after_tap: options.deselect_after_tap,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        let offset = config.edge_completion_offset;
        if offset.is_nan() || offset < 0.0 {
            return Err(ConfigError::InvalidEdgeOffset {
                config_path: config_path.to_path_buf(),
                value: offset,
            });
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/sectionkit");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Options for a [`DataSource`](sectionkit_engine::DataSource)
    pub fn options(&self) -> DataSourceOptions {
        DataSourceOptions {
            edge_completion_offset: self.edge_completion_offset,
            row_animation: self.row_animation,
            deselect_after_tap: self.deselect_after_tap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/sectionkit/config.toml"));
    }

    #[test]
    fn test_defaults_match_engine() {
        let config = Config::default();

        assert_eq!(config.edge_completion_offset, DEFAULT_EDGE_COMPLETION_OFFSET);
        assert_eq!(config.options(), DataSourceOptions::default());
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: Config = toml::from_str("deselect_after_tap = false\n").unwrap();

        assert_eq!(
            config,
            Config {
                deselect_after_tap: false,
                ..Config::default()
            }
        );
    }

    #[test]
    fn test_row_animation_is_lowercase_in_toml() {
        let config: Config = toml::from_str(
            r#"
edge_completion_offset = 120.0
row_animation = "fade"
"#,
        )
        .unwrap();

        assert_eq!(config.row_animation, RowAnimation::Fade);
        assert_eq!(config.options().edge_completion_offset, 120.0);

        let written = toml::to_string(&config).unwrap();
        assert!(written.contains("row_animation = \"fade\""));
    }

    #[test]
    fn test_unknown_animation_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "row_animation = \"wobble\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_negative_edge_offset_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "edge_completion_offset = -5.0\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidEdgeOffset { value, .. } if value == -5.0
        ));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config {
            edge_completion_offset: 12.5,
            row_animation: RowAnimation::Left,
            deselect_after_tap: false,
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
