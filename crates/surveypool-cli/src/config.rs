//! Configuration loading from TOML files

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for surveypool
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub workers: WorkersConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_dir: PathBuf,
    pub compression_level: i32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_dir: PathBuf::from("./data"),
            compression_level: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorkersConfig {
    pub default: usize,
    pub max: usize,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            default: cpus.min(8),
            max: 16,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./surveypool.toml (current directory)
    /// 2. ~/.config/surveypool/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("surveypool.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "surveypool") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.output.default_dir, PathBuf::from("./data"));
        assert_eq!(config.output.compression_level, 3);
        assert!(config.workers.default >= 1);
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
[output]
default_dir = "/tmp/pool"
compression_level = 5

[workers]
default = 4
max = 8
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.default_dir, PathBuf::from("/tmp/pool"));
        assert_eq!(config.output.compression_level, 5);
        assert_eq!(config.workers.default, 4);
        assert_eq!(config.workers.max, 8);
    }

    #[test]
    fn from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surveypool.toml");
        std::fs::write(
            &path,
            "[output]\ndefault_dir = \"/srv/pool\"\ncompression_level = 9\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.default_dir, PathBuf::from("/srv/pool"));
        assert_eq!(config.output.compression_level, 9);
        // Omitted sections fall back to defaults.
        assert_eq!(config.workers.max, 16);
    }

    #[test]
    fn from_file_missing_is_error() {
        let path = PathBuf::from("/no/such/surveypool.toml");
        assert!(Config::from_file(&path).is_err());
    }
}
