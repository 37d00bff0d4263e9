//! File configuration for the `usnvc` binary

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use usnvc_logging::LogConfig;
use usnvc_source::SourceConfig;

/// Contents of `usnvc.toml`
///
/// Every table is optional; missing tables and keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub logging: LogConfig,
}

impl CliConfig {
    /// Load a TOML configuration file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Logging for the `cache` command: silent stderr, JSONL files under
    /// `<cache dir>/logs` unless the `[logging.file]` table says otherwise
    pub fn cache_logging(&self) -> LogConfig {
        self.logging
            .clone()
            .for_cache_run(&self.cache.directory.join("logs"))
    }
}

/// Document cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory receiving one `<id>.json` per unit
    pub directory: PathBuf,
    /// Number of workers, each with its own connection
    pub workers: usize,
    /// Log every build stage transition
    pub audit: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./cache/usnvc"),
            workers: 4,
            audit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usnvc_core::SchemaVersion;
    use usnvc_logging::ConsoleFormat;

    #[test]
    fn test_full_config() {
        let config: CliConfig = toml::from_str(
            r#"
            [source]
            db_path = "data/NVC v2.02 snapshot.db"
            version = "2.02"

            [cache]
            directory = "out"
            workers = 8

            [logging]
            default_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.source.version, SchemaVersion::V2_02);
        assert_eq!(config.source.db_path, PathBuf::from("data/NVC v2.02 snapshot.db"));
        assert_eq!(config.cache.workers, 8);
        assert!(!config.cache.audit);
        assert_eq!(config.logging.default_level, "debug");
    }

    #[test]
    fn test_cache_logging_writes_under_cache_directory() {
        let config: CliConfig = toml::from_str(
            r#"
            [cache]
            directory = "out"

            [logging]
            default_level = "debug"
            "#,
        )
        .unwrap();
        let logging = config.cache_logging();
        assert_eq!(logging.console, ConsoleFormat::Off);
        assert_eq!(logging.default_level, "debug");
        assert_eq!(logging.file.unwrap().directory, PathBuf::from("out/logs"));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let result: Result<CliConfig, _> = toml::from_str(
            r#"
            [source]
            version = "1.0"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = CliConfig::load(Path::new("/nonexistent/usnvc.toml")).unwrap_err();
        assert!(err.to_string().contains("usnvc.toml"));
    }
}
