//! Configuration for the source snapshot

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use usnvc_core::SchemaVersion;

/// Location and schema version of a materialized snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
    /// Schema version the snapshot was published under
    pub version: SchemaVersion,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./NVC v2.03 2019-03.db"),
            version: SchemaVersion::latest(),
        }
    }
}

impl SourceConfig {
    /// Create a configuration for a database file, at the latest version
    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Default::default()
        }
    }

    /// Set the schema version
    pub fn with_version(mut self, version: SchemaVersion) -> Self {
        self.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SourceConfig::default();
        assert_eq!(config.version, SchemaVersion::V2_03);
        assert!(config.db_path.to_string_lossy().ends_with(".db"));
    }

    #[test]
    fn test_builder_methods() {
        let config = SourceConfig::with_db_path("/tmp/nvc.db").with_version(SchemaVersion::V2_02);
        assert_eq!(config.db_path, PathBuf::from("/tmp/nvc.db"));
        assert_eq!(config.version, SchemaVersion::V2_02);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SourceConfig = serde_json::from_str(r#"{"version": "2.02"}"#).unwrap();
        assert_eq!(config.version, SchemaVersion::V2_02);
        assert_eq!(config.db_path, SourceConfig::default().db_path);
    }

    #[test]
    fn test_malformed_version_is_rejected() {
        let result = serde_json::from_str::<SourceConfig>(r#"{"version": "1.0"}"#);
        assert!(result.is_err());
    }
}
