//! Build configuration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use usnvc_core::SchemaVersion;
use usnvc_source::SourceConfig;

/// Format of the `Date Processed` timestamp
const PROCESSED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Settings threaded through every build call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Schema version gating the optional distribution and crosswalk joins
    pub version: SchemaVersion,
    /// Pinned processing timestamp; the current time is used when unset
    pub processed_at: Option<DateTime<Utc>>,
}

impl BuildConfig {
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            version,
            processed_at: None,
        }
    }

    /// Pin the processing timestamp
    pub fn with_processed_at(mut self, processed_at: DateTime<Utc>) -> Self {
        self.processed_at = Some(processed_at);
        self
    }

    /// Timestamp written to `Date Processed`
    pub fn processed_timestamp(&self) -> String {
        self.processed_at
            .unwrap_or_else(Utc::now)
            .format(PROCESSED_FORMAT)
            .to_string()
    }
}

impl From<&SourceConfig> for BuildConfig {
    fn from(source: &SourceConfig) -> Self {
        Self::new(source.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pinned_timestamp() {
        let at = Utc.with_ymd_and_hms(2019, 3, 1, 12, 30, 0).unwrap();
        let config = BuildConfig::new(SchemaVersion::V2_02).with_processed_at(at);
        assert_eq!(config.processed_timestamp(), "2019-03-01T12:30:00.000000");
    }

    #[test]
    fn test_from_source_config() {
        let source = SourceConfig::default().with_version(SchemaVersion::V2_02);
        let config = BuildConfig::from(&source);
        assert_eq!(config.version, SchemaVersion::V2_02);
        assert!(config.processed_at.is_none());
    }
}
