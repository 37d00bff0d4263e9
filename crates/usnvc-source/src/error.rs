//! Error types for usnvc-source

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading the snapshot
#[derive(Debug, Error)]
pub enum SourceError {
    /// The snapshot file could not be opened
    #[error("Failed to open source database {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// A query failed to prepare or execute
    #[error("Query error: {0}")]
    Query(String),

    /// A single-row lookup returned no row
    #[error("Not found: {0}")]
    NotFound(String),
}

impl SourceError {
    /// Create a new NotFound error
    pub fn not_found(item: impl Into<String>) -> Self {
        Self::NotFound(item.into())
    }

    /// Create a new Query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }
}

impl From<rusqlite::Error> for SourceError {
    fn from(err: rusqlite::Error) -> Self {
        SourceError::Query(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = SourceError::not_found("unit 42");
        assert!(matches!(err, SourceError::NotFound(_)));
        assert!(err.to_string().contains("unit 42"));
    }

    #[test]
    fn test_sqlite_error_conversion() {
        let err: SourceError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, SourceError::Query(_)));
    }

    #[test]
    fn test_open_error_names_path() {
        let err = SourceError::Open {
            path: PathBuf::from("/data/missing.db"),
            message: "unable to open database file".to_string(),
        };
        assert!(err.to_string().contains("/data/missing.db"));
    }
}
