//! Error types shared across the USNVC crates

use thiserror::Error;

/// Errors related to the schema version selector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Unsupported source schema version: {0}")]
    Malformed(String),
}

/// Errors related to rendering a unit document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_version_message() {
        let err = VersionError::Malformed("3.1".to_string());
        assert!(err.to_string().contains("3.1"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: DocumentError = serde_err.into();
        assert!(matches!(err, DocumentError::Serialization(_)));
    }
}
