//! Error types for document building

use thiserror::Error;
use usnvc_core::{UnitId, VersionError};
use usnvc_source::SourceError;

/// Errors surfaced to callers of the builder
///
/// Enrichment misses and dangling parent references are not errors; they
/// degrade to sentinel values and are only logged.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The requested unit has no row in the `Unit` table
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error(transparent)]
    MalformedVersion(#[from] VersionError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

impl BuildError {
    /// Whether this error concerns a single missing unit
    pub fn is_unit_not_found(&self) -> bool {
        matches!(self, BuildError::UnitNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuildError::UnitNotFound(UnitId::new(860_123));
        assert_eq!(err.to_string(), "Unit not found: 860123");
        assert!(err.is_unit_not_found());

        let err = BuildError::from(VersionError::Malformed("3.0".to_string()));
        assert!(err.to_string().contains("3.0"));
        assert!(!err.is_unit_not_found());

        let err = BuildError::from(SourceError::query("no such table: Unit"));
        assert!(err.to_string().contains("no such table"));
    }
}
