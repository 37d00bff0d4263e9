//! Key Enumerator

use tracing::{info, instrument};
use usnvc_core::UnitId;
use usnvc_source::SourceReader;

use crate::error::BuildError;

const ALL_KEYS: &str = "SELECT element_global_id FROM Unit ORDER BY element_global_id";

/// Every unit identifier in the snapshot
#[instrument(skip(reader))]
pub fn all_keys(reader: &SourceReader) -> Result<Vec<UnitId>, BuildError> {
    let ids = reader.query_ids(ALL_KEYS, [])?;
    info!(count = ids.len(), "Enumerated unit keys");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use usnvc_source::SourceConfig;
    use usnvc_source::fixture::{UnitFixture, memory_reader};

    #[test]
    fn test_all_keys_lists_every_unit() {
        let reader = memory_reader(SourceConfig::default()).unwrap();
        for (id, parent) in [(3, None), (1, None), (2, Some(1))] {
            let mut unit = UnitFixture::new(id, "Class");
            if let Some(parent) = parent {
                unit = unit.with_parent(parent);
            }
            unit.insert(reader.connection()).unwrap();
        }

        let keys = all_keys(&reader).unwrap();
        assert_eq!(keys, vec![UnitId::new(1), UnitId::new(2), UnitId::new(3)]);
    }

    #[test]
    fn test_empty_snapshot_has_no_keys() {
        let reader = memory_reader(SourceConfig::default()).unwrap();
        assert!(all_keys(&reader).unwrap().is_empty());
    }
}
