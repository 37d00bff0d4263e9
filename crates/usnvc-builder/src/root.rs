//! Root Synthesizer

use tracing::{info, instrument};
use usnvc_core::{HierarchySection, UnitDocument, UnitId};
use usnvc_source::SourceReader;

use crate::error::BuildError;

/// Title of the virtual root document
pub const ROOT_TITLE: &str = "US National Vegetation Classification";

const TOP_LEVEL_UNITS: &str =
    "SELECT element_global_id FROM Unit WHERE PARENT_ID IS NULL ORDER BY element_global_id";

/// Build the virtual root (id 0) whose children are every top-level unit
///
/// The root is not a row in the snapshot; its `parent` and `ancestors` are
/// serialized as `null`.
#[instrument(skip(reader))]
pub fn synthesize_root(reader: &SourceReader) -> Result<UnitDocument, BuildError> {
    let children = reader.query_ids(TOP_LEVEL_UNITS, [])?;
    info!(children = children.len(), "Synthesized virtual root");

    Ok(UnitDocument {
        title: Some(ROOT_TITLE.to_string()),
        parent: None,
        ancestors: None,
        children: Some(children),
        hierarchy: Some(HierarchySection {
            unit_sort: Some("0".to_string()),
            ..Default::default()
        }),
        ..UnitDocument::new(UnitId::ROOT)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use usnvc_source::SourceConfig;
    use usnvc_source::fixture::{UnitFixture, memory_reader};

    #[test]
    fn test_root_children_are_top_level_units() {
        let reader = memory_reader(SourceConfig::default()).unwrap();
        for unit in [
            UnitFixture::new(2, "Class"),
            UnitFixture::new(1, "Class"),
            UnitFixture::new(5, "Subclass").with_parent(1),
        ] {
            unit.insert(reader.connection()).unwrap();
        }

        let root = synthesize_root(&reader).unwrap();
        assert_eq!(root.id, UnitId::ROOT);
        assert_eq!(root.children, Some(vec![UnitId::new(1), UnitId::new(2)]));

        let value = root.to_value().unwrap();
        assert_eq!(value["_id"], 0);
        assert!(value["parent"].is_null());
        assert!(value["ancestors"].is_null());
        assert_eq!(value["title"], ROOT_TITLE);
        assert_eq!(value["Hierarchy"]["unitsort"], "0");
    }
}
