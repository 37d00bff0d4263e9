//! Hierarchy Walker
//!
//! Collects a unit's own summary, its immediate children, and its ancestor
//! chain up to a top-level unit. Every collected node carries a display
//! title composed the same way as the unit document's own title.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};
use usnvc_core::{HierarchyLevel, HierarchyNode, TitleParts, UnitId, display_title};
use usnvc_source::{Row, SourceReader};

use crate::error::BuildError;

const UNIT_BY_ID: &str = "SELECT element_global_id, PARENT_ID, hierarchyLevel, classificationCode, \
     databaseCode, translatedName, colloquialName, unitSort \
     FROM Unit WHERE element_global_id = ?1";

const UNITS_BY_PARENT: &str = "SELECT element_global_id, PARENT_ID, hierarchyLevel, classificationCode, \
     databaseCode, translatedName, colloquialName, unitSort \
     FROM Unit WHERE PARENT_ID = ?1 ORDER BY element_global_id";

/// Result of a hierarchy walk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyContext {
    /// Immediate children, in identifier order
    pub children: Vec<UnitId>,
    /// Flattened nodes: self, then children, then ancestors nearest first
    pub hierarchy: Vec<HierarchyNode>,
    /// Ancestor identifiers, nearest first
    pub ancestors: Vec<UnitId>,
}

impl HierarchyContext {
    /// Ancestors for the document's top level; top-level units point at the
    /// virtual root
    pub fn ancestors_or_root(&self) -> Vec<UnitId> {
        if self.ancestors.is_empty() {
            vec![UnitId::ROOT]
        } else {
            self.ancestors.clone()
        }
    }
}

/// Display title for a row carrying the naming columns
pub fn title_for_row(row: &Row) -> String {
    let level = row.text("hierarchyLevel").map(HierarchyLevel::from);
    let parts = TitleParts {
        classification_code: row.text("classificationCode"),
        database_code: row.text("databaseCode"),
        translated_name: row.text("translatedName"),
        colloquial_name: row.text("colloquialName"),
    };
    display_title(level.as_ref(), &parts)
}

fn node_from_row(row: &Row, id: UnitId) -> HierarchyNode {
    HierarchyNode {
        element_global_id: row.unit_id("element_global_id").unwrap_or(id),
        parent_id: row.unit_id("PARENT_ID"),
        level: row.text("hierarchyLevel").map(HierarchyLevel::from),
        classification_code: row.string("classificationCode"),
        database_code: row.string("databaseCode"),
        translated_name: row.string("translatedName"),
        colloquial_name: row.string("colloquialName"),
        unit_sort: row.string("unitSort"),
        display_title: title_for_row(row),
    }
}

/// Walk the hierarchy around a unit
///
/// A parent reference to a missing row ends the walk. A parent chain that
/// revisits a unit is cut at the repeat.
#[instrument(skip(reader))]
pub fn walk(reader: &SourceReader, id: UnitId) -> Result<HierarchyContext, BuildError> {
    let own = reader
        .query_optional(UNIT_BY_ID, [id.get()])?
        .ok_or(BuildError::UnitNotFound(id))?;
    let own = node_from_row(&own, id);

    let mut context = HierarchyContext::default();
    for row in reader.query_rows(UNITS_BY_PARENT, [id.get()])? {
        let Some(child_id) = row.unit_id("element_global_id") else {
            continue;
        };
        context.children.push(child_id);
        context.hierarchy.push(node_from_row(&row, child_id));
    }

    let mut visited = HashSet::from([id]);
    let mut next = own.parent_id;
    context.hierarchy.insert(0, own);

    while let Some(parent_id) = next {
        if !visited.insert(parent_id) {
            warn!(unit_id = %id, %parent_id, "Cycle in parent chain");
            break;
        }
        let Some(row) = reader.query_optional(UNIT_BY_ID, [parent_id.get()])? else {
            warn!(unit_id = %id, %parent_id, "Dangling parent reference");
            break;
        };
        let node = node_from_row(&row, parent_id);
        next = node.parent_id;
        context.ancestors.push(parent_id);
        context.hierarchy.push(node);
    }

    debug!(
        children = context.children.len(),
        ancestors = context.ancestors.len(),
        "Walked hierarchy"
    );
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use usnvc_source::SourceConfig;
    use usnvc_source::fixture::{UnitFixture, memory_reader};

    fn reader_with(units: &[UnitFixture]) -> SourceReader {
        let reader = memory_reader(SourceConfig::default()).unwrap();
        for unit in units {
            unit.insert(reader.connection()).unwrap();
        }
        reader
    }

    #[test]
    fn test_walk_collects_self_children_and_ancestors() {
        let reader = reader_with(&[
            UnitFixture::new(1, "Class")
                .with_codes("1", "C01")
                .with_names("Forest & Woodland", "Forest & Woodland"),
            UnitFixture::new(2, "Subclass")
                .with_parent(1)
                .with_codes("1.B", "S15")
                .with_names("Temperate & Boreal Forest & Woodland", "Temperate Forest"),
            UnitFixture::new(3, "Formation").with_parent(2).with_codes("1.B.2", "F008"),
            UnitFixture::new(4, "Division").with_parent(3),
            UnitFixture::new(5, "Division").with_parent(3),
        ]);

        let context = walk(&reader, UnitId::new(3)).unwrap();
        assert_eq!(context.children, vec![UnitId::new(4), UnitId::new(5)]);
        assert_eq!(context.ancestors, vec![UnitId::new(2), UnitId::new(1)]);

        let ids: Vec<i64> = context
            .hierarchy
            .iter()
            .map(|node| node.element_global_id.get())
            .collect();
        assert_eq!(ids, vec![3, 4, 5, 2, 1]);
        assert_eq!(context.hierarchy[4].display_title, "1 Forest & Woodland Class");
        assert_eq!(context.hierarchy[3].display_title, "1.B Temperate Forest Subclass");
    }

    #[test]
    fn test_top_level_unit_has_no_ancestors() {
        let reader = reader_with(&[UnitFixture::new(1, "Class")]);
        let context = walk(&reader, UnitId::new(1)).unwrap();
        assert!(context.ancestors.is_empty());
        assert_eq!(context.ancestors_or_root(), vec![UnitId::ROOT]);
    }

    #[test]
    fn test_missing_unit_is_not_found() {
        let reader = reader_with(&[]);
        let err = walk(&reader, UnitId::new(99)).unwrap_err();
        assert!(matches!(err, BuildError::UnitNotFound(id) if id == UnitId::new(99)));
    }

    #[test]
    fn test_dangling_parent_stops_walk() {
        let reader = reader_with(&[
            UnitFixture::new(10, "Group").with_parent(9),
            UnitFixture::new(9, "Macrogroup").with_parent(404),
        ]);
        let context = walk(&reader, UnitId::new(10)).unwrap();
        assert_eq!(context.ancestors, vec![UnitId::new(9)]);
        assert_eq!(context.hierarchy.len(), 2);
    }

    #[test]
    fn test_cyclic_parent_chain_terminates() {
        let reader = reader_with(&[
            UnitFixture::new(20, "Alliance").with_parent(21),
            UnitFixture::new(21, "Group").with_parent(22),
            UnitFixture::new(22, "Macrogroup").with_parent(20),
        ]);
        let context = walk(&reader, UnitId::new(20)).unwrap();
        assert_eq!(context.ancestors, vec![UnitId::new(21), UnitId::new(22)]);
    }

    #[test]
    fn test_self_parent_terminates() {
        let reader = reader_with(&[UnitFixture::new(30, "Association").with_parent(30)]);
        let context = walk(&reader, UnitId::new(30)).unwrap();
        // The unit is its own child as well as its own (cut) parent
        assert_eq!(context.children, vec![UnitId::new(30)]);
        assert!(context.ancestors.is_empty());
    }
}
