//! Snapshot fixtures
//!
//! DDL for the tables the document builder reads, plus helpers for seeding
//! units and cross-reference rows. Used by tests across the workspace and
//! for building small demonstration snapshots.

use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::reader::SourceReader;

/// Schema of every table read by the builder, including both
/// version-gated ones
pub const SCHEMA: &str = "
CREATE TABLE Unit (
    element_global_id INTEGER PRIMARY KEY,
    PARENT_ID INTEGER,
    hierarchyLevel TEXT,
    classificationCode TEXT,
    databaseCode TEXT,
    scientificName TEXT,
    formattedScientificName TEXT,
    translatedName TEXT,
    colloquialName TEXT,
    unitSort TEXT,
    D_CLASSIFICATION_LEVEL_ID INTEGER,
    parentKey TEXT,
    parentName TEXT
);
CREATE TABLE UnitDescription (
    ELEMENT_GLOBAL_ID INTEGER PRIMARY KEY,
    classif_confidence_id INTEGER,
    typeConceptSentence TEXT,
    typeConcept TEXT,
    diagnosticCharacteristics TEXT,
    Rationale TEXT,
    classificationComments TEXT,
    otherComments TEXT,
    similarNVCtypesComments TEXT,
    Physiognomy TEXT,
    Floristics TEXT,
    Dynamics TEXT,
    Environment TEXT,
    spatialPattern TEXT,
    Range TEXT,
    Nations TEXT,
    Subnations TEXT,
    tncEcoregions INTEGER,
    omernikEcoregions INTEGER,
    federalLands INTEGER,
    plotCount INTEGER,
    plotSummary TEXT,
    plotTypal TEXT,
    plotArchived TEXT,
    plotConsistency TEXT,
    plotSize TEXT,
    plotMethods TEXT,
    confidenceComments TEXT,
    grank TEXT,
    grankReviewDate TEXT,
    grankAuthor TEXT,
    grankReasons TEXT,
    lineage TEXT,
    Synonymy TEXT,
    primaryConceptSource TEXT,
    descriptionAuthor TEXT,
    Acknowledgements TEXT,
    versionDate TEXT
);
CREATE TABLE d_classif_confidence (
    D_CLASSIF_CONFIDENCE_ID INTEGER PRIMARY KEY,
    CLASSIF_CONFIDENCE_DESC TEXT
);
CREATE TABLE UnitXSimilarUnit (
    ELEMENT_GLOBAL_ID INTEGER,
    similar_element_global_id INTEGER,
    similarUnitName TEXT,
    note TEXT
);
CREATE TABLE d_subnation (
    Subnation_id INTEGER PRIMARY KEY,
    Subnation_cd TEXT,
    Subnation_name TEXT,
    ISO_Nation_cd TEXT
);
CREATE TABLE d_curr_presence_absence (
    d_curr_presence_absence_id INTEGER PRIMARY KEY,
    curr_presence_absence_cd TEXT,
    curr_presence_absence_desc TEXT
);
CREATE TABLE d_dist_confidence (
    d_dist_confidence_id INTEGER PRIMARY KEY,
    dist_confidence_cd TEXT,
    dist_confidence_desc TEXT
);
CREATE TABLE UnitXSubnation (
    ELEMENT_GLOBAL_ID INTEGER,
    SUBNATION_ID INTEGER,
    d_curr_presence_absence_id INTEGER,
    d_dist_confidence_id INTEGER
);
CREATE TABLE d_occurrence_status (
    d_occurrence_status_id INTEGER PRIMARY KEY,
    occurrence_status_cd TEXT,
    occurrence_status_desc TEXT,
    display_value TEXT
);
CREATE TABLE d_usfs_ecoregion1994 (
    usfs_ecoregion_id INTEGER PRIMARY KEY,
    usfs_ecoregion_name TEXT,
    usfs_ecoregion_class_cd TEXT,
    usfs_ecoregion_concat_cd TEXT
);
CREATE TABLE UnitXEcoregionUsfs1994 (
    element_global_id INTEGER,
    usfs_ecoregion_id INTEGER,
    d_occurrence_status_id INTEGER
);
CREATE TABLE d_usfs_ecoregion2007 (
    usfs_ecoregion_2007_id INTEGER PRIMARY KEY,
    usfs_ecoregion_2007_name TEXT,
    usfs_ecoregion_2007_concat_cd TEXT
);
CREATE TABLE UnitXEcoregionUsfs2007 (
    element_global_id INTEGER,
    usfs_ecoregion_2007_id INTEGER,
    d_occurrence_status_id INTEGER
);
CREATE TABLE UnitPredecessor (
    element_global_id INTEGER,
    predecessor_id INTEGER,
    predecessor_name TEXT,
    predecessor_note TEXT
);
CREATE TABLE UnitObsoleteName (
    element_global_id INTEGER,
    obsolete_name TEXT,
    obsolete_note TEXT
);
CREATE TABLE UnitObsoleteParent (
    element_global_id INTEGER,
    obsolete_parent_name TEXT,
    obsolete_parent_note TEXT
);
CREATE TABLE Reference (
    reference_id INTEGER PRIMARY KEY,
    ShortCitation TEXT,
    FullCitation TEXT
);
CREATE TABLE UnitXReference (
    element_global_id INTEGER,
    reference_id INTEGER
);
CREATE TABLE UnitXStateCrosswalk (
    element_global_id INTEGER,
    subnation_id INTEGER,
    state_unit_code TEXT,
    state_unit_name TEXT,
    linkage TEXT
);
";

/// Create every table in [`SCHEMA`]
pub fn create_schema(conn: &Connection) -> Result<(), SourceError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Open an in-memory reader with the full schema created
pub fn memory_reader(config: SourceConfig) -> Result<SourceReader, SourceError> {
    let reader = SourceReader::open_in_memory(config)?;
    create_schema(reader.connection())?;
    Ok(reader)
}

/// Insert one row given as `(column, value)` pairs
pub fn insert_row(
    conn: &Connection,
    table: &str,
    columns: &[(&str, Value)],
) -> Result<(), SourceError> {
    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        names.join(", "),
        placeholders.join(", ")
    );
    conn.execute(&sql, params_from_iter(columns.iter().map(|(_, value)| value)))?;
    Ok(())
}

/// Text column value
pub fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

/// Integer column value
pub fn int(value: i64) -> Value {
    Value::Integer(value)
}

/// A unit row with its optional description row
#[derive(Debug, Clone, Default)]
pub struct UnitFixture {
    pub id: i64,
    pub parent: Option<i64>,
    pub level: String,
    pub classification_code: Option<String>,
    pub database_code: Option<String>,
    pub translated_name: Option<String>,
    pub colloquial_name: Option<String>,
    pub scientific_name: Option<String>,
    pub unit_sort: Option<String>,
    /// Extra `Unit` columns
    pub unit_columns: Vec<(&'static str, Value)>,
    /// `UnitDescription` columns; no description row is written when empty
    pub description: Vec<(&'static str, Value)>,
}

impl UnitFixture {
    /// Create a unit at a hierarchy level
    pub fn new(id: i64, level: impl Into<String>) -> Self {
        Self {
            id,
            level: level.into(),
            ..Default::default()
        }
    }

    /// Set the parent unit
    pub fn with_parent(mut self, parent: i64) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the classification and database codes
    pub fn with_codes(mut self, classification: &str, database: &str) -> Self {
        self.classification_code = Some(classification.to_string());
        self.database_code = Some(database.to_string());
        self
    }

    /// Set the translated and colloquial names
    pub fn with_names(mut self, translated: &str, colloquial: &str) -> Self {
        self.translated_name = Some(translated.to_string());
        self.colloquial_name = Some(colloquial.to_string());
        self
    }

    /// Set the scientific name
    pub fn with_scientific_name(mut self, name: &str) -> Self {
        self.scientific_name = Some(name.to_string());
        self
    }

    /// Set the display sort key
    pub fn with_sort(mut self, sort: &str) -> Self {
        self.unit_sort = Some(sort.to_string());
        self
    }

    /// Add an extra `Unit` column
    pub fn with_unit_column(mut self, column: &'static str, value: Value) -> Self {
        self.unit_columns.push((column, value));
        self
    }

    /// Add a `UnitDescription` column
    pub fn describe(mut self, column: &'static str, value: Value) -> Self {
        self.description.push((column, value));
        self
    }

    /// Write the unit (and description, if any) to the database
    pub fn insert(&self, conn: &Connection) -> Result<(), SourceError> {
        let optional = |value: &Option<String>| match value {
            Some(text) => Value::Text(text.clone()),
            None => Value::Null,
        };

        let mut unit: Vec<(&str, Value)> = vec![
            ("element_global_id", Value::Integer(self.id)),
            (
                "PARENT_ID",
                self.parent.map(Value::Integer).unwrap_or(Value::Null),
            ),
            ("hierarchyLevel", Value::Text(self.level.clone())),
            ("classificationCode", optional(&self.classification_code)),
            ("databaseCode", optional(&self.database_code)),
            ("translatedName", optional(&self.translated_name)),
            ("colloquialName", optional(&self.colloquial_name)),
            ("scientificName", optional(&self.scientific_name)),
            ("unitSort", optional(&self.unit_sort)),
        ];
        unit.extend(self.unit_columns.iter().map(|(k, v)| (*k, v.clone())));
        insert_row(conn, "Unit", &unit)?;

        if !self.description.is_empty() {
            let mut description: Vec<(&str, Value)> =
                vec![("ELEMENT_GLOBAL_ID", Value::Integer(self.id))];
            description.extend(self.description.iter().map(|(k, v)| (*k, v.clone())));
            insert_row(conn, "UnitDescription", &description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_round_trip_through_reader() {
        let reader = memory_reader(SourceConfig::default()).unwrap();
        UnitFixture::new(10, "Class")
            .with_codes("1", "C01")
            .with_names("Forest & Woodland", "Forest & Woodland")
            .describe("Floristics", text("Trees"))
            .describe("plotCount", int(3))
            .insert(reader.connection())
            .unwrap();

        let row = reader
            .query_one(
                "SELECT * FROM Unit LEFT OUTER JOIN UnitDescription \
                 ON Unit.element_global_id = UnitDescription.ELEMENT_GLOBAL_ID \
                 WHERE Unit.element_global_id = ?1",
                [10_i64],
                "unit 10",
            )
            .unwrap();
        assert_eq!(row.text("hierarchyLevel"), Some("Class"));
        assert_eq!(row.text("Floristics"), Some("Trees"));
        assert_eq!(row.integer("plotCount"), Some(3));
        assert_eq!(row.integer("PARENT_ID"), None);
    }

    #[test]
    fn test_unit_without_description_leaves_columns_null() {
        let reader = memory_reader(SourceConfig::default()).unwrap();
        UnitFixture::new(11, "Association")
            .with_parent(10)
            .insert(reader.connection())
            .unwrap();

        let row = reader
            .query_one(
                "SELECT * FROM Unit LEFT OUTER JOIN UnitDescription \
                 ON Unit.element_global_id = UnitDescription.ELEMENT_GLOBAL_ID \
                 WHERE Unit.element_global_id = ?1",
                [11_i64],
                "unit 11",
            )
            .unwrap();
        assert_eq!(row.integer("PARENT_ID"), Some(10));
        assert_eq!(row.text("Floristics"), None);
    }

    #[test]
    fn test_insert_row_rejects_unknown_column() {
        let reader = memory_reader(SourceConfig::default()).unwrap();
        let result = insert_row(reader.connection(), "Reference", &[("nope", int(1))]);
        assert!(result.is_err());
    }
}
