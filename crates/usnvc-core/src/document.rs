//! The denormalized unit document
//!
//! Field names are the literal, human-readable labels consumed downstream
//! and must not change. Every optional field is skipped when absent, so the
//! serialized shape varies from unit to unit; a key is never emitted as
//! `null` except for `parent` and `ancestors` on the virtual root.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::identity::UnitId;
use crate::level::HierarchyLevel;
use crate::place::PlaceCode;

/// A source row carried verbatim into a "Raw Data" field
pub type RawRecord = Map<String, Value>;

/// One document per classification unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitDocument {
    #[serde(rename = "_id")]
    pub id: UnitId,
    #[serde(rename = "Date Processed", skip_serializing_if = "Option::is_none")]
    pub date_processed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub parent: Option<UnitId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<UnitId>>,
    pub ancestors: Option<Vec<UnitId>>,
    #[serde(rename = "Identifiers", skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<Identifiers>,
    #[serde(rename = "Overview", skip_serializing_if = "Option::is_none")]
    pub overview: Option<Overview>,
    #[serde(rename = "Vegetation", skip_serializing_if = "Option::is_none")]
    pub vegetation: Option<Vegetation>,
    #[serde(rename = "Environment", skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(rename = "Distribution", skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,
    #[serde(
        rename = "Plot Sampling and Analysis",
        skip_serializing_if = "Option::is_none"
    )]
    pub plot_sampling: Option<PlotSampling>,
    #[serde(rename = "Confidence Level", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceLevel>,
    #[serde(rename = "Conservation Status", skip_serializing_if = "Option::is_none")]
    pub conservation: Option<ConservationStatus>,
    #[serde(rename = "Hierarchy", skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<HierarchySection>,
    #[serde(rename = "Concept History", skip_serializing_if = "Option::is_none")]
    pub concept_history: Option<ConceptHistory>,
    #[serde(rename = "Synonymy", skip_serializing_if = "Option::is_none")]
    pub synonymy: Option<Synonymy>,
    #[serde(rename = "State Crosswalk", skip_serializing_if = "Option::is_none")]
    pub state_crosswalk: Option<StateCrosswalk>,
    #[serde(rename = "Authorship", skip_serializing_if = "Option::is_none")]
    pub authorship: Option<Authorship>,
    #[serde(rename = "References", skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identifiers {
    pub element_global_id: UnitId,
    #[serde(rename = "Database Code", skip_serializing_if = "Option::is_none")]
    pub database_code: Option<String>,
    #[serde(rename = "Classification Code", skip_serializing_if = "Option::is_none")]
    pub classification_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(rename = "Scientific Name", skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(
        rename = "Formatted Scientific Name",
        skip_serializing_if = "Option::is_none"
    )]
    pub formatted_scientific_name: Option<String>,
    #[serde(rename = "Translated Name", skip_serializing_if = "Option::is_none")]
    pub translated_name: Option<String>,
    #[serde(rename = "Colloquial Name", skip_serializing_if = "Option::is_none")]
    pub colloquial_name: Option<String>,
    #[serde(rename = "Type Concept Sentence", skip_serializing_if = "Option::is_none")]
    pub type_concept_sentence: Option<String>,
    #[serde(rename = "Type Concept", skip_serializing_if = "Option::is_none")]
    pub type_concept: Option<String>,
    #[serde(
        rename = "Diagnostic Characteristics",
        skip_serializing_if = "Option::is_none"
    )]
    pub diagnostic_characteristics: Option<String>,
    // Label misspelling is part of the published document format.
    #[serde(
        rename = "Rationale for Nonimal Species or Physiognomic Features",
        skip_serializing_if = "Option::is_none"
    )]
    pub rationale: Option<String>,
    #[serde(rename = "Classification Comments", skip_serializing_if = "Option::is_none")]
    pub classification_comments: Option<String>,
    #[serde(rename = "Other Comments", skip_serializing_if = "Option::is_none")]
    pub other_comments: Option<String>,
    #[serde(
        rename = "Similar NVC Type Comments",
        skip_serializing_if = "Option::is_none"
    )]
    pub similar_types_comments: Option<String>,
    #[serde(rename = "Similar NVC Types", skip_serializing_if = "Option::is_none")]
    pub similar_types: Option<Vec<RawRecord>>,
    #[serde(rename = "Display Title", skip_serializing_if = "Option::is_none")]
    pub display_title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vegetation {
    #[serde(
        rename = "Physiognomy and Structure",
        skip_serializing_if = "Option::is_none"
    )]
    pub physiognomy: Option<String>,
    #[serde(rename = "Floristics", skip_serializing_if = "Option::is_none")]
    pub floristics: Option<String>,
    #[serde(rename = "Dynamics", skip_serializing_if = "Option::is_none")]
    pub dynamics: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(
        rename = "Environmental Description",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "Spatial Pattern", skip_serializing_if = "Option::is_none")]
    pub spatial_pattern: Option<String>,
}

/// Raw nations string plus its enriched entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nations {
    #[serde(rename = "Raw List")]
    pub raw_list: String,
    #[serde(rename = "Nation Info")]
    pub nation_info: Vec<PlaceCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subnations {
    #[serde(rename = "Raw List")]
    pub raw_list: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(rename = "Geographic Range", skip_serializing_if = "Option::is_none")]
    pub geographic_range: Option<String>,
    #[serde(rename = "Nations", skip_serializing_if = "Option::is_none")]
    pub nations: Option<Nations>,
    #[serde(rename = "Subnations", skip_serializing_if = "Option::is_none")]
    pub subnations: Option<Subnations>,
    #[serde(
        rename = "States/Provinces Raw Data",
        skip_serializing_if = "Option::is_none"
    )]
    pub subnation_records: Option<Vec<RawRecord>>,
    #[serde(
        rename = "1994 USFS Ecoregion Raw Data",
        skip_serializing_if = "Option::is_none"
    )]
    pub usfs_ecoregions_1994: Option<Vec<RawRecord>>,
    #[serde(
        rename = "2007 USFS Ecoregion Raw Data",
        skip_serializing_if = "Option::is_none"
    )]
    pub usfs_ecoregions_2007: Option<Vec<RawRecord>>,
    #[serde(rename = "TNC Ecoregions", skip_serializing_if = "Option::is_none")]
    pub tnc_ecoregions: Option<i64>,
    #[serde(rename = "Omernik Ecoregions", skip_serializing_if = "Option::is_none")]
    pub omernik_ecoregions: Option<i64>,
    #[serde(rename = "Federal Lands", skip_serializing_if = "Option::is_none")]
    pub federal_lands: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotSampling {
    #[serde(rename = "Plot Count", skip_serializing_if = "Option::is_none")]
    pub plot_count: Option<i64>,
    #[serde(rename = "Plot Summary", skip_serializing_if = "Option::is_none")]
    pub plot_summary: Option<String>,
    #[serde(rename = "Plot Type", skip_serializing_if = "Option::is_none")]
    pub plot_type: Option<String>,
    #[serde(rename = "Plot Archive", skip_serializing_if = "Option::is_none")]
    pub plot_archive: Option<String>,
    #[serde(rename = "Plot Consistency", skip_serializing_if = "Option::is_none")]
    pub plot_consistency: Option<String>,
    #[serde(rename = "Plot Size", skip_serializing_if = "Option::is_none")]
    pub plot_size: Option<String>,
    #[serde(rename = "Plot Methods", skip_serializing_if = "Option::is_none")]
    pub plot_methods: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceLevel {
    #[serde(rename = "Confidence Level", skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(
        rename = "Confidence Level Comments",
        skip_serializing_if = "Option::is_none"
    )]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConservationStatus {
    #[serde(rename = "Global Rank", skip_serializing_if = "Option::is_none")]
    pub global_rank: Option<String>,
    #[serde(
        rename = "Global Rank Review Date",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_date: Option<String>,
    #[serde(rename = "Global Rank Author", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "Global Rank Reasons", skip_serializing_if = "Option::is_none")]
    pub reasons: Option<String>,
}

/// One node of the flattened hierarchy cached on each document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub element_global_id: UnitId,
    #[serde(rename = "PARENT_ID")]
    pub parent_id: Option<UnitId>,
    #[serde(rename = "hierarchyLevel", skip_serializing_if = "Option::is_none")]
    pub level: Option<HierarchyLevel>,
    #[serde(rename = "classificationCode", skip_serializing_if = "Option::is_none")]
    pub classification_code: Option<String>,
    #[serde(rename = "databaseCode", skip_serializing_if = "Option::is_none")]
    pub database_code: Option<String>,
    #[serde(rename = "translatedName", skip_serializing_if = "Option::is_none")]
    pub translated_name: Option<String>,
    #[serde(rename = "colloquialName", skip_serializing_if = "Option::is_none")]
    pub colloquial_name: Option<String>,
    #[serde(rename = "unitSort", skip_serializing_if = "Option::is_none")]
    pub unit_sort: Option<String>,
    #[serde(rename = "Display Title")]
    pub display_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchySection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(rename = "hierarchyLevel", skip_serializing_if = "Option::is_none")]
    pub level: Option<HierarchyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d_classification_level_id: Option<i64>,
    #[serde(rename = "unitsort", skip_serializing_if = "Option::is_none")]
    pub unit_sort: Option<String>,
    #[serde(rename = "parentkey", skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(rename = "parentname", skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(rename = "Cached Hierarchy", skip_serializing_if = "Option::is_none")]
    pub cached_hierarchy: Option<Vec<HierarchyNode>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptHistory {
    #[serde(rename = "Concept Lineage", skip_serializing_if = "Option::is_none")]
    pub lineage: Option<String>,
    #[serde(rename = "Predecessors Raw Data", skip_serializing_if = "Option::is_none")]
    pub predecessors: Option<Vec<RawRecord>>,
    #[serde(
        rename = "Obsolete Units Raw Data",
        skip_serializing_if = "Option::is_none"
    )]
    pub obsolete_units: Option<Vec<RawRecord>>,
    #[serde(
        rename = "Obsolete Parents Raw Data",
        skip_serializing_if = "Option::is_none"
    )]
    pub obsolete_parents: Option<Vec<RawRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Synonymy {
    #[serde(rename = "Synonymy", skip_serializing_if = "Option::is_none")]
    pub synonymy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateCrosswalk {
    #[serde(
        rename = "State Crosswalk Raw Data",
        skip_serializing_if = "Option::is_none"
    )]
    pub records: Option<Vec<RawRecord>>,
    /// Subnation codes of US states whose classification links directly
    #[serde(
        rename = "States Directly Using NVC",
        skip_serializing_if = "Option::is_none"
    )]
    pub direct_states: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Authorship {
    #[serde(rename = "Concept Author", skip_serializing_if = "Option::is_none")]
    pub concept_author: Option<String>,
    #[serde(rename = "Description Author", skip_serializing_if = "Option::is_none")]
    pub description_author: Option<String>,
    #[serde(rename = "Acknowledgements", skip_serializing_if = "Option::is_none")]
    pub acknowledgements: Option<String>,
    #[serde(rename = "Version Date", skip_serializing_if = "Option::is_none")]
    pub version_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "Short Citation", skip_serializing_if = "Option::is_none")]
    pub short_citation: Option<String>,
    #[serde(rename = "Full Citation", skip_serializing_if = "Option::is_none")]
    pub full_citation: Option<String>,
}

impl UnitDocument {
    /// Create a document carrying only its identifier
    pub fn new(id: UnitId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Render the document as a JSON value
    pub fn to_value(&self) -> Result<Value, DocumentError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Render the document as indented JSON text
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Populated keys, as `Section` and `Section/Field` paths
    ///
    /// Top-level keys holding `null` are not counted as populated.
    pub fn populated_paths(&self) -> Result<BTreeSet<String>, DocumentError> {
        let mut paths = BTreeSet::new();
        if let Value::Object(top) = self.to_value()? {
            for (key, value) in top {
                if value.is_null() {
                    continue;
                }
                if let Value::Object(section) = &value {
                    for field in section.keys() {
                        paths.insert(format!("{key}/{field}"));
                    }
                }
                paths.insert(key);
            }
        }
        Ok(paths)
    }
}
