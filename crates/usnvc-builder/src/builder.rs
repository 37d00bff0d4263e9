//! Unit Document Builder
//!
//! Assembles one [`UnitDocument`] from the unit's joined description row,
//! its cross-reference tables, and its hierarchy context. The schema
//! version's profile decides which optional distribution and crosswalk
//! tables are read.

use tracing::{debug, instrument};
use usnvc_core::{
    Authorship, BuildStage, ChangeEvent, ChangeObserver, ConceptHistory, ConfidenceLevel,
    ConservationStatus, Distribution, Environment, HierarchyLevel, HierarchySection,
    Identifiers, Nations, NoopObserver, Overview, PlotSampling, RawRecord, Reference,
    StateCrosswalk, Subnations, Synonymy, UnitDocument, UnitId, Vegetation, clean_string,
    parse_nations,
};
use usnvc_source::{Row, SourceReader};

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::hierarchy::{self, title_for_row};

/// Function name reported with every audit event
pub const BUILD_FUNCTION: &str = "build_unit";

/// Linkage value marking a state that uses the classification directly
const DIRECT_LINKAGE: &str = "1 direct";

const UNIT_WITH_DESCRIPTION: &str = "SELECT * FROM Unit \
     LEFT OUTER JOIN UnitDescription \
     ON Unit.element_global_id = UnitDescription.ELEMENT_GLOBAL_ID \
     LEFT OUTER JOIN d_classif_confidence \
     ON UnitDescription.classif_confidence_id = d_classif_confidence.D_CLASSIF_CONFIDENCE_ID \
     WHERE Unit.element_global_id = ?1";

const SIMILAR_UNITS: &str = "SELECT * FROM UnitXSimilarUnit WHERE ELEMENT_GLOBAL_ID = ?1";

const SUBNATION_DISTRIBUTION: &str = "SELECT curr_presence_absence_desc, curr_presence_absence_cd, \
     dist_confidence_cd, dist_confidence_desc, ISO_Nation_cd, Subnation_cd, Subnation_name \
     FROM UnitXSubnation \
     JOIN d_curr_presence_absence \
     ON UnitXSubnation.d_curr_presence_absence_id = d_curr_presence_absence.d_curr_presence_absence_id \
     JOIN d_dist_confidence \
     ON UnitXSubnation.d_dist_confidence_id = d_dist_confidence.d_dist_confidence_id \
     JOIN d_subnation \
     ON UnitXSubnation.SUBNATION_ID = d_subnation.Subnation_id \
     WHERE UnitXSubnation.ELEMENT_GLOBAL_ID = ?1";

const USFS_ECOREGIONS_1994: &str = "SELECT usfs_ecoregion_name, usfs_ecoregion_class_cd, \
     usfs_ecoregion_concat_cd, occurrence_status_cd, occurrence_status_desc, display_value \
     FROM UnitXEcoregionUsfs1994 \
     JOIN d_usfs_ecoregion1994 \
     ON UnitXEcoregionUsfs1994.usfs_ecoregion_id = d_usfs_ecoregion1994.usfs_ecoregion_id \
     JOIN d_occurrence_status \
     ON UnitXEcoregionUsfs1994.d_occurrence_status_id = d_occurrence_status.d_occurrence_status_id \
     WHERE UnitXEcoregionUsfs1994.element_global_id = ?1";

const USFS_ECOREGIONS_2007: &str = "SELECT * FROM UnitXEcoregionUsfs2007 \
     JOIN d_usfs_ecoregion2007 \
     ON UnitXEcoregionUsfs2007.usfs_ecoregion_2007_id = d_usfs_ecoregion2007.usfs_ecoregion_2007_id \
     JOIN d_occurrence_status \
     ON UnitXEcoregionUsfs2007.d_occurrence_status_id = d_occurrence_status.d_occurrence_status_id \
     WHERE UnitXEcoregionUsfs2007.element_global_id = ?1";

const STATE_CROSSWALK: &str = "SELECT UnitXStateCrosswalk.*, d_subnation.Subnation_cd, \
     d_subnation.Subnation_name, d_subnation.ISO_Nation_cd \
     FROM UnitXStateCrosswalk \
     JOIN d_subnation \
     ON UnitXStateCrosswalk.subnation_id = d_subnation.Subnation_id \
     WHERE UnitXStateCrosswalk.element_global_id = ?1";

const REFERENCES: &str = "SELECT ShortCitation, FullCitation \
     FROM UnitXReference \
     JOIN Reference \
     ON UnitXReference.reference_id = Reference.reference_id \
     WHERE UnitXReference.element_global_id = ?1";

/// History tables, each read with `SELECT *` by unit id
static NOOP: NoopObserver = NoopObserver;

/// Builds unit documents from a source reader
///
/// The builder borrows its reader, configuration, and observer; it holds no
/// state between builds.
pub struct UnitBuilder<'a> {
    reader: &'a SourceReader,
    config: &'a BuildConfig,
    observer: &'a dyn ChangeObserver,
}

impl<'a> UnitBuilder<'a> {
    /// Create a builder with the no-op observer
    pub fn new(reader: &'a SourceReader, config: &'a BuildConfig) -> Self {
        Self {
            reader,
            config,
            observer: &NOOP,
        }
    }

    /// Report stage transitions to an observer
    pub fn with_observer(mut self, observer: &'a dyn ChangeObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        self.config
    }

    /// Build the document for one unit
    #[instrument(skip(self), fields(version = %self.config.version))]
    pub fn build(&self, id: UnitId) -> Result<UnitDocument, BuildError> {
        let row = self
            .reader
            .query_optional(UNIT_WITH_DESCRIPTION, [id.get()])?
            .ok_or(BuildError::UnitNotFound(id))?;

        let empty = UnitDocument::default();
        let skeleton = self.skeleton(id, &row);
        self.emit(BuildStage::Create, &empty, &skeleton);

        let mut doc = skeleton.clone();
        self.populate_overview(id, &row, &mut doc)?;
        self.emit(BuildStage::Overview, &skeleton, &doc);

        let overview = doc.clone();
        self.populate_sections(id, &row, &mut doc)?;
        self.emit(BuildStage::Complete, &overview, &doc);

        debug!(unit_id = %id, "Built unit document");
        Ok(doc)
    }

    fn emit(&self, stage: BuildStage, previous: &UnitDocument, current: &UnitDocument) {
        self.observer.observe(&ChangeEvent {
            unit_id: current.id,
            stage,
            function_name: BUILD_FUNCTION,
            previous,
            current,
        });
    }

    /// Identifiers, naming basics, and empty section placeholders
    fn skeleton(&self, id: UnitId, row: &Row) -> UnitDocument {
        UnitDocument {
            date_processed: Some(self.config.processed_timestamp()),
            identifiers: Some(Identifiers {
                element_global_id: id,
                database_code: row.string("databaseCode"),
                classification_code: row.string("classificationCode"),
            }),
            overview: Some(Overview {
                scientific_name: row.string("scientificName"),
                formatted_scientific_name: cleaned(row, "formattedScientificName"),
                translated_name: row.string("translatedName"),
                ..Default::default()
            }),
            vegetation: Some(Vegetation::default()),
            environment: Some(Environment::default()),
            distribution: Some(Distribution::default()),
            plot_sampling: Some(PlotSampling::default()),
            confidence: Some(ConfidenceLevel::default()),
            conservation: Some(ConservationStatus::default()),
            hierarchy: Some(HierarchySection::default()),
            concept_history: Some(ConceptHistory::default()),
            synonymy: Some(Synonymy::default()),
            authorship: Some(Authorship::default()),
            references: Some(Vec::new()),
            ..UnitDocument::new(id)
        }
    }

    fn populate_overview(
        &self,
        id: UnitId,
        row: &Row,
        doc: &mut UnitDocument,
    ) -> Result<(), BuildError> {
        let similar_types = records(self.reader.query_rows_if_tables(
            &["UnitXSimilarUnit"],
            SIMILAR_UNITS,
            [id.get()],
        )?);
        let title = title_for_row(row);

        let overview = doc.overview.get_or_insert_with(Overview::default);
        overview.colloquial_name = row.string("colloquialName");
        overview.type_concept_sentence = cleaned(row, "typeConceptSentence");
        overview.type_concept = cleaned(row, "typeConcept");
        overview.diagnostic_characteristics = cleaned(row, "diagnosticCharacteristics");
        overview.rationale = cleaned(row, "Rationale");
        overview.classification_comments = cleaned(row, "classificationComments");
        overview.other_comments = cleaned(row, "otherComments");
        overview.similar_types_comments = cleaned(row, "similarNVCtypesComments");
        overview.similar_types = similar_types;
        overview.display_title = Some(title.clone());

        doc.title = Some(title);
        Ok(())
    }

    fn populate_sections(
        &self,
        id: UnitId,
        row: &Row,
        doc: &mut UnitDocument,
    ) -> Result<(), BuildError> {
        doc.vegetation = Some(Vegetation {
            physiognomy: cleaned(row, "Physiognomy"),
            floristics: cleaned(row, "Floristics"),
            dynamics: cleaned(row, "Dynamics"),
        });
        doc.environment = Some(Environment {
            description: cleaned(row, "Environment"),
            spatial_pattern: cleaned(row, "spatialPattern"),
        });
        doc.distribution = Some(self.distribution(id, row)?);
        doc.plot_sampling = Some(PlotSampling {
            plot_count: row.integer("plotCount"),
            plot_summary: row.string("plotSummary"),
            plot_type: row.string("plotTypal"),
            plot_archive: row.string("plotArchived"),
            plot_consistency: row.string("plotConsistency"),
            plot_size: row.string("plotSize"),
            plot_methods: row.string("plotMethods"),
        });
        doc.confidence = Some(ConfidenceLevel {
            level: row.string("CLASSIF_CONFIDENCE_DESC"),
            comments: cleaned(row, "confidenceComments"),
        });
        doc.conservation = Some(ConservationStatus {
            global_rank: row.string("grank"),
            review_date: row.string("grankReviewDate"),
            author: row.string("grankAuthor"),
            reasons: row.string("grankReasons"),
        });

        let context = hierarchy::walk(self.reader, id)?;
        doc.hierarchy = Some(HierarchySection {
            parent_id: row.display("PARENT_ID"),
            level: row.text("hierarchyLevel").map(HierarchyLevel::from),
            d_classification_level_id: row.integer("D_CLASSIFICATION_LEVEL_ID"),
            unit_sort: row.string("unitSort"),
            parent_key: row.string("parentKey"),
            parent_name: row.string("parentName"),
            cached_hierarchy: Some(context.hierarchy.clone()),
        });
        doc.parent = Some(row.unit_id("PARENT_ID").unwrap_or(UnitId::ROOT));
        doc.ancestors = Some(context.ancestors_or_root());
        if !context.children.is_empty() {
            doc.children = Some(context.children);
        }

        doc.concept_history = Some(self.concept_history(id, row)?);
        doc.synonymy = Some(Synonymy {
            synonymy: row.string("Synonymy"),
        });
        if self.config.version.profile().state_crosswalk {
            doc.state_crosswalk = Some(self.state_crosswalk(id)?);
        }
        doc.authorship = Some(Authorship {
            concept_author: row.string("primaryConceptSource"),
            description_author: row.string("descriptionAuthor"),
            acknowledgements: row.string("Acknowledgements"),
            version_date: row.string("versionDate"),
        });
        doc.references = Some(self.references(id)?);
        Ok(())
    }

    fn distribution(&self, id: UnitId, row: &Row) -> Result<Distribution, BuildError> {
        let profile = self.config.version.profile();
        let reader = self.reader;

        let subnation_records = records(reader.query_rows_if_tables(
            &[
                "UnitXSubnation",
                "d_curr_presence_absence",
                "d_dist_confidence",
                "d_subnation",
            ],
            SUBNATION_DISTRIBUTION,
            [id.get()],
        )?);

        let usfs_ecoregions_1994 = if profile.usfs_ecoregions_1994 {
            records(reader.query_rows_if_tables(
                &[
                    "UnitXEcoregionUsfs1994",
                    "d_usfs_ecoregion1994",
                    "d_occurrence_status",
                ],
                USFS_ECOREGIONS_1994,
                [id.get()],
            )?)
        } else {
            None
        };

        let usfs_ecoregions_2007 = if profile.usfs_ecoregions_2007 {
            records(reader.query_rows_if_tables(
                &[
                    "UnitXEcoregionUsfs2007",
                    "d_usfs_ecoregion2007",
                    "d_occurrence_status",
                ],
                USFS_ECOREGIONS_2007,
                [id.get()],
            )?)
        } else {
            None
        };

        Ok(Distribution {
            geographic_range: row.string("Range"),
            nations: row.text("Nations").map(|raw| Nations {
                raw_list: raw.to_string(),
                nation_info: parse_nations(raw),
            }),
            subnations: row.text("Subnations").map(|raw| Subnations {
                raw_list: raw.to_string(),
            }),
            subnation_records,
            usfs_ecoregions_1994,
            usfs_ecoregions_2007,
            tnc_ecoregions: row.integer("tncEcoregions"),
            omernik_ecoregions: row.integer("omernikEcoregions"),
            federal_lands: row.integer("federalLands"),
        })
    }

    fn concept_history(&self, id: UnitId, row: &Row) -> Result<ConceptHistory, BuildError> {
        let mut history = ConceptHistory {
            lineage: row.string("lineage"),
            ..Default::default()
        };
        let ConceptHistory {
            predecessors,
            obsolete_units,
            obsolete_parents,
            ..
        } = &mut history;
        for (table, slot) in [
            ("UnitPredecessor", predecessors),
            ("UnitObsoleteName", obsolete_units),
            ("UnitObsoleteParent", obsolete_parents),
        ] {
            let sql = format!("SELECT * FROM {table} WHERE element_global_id = ?1");
            *slot = records(self.reader.query_rows_if_tables(&[table], &sql, [id.get()])?);
        }
        Ok(history)
    }

    fn state_crosswalk(&self, id: UnitId) -> Result<StateCrosswalk, BuildError> {
        let rows = self.reader.query_rows_if_tables(
            &["UnitXStateCrosswalk", "d_subnation"],
            STATE_CROSSWALK,
            [id.get()],
        )?;

        let mut direct_states: Vec<String> = Vec::new();
        for row in &rows {
            if row.text("linkage") != Some(DIRECT_LINKAGE) || row.text("ISO_Nation_cd") != Some("US")
            {
                continue;
            }
            if let Some(code) = row.string("Subnation_cd") {
                if !direct_states.contains(&code) {
                    direct_states.push(code);
                }
            }
        }

        Ok(StateCrosswalk {
            records: records(rows),
            direct_states: Some(direct_states),
        })
    }

    fn references(&self, id: UnitId) -> Result<Vec<Reference>, BuildError> {
        let rows = self.reader.query_rows_if_tables(
            &["UnitXReference", "Reference"],
            REFERENCES,
            [id.get()],
        )?;
        Ok(rows
            .iter()
            .map(|row| Reference {
                short_citation: row.string("ShortCitation"),
                full_citation: row.string("FullCitation"),
            })
            .collect())
    }
}

/// Build one unit document, reporting stage transitions to `observer`
pub fn build_unit(
    reader: &SourceReader,
    config: &BuildConfig,
    id: UnitId,
    observer: &dyn ChangeObserver,
) -> Result<UnitDocument, BuildError> {
    UnitBuilder::new(reader, config)
        .with_observer(observer)
        .build(id)
}

/// Present text of a column with HTML entities cleaned
fn cleaned(row: &Row, column: &str) -> Option<String> {
    row.text(column).map(clean_string)
}

/// Raw-data records of a join, or `None` when it matched nothing
fn records(rows: Vec<Row>) -> Option<Vec<RawRecord>> {
    if rows.is_empty() {
        None
    } else {
        Some(rows.iter().map(Row::to_record).collect())
    }
}
