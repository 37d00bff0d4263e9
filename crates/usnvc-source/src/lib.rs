//! # USNVC Source
//!
//! Read-only access to the relational snapshot of the classification.
//!
//! The snapshot is a local SQLite file materialized upstream; this crate
//! opens it read-only and runs parameterized queries, returning rows as
//! ordered column-name-to-value mappings. No retry logic lives here: the
//! source is a local file, and any query failure propagates to the caller.
//!
//! ## Features
//!
//! - **SourceConfig**: Location and schema version of the snapshot
//! - **SourceReader**: Single-row, multi-row and join lookups
//! - **Row / FieldValue**: Typed column values with a uniform presence rule
//! - **fixture**: Schema DDL and row helpers for building test snapshots
//!
//! ## Example
//!
//! ```rust,ignore
//! use usnvc_source::{SourceConfig, SourceReader};
//!
//! let reader = SourceReader::open(SourceConfig::with_db_path("NVC v2.03 2019-03.db"))?;
//! let row = reader.query_one(
//!     "SELECT * FROM Unit WHERE element_global_id = ?1",
//!     [683123_i64],
//!     "unit 683123",
//! )?;
//! assert_eq!(row.text("hierarchyLevel"), Some("Association"));
//! ```

pub mod config;
pub mod error;
pub mod fixture;
pub mod reader;
pub mod row;

// Re-exports
pub use config::SourceConfig;
pub use error::SourceError;
pub use reader::SourceReader;
pub use row::{FieldValue, Row};
