//! # USNVC Core
//!
//! Core types, errors, and value transforms shared by the source reader and
//! the unit document builder.
//!
//! ## Key Types
//!
//! - [`UnitId`]: Stable identifier of a classification unit (`element_global_id`)
//! - [`HierarchyLevel`]: Taxonomic rank, which also selects the display-title style
//! - [`SchemaVersion`]: Closed set of supported source snapshots and their profiles
//! - [`UnitDocument`]: The denormalized per-unit output document
//! - [`ChangeObserver`]: Injected audit hook observing document stage transitions
//!
//! ## Value Transforms
//!
//! - [`clean_string`]: HTML entity cleanup for free-text fields
//! - [`resolve_place_code`] / [`parse_nations`]: ISO country code enrichment

pub mod audit;
pub mod clean;
pub mod document;
pub mod error;
pub mod identity;
pub mod level;
pub mod place;
pub mod version;

// Re-export main types
pub use audit::*;
pub use clean::*;
pub use document::*;
pub use error::*;
pub use identity::*;
pub use level::*;
pub use place::*;
pub use version::*;
