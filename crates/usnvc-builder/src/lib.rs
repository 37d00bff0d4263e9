//! # USNVC Builder
//!
//! Turns rows of the relational USNVC snapshot into denormalized unit
//! documents.
//!
//! ## Components
//!
//! - [`walk`]: Hierarchy Walker (self, children, and ancestor chain)
//! - [`UnitBuilder`] / [`build_unit`]: Unit Document Builder
//! - [`all_keys`]: Key Enumerator
//! - [`synthesize_root`]: Virtual root document (id 0)
//! - [`build_each`]: Sequential batch traversal that survives missing units
//!
//! ## Example
//!
//! ```rust,ignore
//! use usnvc_builder::{BuildConfig, UnitBuilder, all_keys};
//! use usnvc_core::TracingObserver;
//! use usnvc_source::{SourceConfig, SourceReader};
//!
//! let source = SourceConfig::with_db_path("NVC v2.03 2019-03.db");
//! let config = BuildConfig::from(&source);
//! let reader = SourceReader::open(source)?;
//!
//! let builder = UnitBuilder::new(&reader, &config).with_observer(&TracingObserver);
//! for id in all_keys(&reader)? {
//!     let doc = builder.build(id)?;
//!     println!("{}", doc.to_json_pretty()?);
//! }
//! ```

pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod keys;
pub mod root;

pub use batch::{BatchReport, build_each};
pub use builder::{BUILD_FUNCTION, UnitBuilder, build_unit};
pub use config::BuildConfig;
pub use error::BuildError;
pub use hierarchy::{HierarchyContext, walk};
pub use keys::all_keys;
pub use root::{ROOT_TITLE, synthesize_root};
