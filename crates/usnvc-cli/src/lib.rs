//! USNVC command line driver
//!
//! Thin collaborator around the builder: loads configuration, enumerates
//! keys, prints single documents, and fills an on-disk document cache with
//! a pool of workers that each hold their own read-only connection.

pub mod cache;
pub mod config;

pub use cache::{CacheSummary, cache_path, run_cache};
pub use config::{CacheConfig, CliConfig};
