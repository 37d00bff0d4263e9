//! On-disk document cache
//!
//! Writes one pretty-printed `<id>.json` per unit. Units whose file already
//! exists are skipped, so an interrupted run can be resumed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::task::JoinSet;
use tracing::{info, warn};
use usnvc_builder::{BuildConfig, build_each};
use usnvc_core::{ChangeObserver, NoopObserver, TracingObserver, UnitDocument, UnitId};
use usnvc_source::{SourceConfig, SourceReader};

use crate::config::CacheConfig;

/// Counts from a cache run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSummary {
    /// Documents written in this run
    pub written: usize,
    /// Units whose file already existed
    pub skipped: usize,
    /// Units with no row in the snapshot
    pub missing: Vec<UnitId>,
    /// Documents built but not written
    pub failed: usize,
}

impl CacheSummary {
    fn merge(&mut self, other: CacheSummary) {
        self.written += other.written;
        self.skipped += other.skipped;
        self.missing.extend(other.missing);
        self.failed += other.failed;
    }
}

/// Path of the cached document for a unit
pub fn cache_path(directory: &Path, id: UnitId) -> PathBuf {
    directory.join(format!("{id}.json"))
}

/// Build and write every id not yet cached
///
/// Ids are dealt round-robin to `cache.workers` blocking workers. A missing
/// unit is counted and reported; any other build error aborts the run.
pub async fn run_cache(
    source: SourceConfig,
    build: BuildConfig,
    cache: CacheConfig,
    ids: Vec<UnitId>,
) -> anyhow::Result<CacheSummary> {
    fs::create_dir_all(&cache.directory).with_context(|| {
        format!("Failed to create cache directory {}", cache.directory.display())
    })?;

    let mut summary = CacheSummary::default();
    let workers = cache.workers.max(1);
    let mut queues: Vec<Vec<UnitId>> = vec![Vec::new(); workers];
    let mut next = 0;
    for id in ids {
        if cache_path(&cache.directory, id).exists() {
            summary.skipped += 1;
            continue;
        }
        queues[next % workers].push(id);
        next += 1;
    }
    info!(pending = next, skipped = summary.skipped, workers, "Starting cache run");

    let mut join_set: JoinSet<anyhow::Result<CacheSummary>> = JoinSet::new();
    for (worker, queue) in queues.into_iter().enumerate() {
        if queue.is_empty() {
            continue;
        }
        let source = source.clone();
        let build = build.clone();
        let directory = cache.directory.clone();
        let audit = cache.audit;
        join_set.spawn_blocking(move || cache_worker(worker, source, &build, &directory, audit, queue));
    }

    while let Some(joined) = join_set.join_next().await {
        summary.merge(joined.context("Cache worker panicked")??);
    }

    info!(
        written = summary.written,
        skipped = summary.skipped,
        missing = summary.missing.len(),
        failed = summary.failed,
        "Cache run complete"
    );
    Ok(summary)
}

fn cache_worker(
    worker: usize,
    source: SourceConfig,
    build: &BuildConfig,
    directory: &Path,
    audit: bool,
    ids: Vec<UnitId>,
) -> anyhow::Result<CacheSummary> {
    let reader = SourceReader::open(source)?;
    let observer: &dyn ChangeObserver = if audit { &TracingObserver } else { &NoopObserver };

    let mut written = 0;
    let mut failed = 0;
    let report = build_each(&reader, build, ids, observer, |doc| {
        match write_document(directory, &doc) {
            Ok(()) => written += 1,
            Err(err) => {
                warn!(worker, unit_id = %doc.id, error = %err, "Failed to write document");
                failed += 1;
            }
        }
    })?;

    Ok(CacheSummary {
        written,
        skipped: 0,
        missing: report.missing,
        failed,
    })
}

fn write_document(directory: &Path, doc: &UnitDocument) -> anyhow::Result<()> {
    let path = cache_path(directory, doc.id);
    fs::write(&path, doc.to_json_pretty()?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::TempDir;
    use usnvc_core::SchemaVersion;
    use usnvc_source::fixture::{UnitFixture, create_schema};

    fn snapshot(dir: &TempDir) -> SourceConfig {
        usnvc_logging::init_testing();
        let path = dir.path().join("snapshot.db");
        let conn = Connection::open(&path).unwrap();
        create_schema(&conn).unwrap();
        UnitFixture::new(1, "Class")
            .with_codes("1", "C01")
            .with_names("Forest & Woodland", "Forest & Woodland")
            .insert(&conn)
            .unwrap();
        for id in 2..=6 {
            UnitFixture::new(id, "Subclass")
                .with_parent(1)
                .insert(&conn)
                .unwrap();
        }
        SourceConfig::with_db_path(path).with_version(SchemaVersion::V2_03)
    }

    fn cache_config(dir: &TempDir) -> CacheConfig {
        CacheConfig {
            directory: dir.path().join("cache"),
            workers: 3,
            audit: false,
        }
    }

    #[test]
    fn test_cache_path() {
        let path = cache_path(Path::new("/tmp/cache"), UnitId::new(683_123));
        assert_eq!(path, PathBuf::from("/tmp/cache/683123.json"));
    }

    #[tokio::test]
    async fn test_cache_run_writes_documents_and_reports_missing() {
        let dir = TempDir::new().unwrap();
        let source = snapshot(&dir);
        let build = BuildConfig::from(&source);
        let cache = cache_config(&dir);
        let ids: Vec<UnitId> = [1, 2, 3, 4, 5, 6, 404].map(UnitId::new).to_vec();

        let summary = run_cache(source, build, cache.clone(), ids).await.unwrap();
        assert_eq!(summary.written, 6);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.missing, vec![UnitId::new(404)]);
        assert_eq!(summary.failed, 0);

        let text = fs::read_to_string(cache_path(&cache.directory, UnitId::new(1))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["title"], "1 Forest & Woodland Class");
        assert_eq!(value["children"].as_array().unwrap().len(), 5);
        assert!(!cache_path(&cache.directory, UnitId::new(404)).exists());
    }

    #[tokio::test]
    async fn test_second_run_skips_cached_units() {
        let dir = TempDir::new().unwrap();
        let source = snapshot(&dir);
        let build = BuildConfig::from(&source);
        let cache = cache_config(&dir);
        let ids: Vec<UnitId> = (1..=6).map(UnitId::new).collect();

        run_cache(source.clone(), build.clone(), cache.clone(), ids.clone())
            .await
            .unwrap();
        let summary = run_cache(source, build, cache, ids).await.unwrap();
        assert_eq!(summary.written, 0);
        assert_eq!(summary.skipped, 6);
    }

    #[tokio::test]
    async fn test_unopenable_snapshot_fails_run() {
        let dir = TempDir::new().unwrap();
        let source = SourceConfig::with_db_path(dir.path().join("missing.db"));
        let build = BuildConfig::from(&source);
        let result = run_cache(source, build, cache_config(&dir), vec![UnitId::new(1)]).await;
        assert!(result.is_err());
    }
}
