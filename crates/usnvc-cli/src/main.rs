//! `usnvc` - build denormalized USNVC unit documents from a relational snapshot

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use usnvc_builder::{BuildConfig, all_keys, build_unit, synthesize_root};
use usnvc_cli::{CliConfig, run_cache};
use usnvc_core::{ChangeObserver, NoopObserver, SchemaVersion, TracingObserver, UnitId};
use usnvc_logging::UsnvcSubscriberBuilder;
use usnvc_source::SourceReader;

#[derive(Parser)]
#[command(
    name = "usnvc",
    about = "Build denormalized USNVC unit documents from a relational snapshot",
    version
)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite snapshot
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Source schema version (2.02 or 2.03)
    #[arg(long, global = true)]
    schema_version: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every unit identifier
    Keys,

    /// Print the document for one unit
    Build {
        /// Unit identifier (element_global_id); 0 prints the virtual root
        id: i64,

        /// Log every build stage transition
        #[arg(long)]
        audit: bool,
    },

    /// Print the virtual root document
    Root,

    /// Build every unit into the on-disk document cache
    Cache {
        /// Cache directory
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Number of workers
        #[arg(short, long)]
        workers: Option<usize>,

        /// Log every build stage transition
        #[arg(long)]
        audit: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if let Some(db) = cli.db {
        config.source.db_path = db;
    }
    if let Some(version) = &cli.schema_version {
        config.source.version = version.parse::<SchemaVersion>()?;
    }
    if cli.verbose {
        config.logging.default_level = "debug".to_string();
    }
    if let Commands::Cache { dir, workers, audit } = &cli.command {
        if let Some(dir) = dir {
            config.cache.directory = dir.clone();
        }
        if let Some(workers) = workers {
            config.cache.workers = *workers;
        }
        config.cache.audit |= *audit;
        config.logging = config.cache_logging();
    }

    let _guard = UsnvcSubscriberBuilder::new()
        .with_config(config.logging.clone())
        .init()?;

    let build = BuildConfig::from(&config.source);

    match cli.command {
        Commands::Keys => {
            let reader = SourceReader::open(config.source)?;
            for id in all_keys(&reader)? {
                println!("{id}");
            }
        }
        Commands::Build { id, audit } => {
            let reader = SourceReader::open(config.source)?;
            let observer: &dyn ChangeObserver = if audit { &TracingObserver } else { &NoopObserver };
            let id = UnitId::new(id);
            let doc = if id.is_root() {
                synthesize_root(&reader)?
            } else {
                build_unit(&reader, &build, id, observer)?
            };
            println!("{}", doc.to_json_pretty()?);
        }
        Commands::Root => {
            let reader = SourceReader::open(config.source)?;
            println!("{}", synthesize_root(&reader)?.to_json_pretty()?);
        }
        Commands::Cache { .. } => {
            let ids = {
                let reader = SourceReader::open(config.source.clone())?;
                all_keys(&reader)?
            };
            let summary = run_cache(config.source, build, config.cache, ids).await?;
            info!(
                written = summary.written,
                skipped = summary.skipped,
                failed = summary.failed,
                "Cache updated"
            );
            println!(
                "written {} skipped {} missing {} failed {}",
                summary.written,
                summary.skipped,
                summary.missing.len(),
                summary.failed
            );
            for id in &summary.missing {
                eprintln!("Unit not found: {id}");
            }
        }
    }

    Ok(())
}
