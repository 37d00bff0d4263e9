//! Console and JSONL file logging for the USNVC document builder
//!
//! # Features
//!
//! - JSON lines on stderr by default, or human-readable text, or nothing
//! - Rolling JSONL files (daily, hourly, or a single file) via tracing-appender
//! - `RUST_LOG` overrides the configured level
//!
//! # Quick Start
//!
//! ```ignore
//! use usnvc_logging::{LogConfig, UsnvcSubscriberBuilder};
//!
//! // JSONL to console
//! let _guard = UsnvcSubscriberBuilder::new().init()?;
//!
//! // Cache run: silent stderr, JSONL files under the cache
//! let _guard = UsnvcSubscriberBuilder::new()
//!     .with_config(LogConfig::default().for_cache_run(Path::new("cache/usnvc/logs")))
//!     .init()?;
//! ```

pub mod config;

pub use config::{ConsoleFormat, FileConfig, JsonFields, LogConfig, RotationStrategy};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to prepare log output {path}: {source}")]
    Output {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create rolling log file: {0}")]
    Appender(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Builder for configuring and initializing the logging subscriber
///
/// By default, console output uses JSONL format; `ConsoleFormat::Pretty`
/// switches stderr to human-readable lines.
pub struct UsnvcSubscriberBuilder {
    config: LogConfig,
}

impl UsnvcSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Set the stderr format
    pub fn with_console(mut self, console: ConsoleFormat) -> Self {
        self.config.console = console;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Install the subscriber globally
    ///
    /// Returns the file writer guard when file output is configured; keep it
    /// alive for the duration of the program so buffered lines are flushed.
    pub fn init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level));

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        match self.config.console {
            ConsoleFormat::Off => {}
            ConsoleFormat::Json => layers.push(json_layer(&self.config.json, std::io::stderr)),
            ConsoleFormat::Pretty { ansi } => layers.push(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .boxed(),
            ),
        }

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = file_writer(file_config)?;
            layers.push(json_layer(&self.config.json, writer));
            guard = Some(file_guard);
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(env_filter)
            .try_init()
            .map_err(|e| LoggingError::Init(e.to_string()))?;

        Ok(guard)
    }
}

impl Default for UsnvcSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn json_layer<W>(fields: &JsonFields, writer: W) -> BoxedLayer
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(fields.spans)
        .with_span_list(fields.spans)
        .flatten_event(fields.flatten)
        .with_file(fields.location)
        .with_line_number(fields.location)
        .with_writer(writer)
        .boxed()
}

/// Open the file writer; truncates for `Never` rotation, appends otherwise
fn file_writer(file_config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&file_config.directory).map_err(|source| LoggingError::Output {
        path: file_config.directory.clone(),
        source,
    })?;

    let rotation = match file_config.rotation {
        RotationStrategy::Never => {
            let path = file_config
                .directory
                .join(format!("{}.log", file_config.prefix));
            let file = File::create(&path).map_err(|source| LoggingError::Output {
                path: path.clone(),
                source,
            })?;
            return Ok(tracing_appender::non_blocking(file));
        }
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
    };

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&file_config.prefix)
        .filename_suffix("log");
    if let Some(max_files) = file_config.max_files {
        builder = builder.max_log_files(max_files);
    }
    let appender = builder
        .build(&file_config.directory)
        .map_err(|e| LoggingError::Appender(e.to_string()))?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize logging for testing (minimal output); repeated calls are ignored
pub fn init_testing() {
    let _ = UsnvcSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creation() {
        let builder = UsnvcSubscriberBuilder::new();
        assert_eq!(builder.config().default_level, "info");
        assert_eq!(builder.config().console, ConsoleFormat::Json);
    }

    #[test]
    fn test_builder_with_config() {
        let builder = UsnvcSubscriberBuilder::new().with_config(LogConfig::testing());
        assert_eq!(builder.config().default_level, "warn");
        assert_eq!(builder.config().console, ConsoleFormat::Pretty { ansi: false });
    }

    #[test]
    fn test_builder_overrides() {
        let builder = UsnvcSubscriberBuilder::new()
            .with_level("trace")
            .with_console(ConsoleFormat::Off)
            .with_file_output(FileConfig::default());
        assert_eq!(builder.config().default_level, "trace");
        assert_eq!(builder.config().console, ConsoleFormat::Off);
        assert!(builder.config().file.is_some());
    }

    #[test]
    fn test_never_rotation_creates_single_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = FileConfig {
            directory: dir.path().join("logs"),
            prefix: "cache".to_string(),
            rotation: RotationStrategy::Never,
            max_files: None,
        };
        let (_writer, _guard) = file_writer(&config).unwrap();
        assert!(dir.path().join("logs").join("cache.log").exists());
    }

    #[test]
    fn test_init_testing_is_repeatable() {
        init_testing();
        init_testing();
        tracing::warn!("logging initialized twice without panicking");
    }
}
