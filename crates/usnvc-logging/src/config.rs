//! Logging configuration, loadable from the `[logging]` table of `usnvc.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where log lines go and at what level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub default_level: String,

    /// Format of the stderr stream
    pub console: ConsoleFormat,

    /// Rolling JSONL files, if any
    pub file: Option<FileConfig>,

    /// Fields carried by every JSON line (stderr and files alike)
    pub json: JsonFields,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            console: ConsoleFormat::Json,
            file: None,
            json: JsonFields::default(),
        }
    }
}

impl LogConfig {
    /// Warnings and errors only, readable text on stderr
    pub fn testing() -> Self {
        Self {
            default_level: "warn".to_string(),
            console: ConsoleFormat::Pretty { ansi: false },
            ..Self::default()
        }
    }

    /// Adjust for long cache runs: nothing on stderr, and daily JSONL files
    /// under `log_dir` unless file output is already configured
    pub fn for_cache_run(mut self, log_dir: &Path) -> Self {
        self.console = ConsoleFormat::Off;
        if self.file.is_none() {
            self.file = Some(FileConfig {
                directory: log_dir.to_path_buf(),
                ..FileConfig::default()
            });
        }
        self
    }
}

/// Format of the stderr stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    /// Nothing on stderr
    Off,
    /// One JSON object per line
    Json,
    /// Human-readable lines
    Pretty { ansi: bool },
}

/// Rolling JSONL file output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub directory: PathBuf,
    /// File name prefix; files are `<prefix>.<date>.log`
    pub prefix: String,
    pub rotation: RotationStrategy,
    /// Rotated files to retain
    pub max_files: Option<usize>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./logs"),
            prefix: "usnvc".to_string(),
            rotation: RotationStrategy::Daily,
            max_files: Some(7),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    #[default]
    Daily,
    Hourly,
    /// One file, truncated on start
    Never,
}

/// Fields attached to each JSON line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonFields {
    /// Event fields at the top level instead of under `fields`
    pub flatten: bool,
    /// The enclosing span chain (unit id, worker index)
    pub spans: bool,
    /// Source file and line
    pub location: bool,
}

impl Default for JsonFields {
    fn default() -> Self {
        Self {
            flatten: true,
            spans: true,
            location: false,
        }
    }
}
