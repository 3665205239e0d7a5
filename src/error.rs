/// Error types shared across the crate.
///
/// Row-level problems in an input file are `MalformedRecordError`s: they are
/// collected and logged by the loader but never abort a run. Everything that
/// does abort (unreadable files, missing CSV columns, bad configuration)
/// surfaces as a `HotspotError`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HotspotError>;

#[derive(Error, Debug)]
pub enum HotspotError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),

    #[error("input is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HotspotError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HotspotError::Io { path: path.into(), source }
    }
}

pub fn config_error(msg: impl ToString) -> HotspotError {
    HotspotError::InvalidConfig(msg.to_string())
}

/// A single input row that could not be turned into a `Detection`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecordError {
    /// Input file, set when the row was read from disk.
    pub file: Option<PathBuf>,
    /// 1-based line number in the source file (the header is line 1).
    pub line: u64,
    pub reason: String,
}

impl MalformedRecordError {
    pub fn new(line: u64, reason: impl Into<String>) -> Self {
        MalformedRecordError { file: None, line, reason: reason.into() }
    }

    /// `file:line`, or `line N` for in-memory input.
    pub fn location(&self) -> String {
        match &self.file {
            Some(path) => format!("{}:{}", path.display(), self.line),
            None => format!("line {}", self.line),
        }
    }
}

impl fmt::Display for MalformedRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed record at {}: {}", self.location(), self.reason)
    }
}

impl std::error::Error for MalformedRecordError {}
