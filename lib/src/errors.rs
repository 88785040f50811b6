// lib/src/errors.rs

use std::fmt;
use thiserror::Error;

use models::PatientId;

/// A single rejected line from a bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based line number in the source.
    pub line: usize,
    pub reason: String,
}

impl LineError {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        LineError { line, reason: reason.into() }
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error at {0}")]
    Parse(LineError),

    #[error("Cannot encode record {id}: {reason}")]
    Unencodable { id: PatientId, reason: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("TOML configuration error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl From<LineError> for StoreError {
    fn from(err: LineError) -> Self {
        StoreError::Parse(err)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
