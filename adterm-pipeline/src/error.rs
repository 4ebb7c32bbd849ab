//! Error types for loading reports, reading configuration and exporting.
//!
//! Every failure mode has a named variant. No stringly-typed errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdTermError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("CSV write error: {0}")]
    CsvWrite(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Invalid {column} value '{value}' at line {line}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Invalid timestamp '{value}' at line {line}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("Unknown event kind '{value}' at line {line}")]
    UnknownEventKind { line: u64, value: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for loader, config and export operations.
pub type Result<T> = std::result::Result<T, AdTermError>;
