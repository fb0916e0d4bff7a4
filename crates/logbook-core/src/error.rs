//! Error types for Logbook

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Logbook operations.
///
/// Only construction and configuration paths return these. The log calls
/// themselves never fail; write-time problems go to [`crate::diagnostics`].
#[derive(Error, Debug)]
pub enum LogbookError {
    /// Log directory could not be created
    #[error("Failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Log file could not be created or opened for appending
    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Write attempted after the writer released its handle
    #[error("Log file is closed: {0}")]
    WriterClosed(PathBuf),

    /// Neither a documents directory nor a working directory is available
    #[error("No directory available for session logs")]
    NoLogDirectory,

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Level name that does not match any LogLevel
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    /// `LoggerRegistry::install` called after the global registry exists
    #[error("Logger registry is already initialized")]
    RegistryAlreadyInitialized,

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using LogbookError
pub type LogbookResult<T> = Result<T, LogbookError>;
