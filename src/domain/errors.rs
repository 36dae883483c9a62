//! Domain error types
//!
//! This module defines the error hierarchy for Quarry. Errors are
//! domain-specific and don't expose third-party types in their variants.

use thiserror::Error;

/// Main Quarry error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum QuarryError {
    /// Missing or malformed configuration; fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Container file or container folder missing or of the wrong kind
    #[error("Input not found: {0}")]
    InputNotFound(String),

    /// SQL failure while exporting one table
    #[error("Query execution error: {0}")]
    QueryExecution(String),

    /// Filesystem failure while writing one table's output file
    #[error("Output write error: {0}")]
    OutputWrite(String),

    /// Connection pool errors (construction or checkout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Shutdown signal observed before the work completed
    #[error("Export cancelled: {0}")]
    Cancelled(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Classification of a failed job, recorded on its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobErrorKind {
    /// The pool could not hand out a connection
    Connection,
    /// The query failed (bad identifier, permission, connectivity)
    QueryExecution,
    /// The output file could not be created or written
    OutputWrite,
    /// The job observed the shutdown signal
    Cancelled,
    /// Anything else
    Other,
}

impl QuarryError {
    /// Maps an error onto the job-level classification
    pub fn kind(&self) -> JobErrorKind {
        match self {
            QuarryError::Connection(_) => JobErrorKind::Connection,
            QuarryError::QueryExecution(_) => JobErrorKind::QueryExecution,
            QuarryError::OutputWrite(_) | QuarryError::Io(_) => JobErrorKind::OutputWrite,
            QuarryError::Cancelled(_) => JobErrorKind::Cancelled,
            _ => JobErrorKind::Other,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for QuarryError {
    fn from(err: std::io::Error) -> Self {
        QuarryError::Io(err.to_string())
    }
}

// Conversion from csv writer errors
impl From<csv::Error> for QuarryError {
    fn from(err: csv::Error) -> Self {
        QuarryError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for QuarryError {
    fn from(err: toml::de::Error) -> Self {
        QuarryError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<tokio_postgres::Error> for QuarryError {
    fn from(err: tokio_postgres::Error) -> Self {
        QuarryError::QueryExecution(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for QuarryError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        QuarryError::Connection(err.to_string())
    }
}
