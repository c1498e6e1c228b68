//! # CSV Errors
//!
//! Unified error type for every stage of a serialisation run in graphcsv.
//!
//! Covers I/O failures, caller contract violations, configuration problems,
//! schema/path inconsistencies, runaway nesting and encoding failures.
//! `From` conversions are provided for common sources so the capture
//! serializer, the builder and the façade can propagate errors directly.

use std::io;

use thiserror::Error;

/// Unified error type for all serialisation operations.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Underlying I/O failure (write error, flush error, file system error).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Caller passed a value the operation cannot accept (e.g. a null root).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not permitted in the current state (e.g. adding a column
    /// after rows exist, duplicating a row when there is none).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Settings missing or unusable for the requested operation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A discovered column path could not be walked on an instance.
    #[error("Unresolvable property path '{path}': {reason}")]
    UnresolvablePath { path: String, reason: String },

    /// Nesting exceeded the configured depth; the graph is most likely cyclic.
    #[error("Cyclic or too deeply nested structure: depth exceeded {max_depth}")]
    CyclicStructure { max_depth: usize },

    /// The value shape cannot be turned into rows and columns.
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Text could not be represented in the configured output encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Error raised by a `serde::Serialize` implementation while capturing.
    #[error("Serialisation error: {0}")]
    Serialize(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CsvError>;

impl CsvError {
    pub(crate) fn unresolvable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CsvError::UnresolvablePath { path: path.into(), reason: reason.into() }
    }
}

impl serde::ser::Error for CsvError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        CsvError::Serialize(msg.to_string())
    }
}
