//! Error taxonomy for the ingestion pipeline.
//!
//! Fatal classes ([`ConfigError`], connection failures inside [`StoreError`],
//! [`DecodeError`], [`ShapeError`]) abort a run before any insert. The
//! remaining classes are isolated to one record by the batch loader.

use std::time::Duration;

/// Pre-flight configuration problems. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Password for connection to the store needs to be set")]
    MissingPassword,

    #[error("Store name must not be empty")]
    MissingStoreName,

    #[error("Expected at most one input, got {0}")]
    TooManyInputs(usize),

    #[error("{flag} must be a single ASCII character, got '{value}'")]
    NotAsciiChar { flag: &'static str, value: char },

    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },
}

/// Failures reported by a document store or its connection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid store name '{0}'")]
    InvalidName(String),

    #[error("Store '{0}' not found")]
    NotFound(String),

    #[error("Document has no identifier")]
    MissingId,

    #[error("Document '{0}' already exists")]
    AlreadyExists(String),

    #[error("Insert of '{id}' rejected: {reason}")]
    Rejected { id: String, reason: String },

    #[error("Insert of '{id}' timed out after {timeout:?}")]
    Timeout { id: String, timeout: Duration },

    #[error("Query failed: {0}")]
    Query(String),
}

/// A record source could not produce the next record.
///
/// Delimited mode stops reading on this error but keeps everything already
/// inserted.
#[derive(Debug, thiserror::Error)]
pub enum SourceReadError {
    #[error("I/O error while reading input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed input at line {line}: {message}")]
    Malformed { line: u64, message: String },
}

/// The JSON input is not valid JSON.
#[derive(Debug, thiserror::Error)]
#[error("Failed to decode JSON input: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);

/// The JSON input decoded, but not into an object or an array of objects.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("Array element {index} is {found}, expected an object")]
    NotAnObject { index: usize, found: &'static str },

    #[error("Top-level JSON value is {found}, expected an object or an array of objects")]
    Unsupported { found: &'static str },
}

/// One record could not be turned into document fields.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Row has {columns} columns but the header only has {header}")]
    TooManyColumns { columns: usize, header: usize },

    #[error("Row is empty, no identifier column")]
    EmptyRow,

    #[error("Mapper cannot handle a {0} record")]
    UnexpectedRecord(&'static str),
}
