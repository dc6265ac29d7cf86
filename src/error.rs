//! Error types for the Pilum library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`PilumError`] enum. The variants follow the engine's error taxonomy:
//!
//! - `SchemaViolation` - a field value disagrees with its declaration; caller error
//! - `Io` / `Storage` - the store collaborator failed; retryable by the caller
//! - `UnknownField` - a query named a field the snapshot does not know
//! - `PageOutOfRange` - paging beyond the total hit count; the cursor keeps its state
//!
//! # Examples
//!
//! ```
//! use pilum::error::{PilumError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PilumError::schema_violation("field 'price' expects a numeric value"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Pilum operations.
#[derive(Error, Debug)]
pub enum PilumError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage-related errors reported by a storage backend
    #[error("Storage error: {0}")]
    Storage(String),

    /// A field value does not match the schema declaration
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Schema construction or loading errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// No analysis pipeline could be resolved for a text field
    #[error("Unknown field kind: {0}")]
    UnknownFieldKind(String),

    /// A query referenced a field absent from the schema or snapshot
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Paging cursor navigation beyond the total hit count
    #[error("Page out of range: page {page} of {total_pages}")]
    PageOutOfRange {
        /// The requested 1-based page number.
        page: usize,
        /// The number of pages available.
        total_pages: usize,
    },

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Index-related errors
    #[error("Index error: {0}")]
    Index(String),

    /// Query-related errors
    #[error("Query error: {0}")]
    Query(String),

    /// Invalid operation for the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with PilumError.
pub type Result<T> = std::result::Result<T, PilumError>;

impl PilumError {
    /// Create a new schema violation error.
    pub fn schema_violation<S: Into<String>>(msg: S) -> Self {
        PilumError::SchemaViolation(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        PilumError::Schema(msg.into())
    }

    /// Create a new unknown field kind error.
    pub fn unknown_field_kind<S: Into<String>>(field: S) -> Self {
        PilumError::UnknownFieldKind(field.into())
    }

    /// Create a new unknown field error.
    pub fn unknown_field<S: Into<String>>(field: S) -> Self {
        PilumError::UnknownField(field.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        PilumError::Analysis(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        PilumError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        PilumError::Query(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        PilumError::Storage(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        PilumError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PilumError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PilumError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error came from the store collaborator.
    ///
    /// I/O failures leave writer state untouched, so the failed operation
    /// can be retried.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, PilumError::Io(_) | PilumError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = PilumError::schema_violation("bad value");
        assert_eq!(error.to_string(), "Schema violation: bad value");

        let error = PilumError::unknown_field("color");
        assert_eq!(error.to_string(), "Unknown field: color");

        let error = PilumError::PageOutOfRange {
            page: 4,
            total_pages: 3,
        };
        assert_eq!(error.to_string(), "Page out of range: page 4 of 3");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let pilum_error = PilumError::from(io_error);

        match pilum_error {
            PilumError::Io(_) => {}
            _ => panic!("Expected IO error"),
        }
    }

    #[test]
    fn test_io_failure_classification() {
        assert!(PilumError::storage("disk full").is_io_failure());
        assert!(PilumError::from(io::Error::other("broken pipe")).is_io_failure());
        assert!(!PilumError::schema_violation("x").is_io_failure());
        assert!(!PilumError::unknown_field("x").is_io_failure());
    }
}
