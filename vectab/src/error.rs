//! Error types for the vectab transposition pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ParseError`] - Reading records or tables from files
//! - [`TransposeError`] - Row/column transposition errors
//! - [`WriteError`] - Table output errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Parsing Errors
// =============================================================================

/// Errors while reading records or vector tables.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON input.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Delimiter is not a single-byte character.
    #[error("Invalid delimiter {0:?}: must be a single-byte character")]
    InvalidDelimiter(char),

    /// Nothing to read.
    #[error("Input is empty")]
    EmptyFile,

    /// A JSON record was not an object.
    #[error("Record {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// A JSON field held an array or object.
    #[error("Record {index}, field '{field}': value is not a scalar")]
    NotScalar { index: usize, field: String },
}

// =============================================================================
// Transposition Errors
// =============================================================================

/// Errors during transposition in either direction.
#[derive(Debug, Error)]
pub enum TransposeError {
    /// No records to inspect.
    #[error("No records to transpose")]
    EmptyInput,

    /// A record lacks a field that was looked up.
    #[error("Record {record} is missing field '{field}'")]
    MissingField { record: usize, field: String },

    /// A record's field set differs from the first record's.
    #[error("Record {record} does not match the first record's fields (missing: {missing:?}, unexpected: {unexpected:?})")]
    SchemaMismatch {
        record: usize,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Sort key values cannot be ordered against each other.
    #[error("Cannot order field '{field}' at record {record}: {left} is not comparable with {right}")]
    IncomparableKey {
        field: String,
        record: usize,
        left: &'static str,
        right: &'static str,
    },

    /// Vectors of different lengths cannot be turned back into records.
    #[error("Vector '{name}' has {found} values, expected {expected}")]
    RaggedVectors {
        name: String,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// Writing Errors
// =============================================================================

/// Errors while writing a vector table.
#[derive(Debug, Error)]
pub enum WriteError {
    /// IO error.
    #[error("Failed to write table: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoder error.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::transpose_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Transposition error.
    #[error("Transpose error: {0}")]
    Transpose(#[from] TransposeError),

    /// Writing error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for transposition operations.
pub type TransposeResult<T> = Result<T, TransposeError>;

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
