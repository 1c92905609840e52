//! # Vectab - records to vectors, vectors to tables
//!
//! Vectab turns a set of uniform records (rows of field → value) into one
//! named vector per field (columns), and writes those vectors as a CSV table
//! with one row per field.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Records   │────▶│ Transposer  │────▶│   Vectors   │────▶│ TableWriter │
//! │ (JSON/CSV)  │     │ (sort, chk) │     │  (columns)  │     │  (CSV file) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use vectab::{transpose_all, write_table_to, Record, TransposeOptions};
//!
//! let records = vec![
//!     Record::new().with("name", "February").with("id", 2).with("length", 28),
//!     Record::new().with("name", "January").with("id", 1).with("length", 31),
//! ];
//! let vectors = transpose_all(&records, &TransposeOptions::sorted_by("id")).unwrap();
//!
//! let mut out = Vec::new();
//! write_table_to(&mut out, &vectors).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "name,January,February\nid,1,2\nlength,31,28\n"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Scalar, Record and Vector
//! - [`parser`] - Reading records and tables, with auto-detection
//! - [`transform`] - Transposition in both directions, and the pipeline
//! - [`writer`] - CSV table output
//! - [`logs`] - Progress log broadcasting

// Core modules
pub mod error;
pub mod models;

// Input
pub mod parser;

// Transposition
pub mod transform;

// Output
pub mod writer;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ParseError,
    TransposeError,
    WriteError,
    PipelineError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Scalar, Record, Vector};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    parse_file_auto,
    parse_bytes_auto,
    parse_json_records,
    parse_csv_records,
    read_table,
    read_table_from,
    InputFormat,
    ParseOptions,
    ParsedRecords,
};

// =============================================================================
// Re-exports - Transposition
// =============================================================================

pub use transform::{
    transpose,
    transpose_owned,
    transpose_all,
    vectors_to_records,
    SchemaCheck,
    TransposeOptions,
    Vectors,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    transpose_file,
    transpose_file_to,
    PipelineOptions,
    PipelineSummary,
};

// =============================================================================
// Re-exports - Writer
// =============================================================================

pub use writer::{write_table, write_table_to};
