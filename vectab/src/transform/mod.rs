//! Transposition module.
//!
//! - Transpose: records to vectors, optionally sorted by a key field
//! - Untranspose: vectors back to records
//! - Pipeline: records file to table file

pub mod pipeline;
pub mod transpose;
pub mod untranspose;

pub use pipeline::*;
pub use transpose::*;
pub use untranspose::vectors_to_records;
