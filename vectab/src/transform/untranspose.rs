//! Vectors back to records.

use std::borrow::Borrow;

use crate::error::{TransposeError, TransposeResult};
use crate::models::{Record, Vector};

/// Rebuild records from vectors of equal length.
///
/// Record `n` holds the `n`-th value of every vector, with fields in vector
/// order. No vectors means no records.
pub fn vectors_to_records<V: Borrow<Vector>>(vectors: &[V]) -> TransposeResult<Vec<Record>> {
    let vectors: Vec<&Vector> = vectors.iter().map(Borrow::<Vector>::borrow).collect();
    let expected = match vectors.first() {
        Some(v) => v.len(),
        None => return Ok(Vec::new()),
    };

    if let Some(ragged) = vectors.iter().find(|v| v.len() != expected) {
        return Err(TransposeError::RaggedVectors {
            name: ragged.name.clone(),
            expected,
            found: ragged.len(),
        });
    }

    let records: Vec<Record> = (0..expected)
        .map(|i| {
            vectors
                .iter()
                .map(|v| (v.name.clone(), v.values[i].clone()))
                .collect()
        })
        .collect();

    Ok(records)
}
