//! Records to vectors.
//!
//! Turns a set of uniform records (rows) into one [`Vector`] per field
//! (columns), optionally ordering the records by a key field first.
//!
//! ```text
//! Records (rows)                         Vectors (columns)
//! ┌───────────────────────────────┐      ┌──────────────────────────────┐
//! │ name: February, id: 2, len: 28│      │ name: January, February      │
//! │ name: January,  id: 1, len: 31│  →   │ id:   1, 2                   │
//! └───────────────────────────────┘      │ len:  31, 28                 │
//!         (key_field = "id")             └──────────────────────────────┘
//! ```
//!
//! Vector names and order come from the first record. The input is a slice
//! (or is buffered once by [`transpose_owned`]) so that inspecting the first
//! record never consumes the source.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::{TransposeError, TransposeResult};
use crate::models::{Record, Scalar, Vector};

/// When records are checked against the first record's field set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaCheck {
    /// Check every record before any vector is produced.
    #[default]
    Strict,
    /// Only fail when a vector needs a field a record does not have.
    Lazy,
}

/// Options for [`transpose`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransposeOptions {
    /// Sort records ascending by this field before transposing.
    pub key_field: Option<String>,

    /// Schema validation mode.
    pub schema_check: SchemaCheck,
}

impl TransposeOptions {
    /// Options sorting by `key_field`.
    pub fn sorted_by(key_field: impl Into<String>) -> Self {
        Self {
            key_field: Some(key_field.into()),
            ..Self::default()
        }
    }

    pub fn with_schema_check(mut self, schema_check: SchemaCheck) -> Self {
        self.schema_check = schema_check;
        self
    }
}

/// Lazy sequence of vectors, one per field of the first record.
///
/// Each item is built on demand from the (sorted or original) record order.
/// Items are `Err` only in [`SchemaCheck::Lazy`] mode, when a record lacks
/// the field being extracted.
#[derive(Debug)]
pub struct Vectors<'a> {
    fields: std::vec::IntoIter<String>,
    /// Records in output order, tagged with their input position.
    rows: Vec<(usize, Cow<'a, Record>)>,
}

impl Vectors<'_> {
    /// Number of records each vector spans.
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    fn extract(&self, field: String) -> TransposeResult<Vector> {
        let values = self
            .rows
            .iter()
            .map(|(index, record)| {
                record
                    .get(&field)
                    .cloned()
                    .ok_or_else(|| TransposeError::MissingField {
                        record: *index,
                        field: field.clone(),
                    })
            })
            .collect::<TransposeResult<Vec<Scalar>>>()?;

        Ok(Vector::new(field, values))
    }
}

impl Iterator for Vectors<'_> {
    type Item = TransposeResult<Vector>;

    fn next(&mut self) -> Option<Self::Item> {
        let field = self.fields.next()?;
        Some(self.extract(field))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.fields.size_hint()
    }
}

impl ExactSizeIterator for Vectors<'_> {}

/// Transpose borrowed records into vectors.
///
/// # Errors
/// - [`TransposeError::EmptyInput`] if `records` is empty
/// - [`TransposeError::SchemaMismatch`] in strict mode when a record's fields
///   differ from the first record's
/// - [`TransposeError::MissingField`] if a record lacks the key field
/// - [`TransposeError::IncomparableKey`] if key values cannot be ordered
///
/// # Example
/// ```
/// use vectab::{transpose, Record, Scalar, TransposeOptions};
///
/// let records = vec![
///     Record::new().with("name", "February").with("id", 2),
///     Record::new().with("name", "January").with("id", 1),
/// ];
/// let vectors: Vec<_> = transpose(&records, &TransposeOptions::sorted_by("id"))
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(vectors[0].name, "name");
/// assert_eq!(vectors[1].values, vec![Scalar::Integer(1), Scalar::Integer(2)]);
/// ```
pub fn transpose<'a>(
    records: &'a [Record],
    options: &TransposeOptions,
) -> TransposeResult<Vectors<'a>> {
    build(
        records.iter().map(Cow::Borrowed).enumerate().collect(),
        options,
    )
}

/// Transpose records from a one-shot source.
///
/// The source is drained into a buffer once before anything is inspected.
pub fn transpose_owned<I>(records: I, options: &TransposeOptions) -> TransposeResult<Vectors<'static>>
where
    I: IntoIterator<Item = Record>,
{
    build(
        records.into_iter().map(Cow::Owned).enumerate().collect(),
        options,
    )
}

/// Transpose and collect every vector.
pub fn transpose_all(records: &[Record], options: &TransposeOptions) -> TransposeResult<Vec<Vector>> {
    transpose(records, options)?.collect()
}

fn build<'a>(
    mut rows: Vec<(usize, Cow<'a, Record>)>,
    options: &TransposeOptions,
) -> TransposeResult<Vectors<'a>> {
    let first = match rows.first() {
        Some((_, record)) => record,
        None => return Err(TransposeError::EmptyInput),
    };
    let fields: Vec<String> = first.field_names().map(String::from).collect();

    if options.schema_check == SchemaCheck::Strict {
        check_schema(&fields, &rows)?;
    }

    if let Some(ref key) = options.key_field {
        check_key(key, &rows)?;
        // sort_by is stable: equal keys keep input order
        rows.sort_by(|(_, a), (_, b)| compare_by(key, a, b));
    }

    Ok(Vectors {
        fields: fields.into_iter(),
        rows,
    })
}

fn check_schema(fields: &[String], rows: &[(usize, Cow<'_, Record>)]) -> TransposeResult<()> {
    let expected: HashSet<&str> = fields.iter().map(String::as_str).collect();

    for (index, record) in rows.iter().skip(1) {
        let missing: Vec<String> = fields
            .iter()
            .filter(|f| !record.contains(f))
            .cloned()
            .collect();
        let unexpected: Vec<String> = record
            .field_names()
            .filter(|n| !expected.contains(n))
            .map(String::from)
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(TransposeError::SchemaMismatch {
                record: *index,
                missing,
                unexpected,
            });
        }
    }
    Ok(())
}

/// Every record must carry the key, and every key must be comparable with
/// the first one. Comparability is per kind (numbers, text, bools, nulls)
/// so checking against the first key covers every pair.
fn check_key(key: &str, rows: &[(usize, Cow<'_, Record>)]) -> TransposeResult<()> {
    let mut reference: Option<&Scalar> = None;

    for (index, record) in rows {
        let value = record.get(key).ok_or_else(|| TransposeError::MissingField {
            record: *index,
            field: key.to_string(),
        })?;
        let left = *reference.get_or_insert(value);

        if left.natural_cmp(value).is_none() {
            return Err(TransposeError::IncomparableKey {
                field: key.to_string(),
                record: *index,
                left: left.kind(),
                right: value.kind(),
            });
        }
    }
    Ok(())
}

fn compare_by(key: &str, a: &Record, b: &Record) -> Ordering {
    match (a.get(key), b.get(key)) {
        (Some(x), Some(y)) => x.natural_cmp(y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}
