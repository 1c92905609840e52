//! Domain models shared by the transposer, the parser and the table writer.
//!
//! - [`Scalar`] - A single cell value (null, bool, integer, float, text)
//! - [`Record`] - One row: ordered field name to value mapping
//! - [`Vector`] - One column: a field name with its values across all records

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Scalar
// =============================================================================

/// A dynamically typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }

    /// Natural ordering between two values.
    ///
    /// Integers and floats compare numerically with each other, text
    /// compares by bytes, `false < true` and `Null` only equals `Null`.
    /// Returns `None` for mixed kinds and whenever NaN is involved.
    pub fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Float(b)) => cmp_integer_float(*a, *b),
            (Self::Float(a), Self::Integer(b)) => cmp_integer_float(*b, *a).map(Ordering::reverse),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Infer a value from a raw CSV cell.
    ///
    /// Empty cells become `Null`; `true`/`false`, integers and floats are
    /// recognized; anything else stays text.
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Null;
        }
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Integer(i);
        }
        // f64::from_str also accepts "inf" and "NaN", keep those as text
        if raw.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(f) = raw.parse::<f64>() {
                return Self::Float(f);
            }
        }
        Self::Text(raw.to_string())
    }

    /// Convert a JSON value, rejecting arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Integer(i)),
                None => n.as_f64().map(Self::Float),
            },
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// 2^63, the first float above every `i64`.
const I64_END: f64 = 9_223_372_036_854_775_808.0;

/// Exact comparison of an integer with a float, without rounding `i` to f64.
fn cmp_integer_float(i: i64, x: f64) -> Option<Ordering> {
    if x.is_nan() {
        return None;
    }
    if x >= I64_END {
        return Some(Ordering::Less);
    }
    if x < -I64_END {
        return Some(Ordering::Greater);
    }
    // floor(x) lies in [-2^63, 2^63) here, so the cast is exact
    let floor = x.floor();
    match i.cmp(&(floor as i64)) {
        Ordering::Equal if x > floor => Some(Ordering::Less),
        ordering => Some(ordering),
    }
}

/// Textual rendering used for table cells.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            // Debug keeps the fractional part: 31.0 rather than 31
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// =============================================================================
// Record
// =============================================================================

/// A row: field names mapped to values, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
    /// Position of each field in `fields`
    index: HashMap<String, usize>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field. An existing field keeps its position and gets the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&position) => self.fields[position].1 = value,
            None => {
                self.index.insert(name.clone(), self.fields.len());
                self.fields.push((name, value));
            }
        }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.index.get(name).map(|&position| &self.fields[position].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field names in key order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Fields and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Records are equal when they hold the same fields in the same order.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Scalar>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Serializes as a JSON object with fields in key order.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Vector
// =============================================================================

/// A named column of values taken across a set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vector {
    /// Field name the values were taken from.
    pub name: String,
    /// One value per record, in record order.
    pub values: Vec<Scalar>,
}

impl Vector {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
