//! Reading records and vector tables from files.
//!
//! Records come from either a JSON array of objects or a row-oriented CSV
//! with a header row. CSV input goes through encoding and delimiter
//! auto-detection. Written vector tables can be read back with
//! [`read_table`]; their cells stay text.

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::error::{ParseError, ParseResult};
use crate::models::{Record, Scalar, Vector};

/// Delimiters tried by [`detect_delimiter`], in order of preference.
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Kind of record source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// `.json` files are JSON, everything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Options for reading records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// CSV delimiter (auto-detect if not specified)
    pub delimiter: Option<char>,

    /// Keep CSV cells as text instead of inferring numbers, bools and nulls
    pub raw: bool,
}

/// Records read from a file, with what was detected along the way.
#[derive(Debug, Clone)]
pub struct ParsedRecords {
    pub records: Vec<Record>,
    pub format: InputFormat,
    /// Detected encoding
    pub encoding: String,
    /// Delimiter used (CSV only)
    pub delimiter: Option<char>,
    /// Field names of the first record, or the CSV header row
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Unknown labels fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let encoding = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .unwrap_or(encoding_rs::UTF_8);
    encoding.decode(bytes).0.into_owned()
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Falls back to a comma when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;

    for &sep in &CANDIDATE_DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

fn delimiter_byte(delimiter: char) -> ParseResult<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(ParseError::InvalidDelimiter(delimiter))
}

/// Parse a JSON array of objects into records.
///
/// Key order of each object is kept. Values must be scalars.
///
/// # Example
/// ```
/// use vectab::parser::parse_json_records;
///
/// let records = parse_json_records(r#"[{"name": "January", "id": 1}]"#).unwrap();
/// assert_eq!(records[0].field_names().collect::<Vec<_>>(), vec!["name", "id"]);
/// ```
pub fn parse_json_records(content: &str) -> ParseResult<Vec<Record>> {
    let rows: Vec<Value> = serde_json::from_str(content)?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| -> ParseResult<Record> {
            let obj = row.as_object().ok_or(ParseError::NotAnObject { index })?;
            obj.iter()
                .map(|(field, value)| {
                    Scalar::from_json(value)
                        .map(|scalar| (field.clone(), scalar))
                        .ok_or_else(|| ParseError::NotScalar {
                            index,
                            field: field.clone(),
                        })
                })
                .collect()
        })
        .collect()
}

/// Parse a row-oriented CSV (header row first) into records.
///
/// Cells are trimmed. Missing trailing cells become `Null`, extra cells are
/// ignored and blank lines are skipped. Unless `raw` is set, cells are
/// inferred with [`Scalar::infer`].
pub fn parse_csv_records<R: Read>(reader: R, delimiter: char, raw: bool) -> ParseResult<Vec<Record>> {
    parse_csv_with_headers(reader, delimiter, raw).map(|(_, records)| records)
}

fn parse_csv_with_headers<R: Read>(
    reader: R,
    delimiter: char,
    raw: bool,
) -> ParseResult<(Vec<String>, Vec<Record>)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() {
        return Err(ParseError::EmptyFile);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = match row.get(i) {
                    Some(cell) if raw => Scalar::from(cell),
                    Some(cell) => Scalar::infer(cell),
                    None => Scalar::Null,
                };
                (header.clone(), value)
            })
            .collect();
        records.push(record);
    }

    Ok((headers, records))
}

/// Parse a records file, detecting format, encoding and (for CSV) delimiter.
pub fn parse_file_auto<P: AsRef<Path>>(path: P, options: &ParseOptions) -> ParseResult<ParsedRecords> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    parse_bytes_auto(&bytes, InputFormat::from_path(path), options)
}

/// Parse record bytes of a known format, detecting encoding and delimiter.
pub fn parse_bytes_auto(
    bytes: &[u8],
    format: InputFormat,
    options: &ParseOptions,
) -> ParseResult<ParsedRecords> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);

    match format {
        InputFormat::Json => {
            let records = parse_json_records(&content)?;
            let headers: Vec<String> = records
                .first()
                .map(|r| r.field_names().map(String::from).collect())
                .unwrap_or_default();
            Ok(ParsedRecords {
                records,
                format,
                encoding,
                delimiter: None,
                headers,
            })
        }
        InputFormat::Csv => {
            let delimiter = options
                .delimiter
                .unwrap_or_else(|| detect_delimiter(&content));
            let (headers, records) =
                parse_csv_with_headers(content.as_bytes(), delimiter, options.raw)?;
            Ok(ParsedRecords {
                records,
                format,
                encoding,
                delimiter: Some(delimiter),
                headers,
            })
        }
    }
}

/// Read a vector table back: first cell of each row is the name, the rest
/// are values. Values are kept as text.
pub fn read_table_from<R: Read>(reader: R) -> ParseResult<Vec<Vector>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut vectors = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut cells = row.iter();
        if let Some(name) = cells.next() {
            vectors.push(Vector::new(name, cells.map(Scalar::from).collect()));
        }
    }
    Ok(vectors)
}

/// Read a vector table file.
pub fn read_table<P: AsRef<Path>>(path: P) -> ParseResult<Vec<Vector>> {
    let file = std::fs::File::open(path)?;
    read_table_from(file)
}
