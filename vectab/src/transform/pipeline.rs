//! High-level pipeline API: records file → vectors → table.
//!
//! Combines parsing, transposition and table output, logging progress
//! through [`crate::logs`].
//!
//! # Example
//!
//! ```rust,no_run
//! use vectab::{transpose_file, PipelineOptions, TransposeOptions};
//! use std::path::Path;
//!
//! let options = PipelineOptions {
//!     transpose: TransposeOptions::sorted_by("id"),
//!     ..PipelineOptions::default()
//! };
//! let summary = transpose_file(Path::new("months.json"), Path::new("months.csv"), &options)?;
//! println!("{} fields across {} records", summary.fields.len(), summary.record_count);
//! # Ok::<(), vectab::PipelineError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use super::transpose::{transpose, SchemaCheck, TransposeOptions};
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::Vector;
use crate::parser::{parse_file_auto, InputFormat, ParseOptions};
use crate::writer::{write_table, write_table_to};

/// Options for the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// How records are read
    pub parse: ParseOptions,

    /// How records are transposed
    pub transpose: TransposeOptions,
}

/// What a pipeline run read and wrote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub input_format: InputFormat,
    pub encoding: String,
    /// Delimiter of the input (CSV only)
    pub delimiter: Option<char>,
    pub record_count: usize,
    /// Vector names, in table order
    pub fields: Vec<String>,
    pub sorted_by: Option<String>,
}

/// Transpose a records file into a table file.
///
/// The output file is only created once every vector has been built.
pub fn transpose_file(
    input: &Path,
    output: &Path,
    options: &PipelineOptions,
) -> PipelineResult<PipelineSummary> {
    let (summary, vectors) = load_vectors(input, options)?;

    log_info(format!("💾 Writing table to {}", output.display()));
    write_table(output, &vectors)?;
    log_success(format!("{} rows written", vectors.len()));

    Ok(summary)
}

/// Transpose a records file and write the table to `writer`.
pub fn transpose_file_to<W: io::Write>(
    input: &Path,
    writer: W,
    options: &PipelineOptions,
) -> PipelineResult<PipelineSummary> {
    let (summary, vectors) = load_vectors(input, options)?;
    write_table_to(writer, &vectors)?;
    Ok(summary)
}

fn load_vectors(input: &Path, options: &PipelineOptions) -> PipelineResult<(PipelineSummary, Vec<Vector>)> {
    log_info(format!("📖 Reading {}", input.display()));
    let parsed = parse_file_auto(input, &options.parse)?;

    log_success(format!("Detected encoding: {}", parsed.encoding));
    if let Some(d) = parsed.delimiter {
        log_success(format!("Detected separator: '{}'", format_delimiter(d)));
    }
    log_success(format!("Read {} records", parsed.records.len()));

    match options.transpose.key_field {
        Some(ref key) => log_info(format!("🔄 Transposing, sorted by '{}'...", key)),
        None => log_info("🔄 Transposing..."),
    }
    if options.transpose.schema_check == SchemaCheck::Lazy {
        log_warning("Lazy schema check: fields not in the first record are ignored");
    }
    let vectors = transpose(&parsed.records, &options.transpose)?.collect::<Result<Vec<_>, _>>()?;

    for vector in &vectors {
        log_info_indent(format!("{} ({} values)", vector.name, vector.len()), 1);
    }

    let summary = PipelineSummary {
        input_format: parsed.format,
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        record_count: parsed.records.len(),
        fields: vectors.iter().map(|v| v.name.clone()).collect(),
        sorted_by: options.transpose.key_field.clone(),
    };

    Ok((summary, vectors))
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, TransposeError};
    use crate::logs::{LogLevel, LOG_BROADCASTER};
    use tempfile::tempdir;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_default_options() {
        let opts = PipelineOptions::default();
        assert!(opts.transpose.key_field.is_none());
        assert!(opts.parse.delimiter.is_none());
        assert!(!opts.parse.raw);
    }

    #[test]
    fn test_csv_to_table() {
        LOG_BROADCASTER.set_echo(false);
        let dir = tempdir().unwrap();
        let input = dir.path().join("months.csv");
        let output = dir.path().join("table.csv");
        std::fs::write(&input, "name;id\nMarch;3\nJanuary;1\n").unwrap();

        let options = PipelineOptions {
            transpose: TransposeOptions::sorted_by("id"),
            ..PipelineOptions::default()
        };
        let summary = transpose_file(&input, &output, &options).unwrap();

        assert_eq!(summary.input_format, InputFormat::Csv);
        assert_eq!(summary.delimiter, Some(';'));
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.fields, vec!["name", "id"]);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "name,January,March\nid,1,3\n"
        );
    }

    #[test]
    fn test_failure_leaves_no_output() {
        LOG_BROADCASTER.set_echo(false);
        let dir = tempdir().unwrap();
        let input = dir.path().join("records.json");
        let output = dir.path().join("table.csv");
        std::fs::write(&input, r#"[{"a": 1}, {"b": 2}]"#).unwrap();

        let err = transpose_file(&input, &output, &PipelineOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Transpose(TransposeError::SchemaMismatch { record: 1, .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_lazy_schema_logs_warning() {
        LOG_BROADCASTER.set_echo(false);
        let dir = tempdir().unwrap();
        let input = dir.path().join("records.json");
        std::fs::write(&input, r#"[{"a": 1}, {"a": 2, "b": 3}]"#).unwrap();

        let mut rx = LOG_BROADCASTER.subscribe();
        let options = PipelineOptions {
            transpose: TransposeOptions::default().with_schema_check(SchemaCheck::Lazy),
            ..PipelineOptions::default()
        };
        transpose_file_to(&input, io::sink(), &options).unwrap();

        let mut warned = false;
        loop {
            match rx.try_recv() {
                Ok(entry) => {
                    warned |= entry.level == LogLevel::Warning
                        && entry.message.contains("Lazy schema check");
                }
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        assert!(warned);
    }

    #[test]
    fn test_header_only_csv_is_empty_input() {
        LOG_BROADCASTER.set_echo(false);
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.csv");
        std::fs::write(&input, "name,id\n").unwrap();

        let err = transpose_file_to(&input, io::sink(), &PipelineOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Transpose(TransposeError::EmptyInput)));
    }
}
