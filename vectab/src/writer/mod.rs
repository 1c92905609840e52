//! Vector table output.
//!
//! A vector table has one row per [`Vector`]: the vector's name in the first
//! column, then its values going across.
//!
//! ```text
//! name,January,February,March,April
//! id,1,2,3,4
//! length,31,28,31,30
//! ```
//!
//! Encoding is left to the `csv` crate defaults: comma delimiter, fields
//! quoted only when they contain a delimiter, quote or line break (inner
//! quotes doubled), `\n` line terminator.

use csv::{Writer, WriterBuilder};
use std::borrow::Borrow;
use std::io;
use std::path::Path;

use crate::error::WriteResult;
use crate::models::Vector;

/// Write vectors to a file, creating or truncating it.
///
/// The file handle lives inside the CSV writer for the duration of the call
/// and is closed when it is dropped, on success and on error alike. A failure
/// part way through can leave the rows written so far in the file.
pub fn write_table<P, I>(path: P, vectors: I) -> WriteResult<()>
where
    P: AsRef<Path>,
    I: IntoIterator,
    I::Item: Borrow<Vector>,
{
    let writer = builder().from_path(path)?;
    write_rows(writer, vectors)
}

/// Write vectors to any writer.
pub fn write_table_to<W, I>(writer: W, vectors: I) -> WriteResult<()>
where
    W: io::Write,
    I: IntoIterator,
    I::Item: Borrow<Vector>,
{
    write_rows(builder().from_writer(writer), vectors)
}

fn builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    // Vectors from different sources may differ in length
    builder.flexible(true);
    builder
}

fn write_rows<W, I>(mut writer: Writer<W>, vectors: I) -> WriteResult<()>
where
    W: io::Write,
    I: IntoIterator,
    I::Item: Borrow<Vector>,
{
    for vector in vectors {
        let vector = vector.borrow();
        writer.write_field(&vector.name)?;
        for value in &vector.values {
            writer.write_field(value.to_string())?;
        }
        writer.write_record(None::<&[u8]>)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scalar;
    use tempfile::tempdir;

    fn render(vectors: &[Vector]) -> String {
        let mut out = Vec::new();
        write_table_to(&mut out, vectors).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_months_table() {
        let vectors = vec![
            Vector::new("name", vec!["January".into(), "February".into()]),
            Vector::new("id", vec![1.into(), 2.into()]),
        ];
        assert_eq!(render(&vectors), "name,January,February\nid,1,2\n");
    }

    #[test]
    fn test_quoting() {
        let vectors = vec![Vector::new(
            "note",
            vec!["a,b".into(), "say \"hi\"".into(), "two\nlines".into(), "plain".into()],
        )];
        assert_eq!(
            render(&vectors),
            "note,\"a,b\",\"say \"\"hi\"\"\",\"two\nlines\",plain\n"
        );
    }

    #[test]
    fn test_scalar_rendering() {
        let vectors = vec![Vector::new(
            "mixed",
            vec![Scalar::Null, Scalar::Bool(false), Scalar::Float(2.0), Scalar::Integer(-3)],
        )];
        assert_eq!(render(&vectors), "mixed,,false,2.0,-3\n");
    }

    #[test]
    fn test_rows_of_different_length() {
        let vectors = vec![
            Vector::new("a", vec![1.into(), 2.into(), 3.into()]),
            Vector::new("b", vec![1.into()]),
        ];
        assert_eq!(render(&vectors), "a,1,2,3\nb,1\n");
    }

    #[test]
    fn test_write_file_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();

        let vectors = vec![Vector::new("id", vec![1.into()])];
        write_table(&path, &vectors).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,1\n");
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("table.csv");

        let vectors = vec![Vector::new("id", vec![1.into()])];
        assert!(write_table(&path, vectors).is_err());
    }
}
