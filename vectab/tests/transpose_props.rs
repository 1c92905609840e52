//! Property-based tests for transposition and table output.

use proptest::prelude::*;
use tempfile::tempdir;

use vectab::{
    transpose, transpose_all, vectors_to_records, write_table, Record, Scalar, TransposeOptions,
};

/// Strategy for distinct field names, in a random but fixed order
fn field_names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z][a-z0-9_]{0,7}", 1..6)
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// Strategy for scalar values, including text that needs CSV quoting
fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        any::<i64>().prop_map(Scalar::Integer),
        any::<bool>().prop_map(Scalar::Bool),
        (-1.0e6f64..1.0e6).prop_map(Scalar::Float),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Scalar::Text),
        "[a-z]{0,4}[,\"][a-z]{0,4}".prop_map(Scalar::Text),
        Just(Scalar::Null),
    ]
}

/// Uniform records over the generated field names
fn records_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Record>)> {
    field_names_strategy().prop_flat_map(|names| {
        let width = names.len();
        let rows = prop::collection::vec(prop::collection::vec(scalar_strategy(), width), 1..20);
        (Just(names), rows).prop_map(|(names, rows)| {
            let records = rows
                .into_iter()
                .map(|values| names.iter().cloned().zip(values).collect::<Record>())
                .collect();
            (names, records)
        })
    })
}

/// 2^53: integers from here on are not all representable as f64
const EDGE: i64 = 1 << 53;

/// Integers and floats mixed: halves around zero and whole values around 2^53
fn numeric_key_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        (-3i64..4).prop_map(Scalar::Integer),
        (-6i64..8).prop_map(|h| Scalar::Float(h as f64 / 2.0)),
        (-3i64..4).prop_map(|d| Scalar::Integer(EDGE + d)),
        (-3i64..4).prop_map(|d| Scalar::Float((EDGE + d) as f64)),
    ]
}

/// Keys of one comparable kind per record set
fn key_column_strategy() -> impl Strategy<Value = Vec<Scalar>> {
    prop_oneof![
        prop::collection::vec((0i64..5).prop_map(Scalar::Integer), 1..30),
        prop::collection::vec("[a-c]{0,2}".prop_map(Scalar::Text), 1..30),
        prop::collection::vec(numeric_key_strategy(), 1..30),
    ]
}

/// Records with a `key` field and a `tag` holding the input position
fn keyed_records_strategy() -> impl Strategy<Value = Vec<Record>> {
    key_column_strategy().prop_map(|keys| {
        keys.into_iter()
            .enumerate()
            .map(|(tag, key)| Record::new().with("key", key).with("tag", tag as i64))
            .collect()
    })
}

/// Exact sort key: numbers doubled (all generated numbers are whole or halves)
fn exact_key(value: &Scalar) -> (i128, String) {
    match value {
        Scalar::Integer(i) => (2 * i128::from(*i), String::new()),
        Scalar::Float(x) => ((x * 2.0) as i128, String::new()),
        Scalar::Text(s) => (0, s.clone()),
        other => panic!("unexpected key {other:?}"),
    }
}

proptest! {
    #[test]
    fn prop_one_vector_per_field((names, records) in records_strategy()) {
        let vectors = transpose_all(&records, &TransposeOptions::default()).unwrap();

        let vector_names: Vec<String> = vectors.iter().map(|v| v.name.clone()).collect();
        prop_assert_eq!(vector_names, names);
        for vector in &vectors {
            prop_assert_eq!(vector.len(), records.len());
        }
    }

    #[test]
    fn prop_order_preserved_without_key((_names, records) in records_strategy()) {
        let vectors = transpose_all(&records, &TransposeOptions::default()).unwrap();

        for vector in &vectors {
            for (n, record) in records.iter().enumerate() {
                prop_assert_eq!(Some(&vector.values[n]), record.get(&vector.name));
            }
        }
    }

    #[test]
    fn prop_sorted_and_stable(records in keyed_records_strategy()) {
        let vectors = transpose_all(&records, &TransposeOptions::sorted_by("key")).unwrap();

        // A stable sort of the input on exact keys gives the same key and tag order
        let mut expected: Vec<&Record> = records.iter().collect();
        expected.sort_by_key(|r| exact_key(r.get("key").unwrap()));
        let expected_keys: Vec<Scalar> = expected.iter().map(|r| r.get("key").cloned().unwrap()).collect();
        let expected_tags: Vec<Scalar> = expected.iter().map(|r| r.get("tag").cloned().unwrap()).collect();

        let exact: Vec<(i128, String)> = vectors[0].values.iter().map(exact_key).collect();
        for (i, earlier) in exact.iter().enumerate() {
            for later in &exact[i + 1..] {
                prop_assert!(earlier <= later);
            }
        }
        prop_assert_eq!(&vectors[0].values, &expected_keys);
        prop_assert_eq!(&vectors[1].values, &expected_tags);
    }

    #[test]
    fn prop_untranspose_restores_records((_names, records) in records_strategy()) {
        let vectors = transpose_all(&records, &TransposeOptions::default()).unwrap();
        prop_assert_eq!(vectors_to_records(&vectors).unwrap(), records);
    }

    #[test]
    fn prop_write_fidelity((names, records) in records_strategy()) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let vectors = transpose_all(&records, &TransposeOptions::default()).unwrap();

        write_table(&path, &vectors).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        prop_assert_eq!(rows.len(), names.len());
        for (row, vector) in rows.iter().zip(&vectors) {
            prop_assert_eq!(&row[0], vector.name.as_str());
            let cells: Vec<String> = row.iter().skip(1).map(String::from).collect();
            let rendered: Vec<String> = vector.values.iter().map(|v| v.to_string()).collect();
            prop_assert_eq!(cells, rendered);
        }
    }
}

#[test]
fn test_empty_input_is_an_error() {
    let records: Vec<Record> = Vec::new();
    assert!(transpose(&records, &TransposeOptions::default()).is_err());
}
