use tabular_preview::ingestion::csv::{
    ingest_csv_from_bytes, ingest_csv_from_reader, ingest_tsv_from_bytes,
};
use tabular_preview::types::{DataType, Value};
use tabular_preview::{ErrorKind, PreviewError};

#[test]
fn ingest_csv_fixture_infers_types() {
    let bytes = std::fs::read("tests/fixtures/people.csv").unwrap();
    let ds = ingest_csv_from_bytes(&bytes).unwrap();

    assert_eq!(ds.row_count(), 2);
    let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        types,
        vec![DataType::Int64, DataType::Utf8, DataType::Float64, DataType::Bool]
    );
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );
}

#[test]
fn ingest_csv_from_existing_reader() {
    let input = "name,id\nAda,1\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let ds = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(ds.schema.field_names().collect::<Vec<_>>(), vec!["name", "id"]);
    assert_eq!(ds.rows[0][1], Value::Int64(1));
}

#[test]
fn short_rows_are_padded_with_nulls() {
    let ds = ingest_csv_from_bytes(b"a,b,c\n1,2\n3,4,5\n").unwrap();
    assert_eq!(ds.rows[0], vec![Value::Int64(1), Value::Int64(2), Value::Null]);
    assert_eq!(ds.schema.fields[2].data_type, DataType::Int64);
}

#[test]
fn long_rows_are_a_parse_failure() {
    let err = ingest_csv_from_bytes(b"a,b\n1,2\n3,4,5\n").unwrap_err();
    match &err {
        PreviewError::ParseFailure { row, message } => {
            assert_eq!(*row, 3);
            assert!(message.contains("expected 2 fields, saw 3"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
}

#[test]
fn empty_input_has_no_columns() {
    let err = ingest_csv_from_bytes(b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
    assert!(err.to_string().contains("no columns"));
}

#[test]
fn invalid_utf8_is_an_encoding_failure() {
    let err = ingest_csv_from_bytes(b"name\n\xff\xfe\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EncodingFailure);
}

#[test]
fn duplicate_and_blank_headers_are_renamed() {
    let ds = ingest_csv_from_bytes(b"x,,x\n1,2,3\n").unwrap();
    assert_eq!(
        ds.schema.field_names().collect::<Vec<_>>(),
        vec!["x", "Unnamed: 1", "x.1"]
    );
}

#[test]
fn quoted_fields_keep_delimiters() {
    let ds = ingest_csv_from_bytes(b"name,note\nAda,\"hello, world\"\n").unwrap();
    assert_eq!(ds.rows[0][1], Value::Utf8("hello, world".to_string()));
}

#[test]
fn tsv_splits_on_tabs_only() {
    let ds = ingest_tsv_from_bytes(b"city\tnote\nOslo\ta, b\n").unwrap();
    assert_eq!(ds.column_count(), 2);
    assert_eq!(ds.rows[0][1], Value::Utf8("a, b".to_string()));
}

#[test]
fn na_cells_are_missing_values() {
    let ds = ingest_csv_from_bytes(b"score\n1.5\nNA\n\n2.5\n").unwrap();
    assert_eq!(ds.schema.fields[0].data_type, DataType::Float64);
    assert!(ds.rows.iter().any(|r| r[0].is_null()));
}
