use tabular_preview::ingestion::text::{ingest_txt_from_bytes, TextIngestion};
use tabular_preview::ingestion::TxtStrategy;
use tabular_preview::types::Value;
use tabular_preview::ErrorKind;

fn table(bytes: &[u8]) -> (tabular_preview::types::DataSet, TxtStrategy) {
    match ingest_txt_from_bytes(bytes).unwrap() {
        TextIngestion::Table { dataset, strategy } => (dataset, strategy),
        other => panic!("expected a table, got {other:?}"),
    }
}

#[test]
fn comma_delimited_text_is_tried_first() {
    let (ds, strategy) = table(b"a,b,c\n1,2,3");
    assert_eq!(strategy, TxtStrategy::Comma);
    assert_eq!(ds.column_count(), 3);
    assert_eq!(ds.rows[0], vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)]);
}

#[test]
fn tab_delimited_text_falls_through_to_tab() {
    let (ds, strategy) = table(b"a\tb\tc\n1\t2\t3");
    assert_eq!(strategy, TxtStrategy::Tab);
    assert_eq!(ds.schema.field_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
fn free_text_is_shown_raw() {
    match ingest_txt_from_bytes(b"hello world").unwrap() {
        TextIngestion::Raw { content } => assert_eq!(content, "hello world"),
        other => panic!("expected raw text, got {other:?}"),
    }
}

#[test]
fn ragged_comma_text_is_shown_raw() {
    // Comma parse fails on the long row; tab yields a single column.
    let input = "a,b\n1,2,3\n";
    match ingest_txt_from_bytes(input.as_bytes()).unwrap() {
        TextIngestion::Raw { content } => assert_eq!(content, input),
        other => panic!("expected raw text, got {other:?}"),
    }
}

#[test]
fn prose_with_commas_parses_as_comma_table() {
    let (_, strategy) = table(b"Dear Ada, thanks\nBest, Grace\n");
    assert_eq!(strategy, TxtStrategy::Comma);
}

#[test]
fn non_utf8_raw_text_is_an_encoding_failure() {
    let err = ingest_txt_from_bytes(b"\xff\xfe\xfd").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EncodingFailure);
}
