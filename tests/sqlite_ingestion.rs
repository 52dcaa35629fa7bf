use std::path::Path;

use rusqlite::Connection;
use tempfile::TempDir;

use tabular_preview::ingestion::sqlite::{ingest_sqlite_from_bytes, SqliteIngestion, SqliteSession};
use tabular_preview::types::{DataType, Value};
use tabular_preview::{ErrorKind, PreviewError};

/// Build a database file with rusqlite and return its bytes.
fn build_db(sql: &str) -> Vec<u8> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixture.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(sql).unwrap();
    }
    std::fs::read(&path).unwrap()
}

fn people_db() -> Vec<u8> {
    build_db(
        "CREATE TABLE people (id INTEGER, name TEXT, score REAL);
         INSERT INTO people VALUES (1, 'Ada', 98.5), (2, 'Grace', NULL);
         CREATE TABLE pets (owner INTEGER, species TEXT);
         INSERT INTO pets VALUES (1, 'cat');",
    )
}

fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[test]
fn first_table_is_read_by_default() {
    let staging = TempDir::new().unwrap();
    let outcome = ingest_sqlite_from_bytes(&people_db(), None, Some(staging.path())).unwrap();

    match outcome {
        SqliteIngestion::Table {
            tables,
            table,
            dataset,
        } => {
            assert_eq!(tables, vec!["people".to_string(), "pets".to_string()]);
            assert_eq!(table, "people");
            assert_eq!(dataset.row_count(), 2);
            assert_eq!(dataset.schema.fields[2].data_type, DataType::Float64);
            assert_eq!(dataset.rows[1][2], Value::Null);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(is_empty_dir(staging.path()));
}

#[test]
fn selected_table_is_read() {
    let outcome = ingest_sqlite_from_bytes(&people_db(), Some("pets"), None).unwrap();
    match outcome {
        SqliteIngestion::Table { table, dataset, .. } => {
            assert_eq!(table, "pets");
            assert_eq!(dataset.rows[0][1], Value::Utf8("cat".to_string()));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn unknown_table_is_reported_and_temp_file_removed() {
    let staging = TempDir::new().unwrap();
    let err = ingest_sqlite_from_bytes(&people_db(), Some("nope"), Some(staging.path())).unwrap_err();

    match &err {
        PreviewError::TableNotFound { table, available } => {
            assert_eq!(table, "nope");
            assert_eq!(available.len(), 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::DatabaseError);
    assert!(is_empty_dir(staging.path()));
}

#[test]
fn database_without_tables_is_not_an_error() {
    let bytes = build_db("CREATE VIEW v AS SELECT 1 AS one;");
    let outcome = ingest_sqlite_from_bytes(&bytes, None, None).unwrap();
    assert_eq!(outcome, SqliteIngestion::NoTables);
}

#[test]
fn stale_table_selection_on_empty_database_still_reports_no_tables() {
    let staging = TempDir::new().unwrap();
    let bytes = build_db("CREATE VIEW v AS SELECT 1 AS one;");
    let outcome = ingest_sqlite_from_bytes(&bytes, Some("people"), Some(staging.path())).unwrap();
    assert_eq!(outcome, SqliteIngestion::NoTables);
    assert!(is_empty_dir(staging.path()));
}

#[test]
fn corrupt_database_is_a_database_error_and_cleans_up() {
    let staging = TempDir::new().unwrap();
    let err = ingest_sqlite_from_bytes(
        b"this is not a sqlite database, not even close to one.....",
        None,
        Some(staging.path()),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatabaseError);
    assert!(is_empty_dir(staging.path()));
}

#[test]
fn sql_text_is_never_executed() {
    let staging = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let target = outside.path().join("attached.db");
    let script = format!(
        "ATTACH DATABASE '{}' AS x; CREATE TABLE x.t (a INTEGER); CREATE TABLE t (a INTEGER);",
        target.display()
    );

    let err = ingest_sqlite_from_bytes(script.as_bytes(), None, Some(staging.path())).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DatabaseError);
    assert!(!target.exists());
    assert!(is_empty_dir(outside.path()));
    assert!(is_empty_dir(staging.path()));
}

#[test]
fn session_drop_deletes_staged_file() {
    let session = SqliteSession::stage(&people_db(), None).unwrap();
    let path = session.staged_path().to_path_buf();
    assert!(path.exists());
    assert_eq!(session.table_names().unwrap().len(), 2);

    drop(session);
    assert!(!path.exists());
}

#[test]
fn blobs_are_rendered_as_hex() {
    let bytes = build_db("CREATE TABLE b (data BLOB); INSERT INTO b VALUES (x'00ff10');");
    match ingest_sqlite_from_bytes(&bytes, None, None).unwrap() {
        SqliteIngestion::Table { dataset, .. } => {
            assert_eq!(dataset.rows[0][0], Value::Utf8("0x00ff10".to_string()));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
