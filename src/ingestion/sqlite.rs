//! SQLite database ingestion.
//!
//! The uploaded bytes are staged into a private temp file, opened with `rusqlite`, the tables are
//! enumerated and the selected table is read into a [`DataSet`]. [`SqliteSession`] owns both the
//! connection and the temp file; dropping it closes the connection and then deletes the file, so
//! every exit path (success, enumeration error, query error) cleans up.

use std::io::Write;
use std::path::Path;

use rusqlite::Connection;
use rusqlite::types::ValueRef;
use tempfile::NamedTempFile;

use crate::error::{PreviewError, PreviewResult};
use crate::types::{DataSet, Value};

use super::infer::typed_table;

/// Result of ingesting a database upload.
#[derive(Debug, Clone, PartialEq)]
pub enum SqliteIngestion {
    /// The database has no tables. Not an error.
    NoTables,
    /// `table` (one of `tables`) was read into `dataset`.
    Table {
        tables: Vec<String>,
        table: String,
        dataset: DataSet,
    },
}

/// A staged database: temp file plus open connection.
///
/// Field order matters: the connection is dropped (closed) before the temp file is deleted.
#[derive(Debug)]
pub struct SqliteSession {
    conn: Connection,
    file: NamedTempFile,
}

impl SqliteSession {
    /// Copy `bytes` into a fresh temp file (in `temp_dir`, or the system temp dir) and open it.
    ///
    /// The bytes are only ever opened as a database file, never executed.
    pub fn stage(bytes: &[u8], temp_dir: Option<&Path>) -> PreviewResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("tabular-preview-").suffix(".db");
        let mut file = match temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;
        tracing::debug!(path = %file.path().display(), bytes = bytes.len(), "staged database");

        let conn = Connection::open(file.path())?;
        Ok(Self { conn, file })
    }

    /// Path of the staged temp file. It no longer exists once the session is dropped.
    pub fn staged_path(&self) -> &Path {
        self.file.path()
    }

    /// Names of all tables, in catalog order.
    pub fn table_names(&self) -> PreviewResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Read every row of `table`.
    pub fn read_table(&self, table: &str) -> PreviewResult<DataSet> {
        let query = format!("SELECT * FROM {}", quote_identifier(table));
        let mut stmt = self.conn.prepare(&query)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();

        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        let mut row_count = 0;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            for (idx, col) in columns.iter_mut().enumerate() {
                col.push(convert_value(row.get_ref(idx)?));
            }
            row_count += 1;
        }

        Ok(typed_table(row_count, names.into_iter().zip(columns).collect()))
    }
}

/// Stage `bytes`, enumerate tables and read `selected` (or the first table).
///
/// The staged temp file is removed before this function returns, whatever the outcome.
pub fn ingest_sqlite_from_bytes(
    bytes: &[u8],
    selected: Option<&str>,
    temp_dir: Option<&Path>,
) -> PreviewResult<SqliteIngestion> {
    let session = SqliteSession::stage(bytes, temp_dir)?;
    let outcome = query_session(&session, selected);
    drop(session);
    tracing::debug!("released staged database");
    outcome
}

fn query_session(session: &SqliteSession, selected: Option<&str>) -> PreviewResult<SqliteIngestion> {
    let tables = session.table_names()?;
    tracing::debug!(tables = tables.len(), "enumerated tables");
    if tables.is_empty() {
        // Zero tables is a notice, even with a table selected.
        return Ok(SqliteIngestion::NoTables);
    }

    let table = match selected {
        Some(name) => tables
            .iter()
            .find(|t| t.as_str() == name)
            .cloned()
            .ok_or_else(|| PreviewError::TableNotFound {
                table: name.to_string(),
                available: tables.clone(),
            })?,
        None => tables[0].clone(),
    };

    let dataset = session.read_table(&table)?;
    tracing::debug!(
        table = %table,
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "read table"
    );
    Ok(SqliteIngestion::Table {
        tables,
        table,
        dataset,
    })
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn convert_value(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(s) => Value::Utf8(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => {
            let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
            Value::Utf8(format!("0x{hex}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_identifier("t"), "\"t\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
