#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::{PreviewError, PreviewResult};
use crate::types::{DataSet, Value};

use super::infer::{parse_datetime, typed_table};

/// Ingest the first sheet of a workbook (`.xlsx`, `.xls`, ...) into an in-memory `DataSet`.
///
/// Behavior:
/// - The container format is detected from the content, not the file name
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows; rows shorter than the header are padded with nulls
/// - Cells keep their spreadsheet type; each column is then unified to a single type
pub fn ingest_excel_from_bytes(bytes: &[u8]) -> PreviewResult<DataSet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PreviewError::UnsupportedShape {
            message: "workbook has no sheets".to_string(),
        })?;

    let range = workbook.worksheet_range(&sheet)?;
    let ds = ingest_sheet_range(&sheet, &range)?;
    tracing::debug!(
        sheet = %sheet,
        rows = ds.row_count(),
        columns = ds.column_count(),
        "parsed workbook sheet"
    );
    Ok(ds)
}

fn ingest_sheet_range(sheet: &str, range: &calamine::Range<Data>) -> PreviewResult<DataSet> {
    let mut rows = range.rows().skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let header = rows.next().ok_or_else(|| PreviewError::UnsupportedShape {
        message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
    })?;

    let mut columns: Vec<(String, Vec<Value>)> = header
        .iter()
        .map(|c| (cell_to_header_string(c), Vec::new()))
        .collect();

    let mut row_count = 0;
    for row in rows {
        for (col_idx, (_, values)) in columns.iter_mut().enumerate() {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            values.push(convert_cell(cell));
        }
        row_count += 1;
    }

    Ok(typed_table(row_count, columns))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => "".to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        // Spreadsheets store whole numbers as floats.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::Int64(*f as i64),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Value::DateTime)
            .unwrap_or_else(|| Value::Utf8(dt.to_string())),
        Data::DateTimeIso(s) => parse_datetime(s)
            .map(Value::DateTime)
            .unwrap_or_else(|| Value::Utf8(s.clone())),
        Data::DurationIso(s) => Value::Utf8(s.clone()),
    }
}
