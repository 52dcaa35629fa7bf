//! Delimited text ingestion (CSV and TSV).

use std::io::Read;

use crate::error::{PreviewError, PreviewResult};
use crate::types::DataSet;

use super::infer::text_table;

/// Ingest comma-separated bytes into a [`DataSet`].
pub fn ingest_csv_from_bytes(bytes: &[u8]) -> PreviewResult<DataSet> {
    ingest_delimited_from_reader(bytes, b',')
}

/// Ingest tab-separated bytes into a [`DataSet`].
pub fn ingest_tsv_from_bytes(bytes: &[u8]) -> PreviewResult<DataSet> {
    ingest_delimited_from_reader(bytes, b'\t')
}

/// Ingest delimited text from a reader.
///
/// Rules:
///
/// - The first record is the header row and must exist.
/// - Records shorter than the header are padded with nulls.
/// - Records longer than the header are a parse failure.
/// - Column types are inferred from the cell text.
pub fn ingest_delimited_from_reader<R: Read>(reader: R, delimiter: u8) -> PreviewResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> PreviewResult<DataSet> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    if headers.is_empty() {
        return Err(PreviewError::ParseFailure {
            row: 1,
            message: "no columns to parse from input".to_string(),
        });
    }

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        if record.len() > headers.len() {
            return Err(PreviewError::ParseFailure {
                row: user_row,
                message: format!(
                    "expected {} fields, saw {}",
                    headers.len(),
                    record.len()
                ),
            });
        }

        let mut row: Vec<Option<String>> = record.iter().map(|s| Some(s.to_owned())).collect();
        row.resize(headers.len(), None);
        rows.push(row);
    }

    let ds = text_table(headers, rows);
    tracing::debug!(
        rows = ds.row_count(),
        columns = ds.column_count(),
        "parsed delimited text"
    );
    Ok(ds)
}
