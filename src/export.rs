//! CSV export of a [`DataSet`].

use serde::Serialize;

use crate::error::PreviewResult;
use crate::types::DataSet;

/// MIME type of the export artifact.
pub const CSV_MIME: &str = "text/csv";

/// A downloadable CSV artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvExport {
    /// `processed_<stem>.csv`.
    pub file_name: String,
    pub mime: &'static str,
    /// UTF-8 CSV text.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl CsvExport {
    /// The CSV text. Always valid UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Serialize `dataset` as CSV: comma-delimited, header row, no index column.
///
/// Nulls are empty fields. Floats keep a decimal point so they read back as floats.
pub fn write_csv(dataset: &DataSet) -> PreviewResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }

    wtr.into_inner().map_err(|e| e.into_error().into())
}

/// Build the download artifact for an upload named `upload_name`.
pub fn export_csv(dataset: &DataSet, upload_name: &str) -> PreviewResult<CsvExport> {
    Ok(CsvExport {
        file_name: export_file_name(upload_name),
        mime: CSV_MIME,
        bytes: write_csv(dataset)?,
    })
}

/// `processed_<stem>.csv`, where stem is the base name up to its first `.`.
pub fn export_file_name(upload_name: &str) -> String {
    let base = upload_name
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(upload_name);
    let stem = base.split('.').next().unwrap_or(base);
    format!("processed_{stem}.csv")
}
