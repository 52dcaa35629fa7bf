//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_upload`], which turns an [`UploadedFile`] into an
//! [`Ingested`] value:
//!
//! - If [`PreviewOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{PreviewError, PreviewResult};
use crate::types::DataSet;
use crate::upload::UploadedFile;

use super::observability::{
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, NonTabular,
};
use super::sqlite::SqliteIngestion;
use super::text::{TextIngestion, TxtStrategy};
use super::{csv, json, parquet, sqlite, text, xml};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet workbooks (feature-gated behind `excel`).
    Excel,
    /// JSON object or array of objects.
    Json,
    /// Apache Parquet.
    Parquet,
    /// Tab-separated values.
    Tsv,
    /// Plain text: comma, then tab, then raw text.
    Txt,
    /// XML document whose root children are rows.
    Xml,
    /// SQLite database file (`.sqlite`, `.db`, `.sql`).
    Sqlite,
}

impl FileFormat {
    /// Extensions accepted at the upload boundary.
    pub const ALLOWED_EXTENSIONS: [&'static str; 11] = [
        "csv", "xlsx", "xls", "json", "parquet", "txt", "tsv", "xml", "sqlite", "db", "sql",
    ];

    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Excel),
            "json" => Some(Self::Json),
            "parquet" => Some(Self::Parquet),
            "tsv" => Some(Self::Tsv),
            "txt" => Some(Self::Txt),
            "xml" => Some(Self::Xml),
            "sqlite" | "db" | "sql" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Parse a format from the suffix of a file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        extension_of(name).and_then(Self::from_extension)
    }

    /// Human label used in notices.
    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Excel => "Excel",
            Self::Json => "JSON",
            Self::Parquet => "Parquet",
            Self::Tsv => "TSV",
            Self::Txt => "TXT",
            Self::Xml => "XML",
            Self::Sqlite => "SQLite",
        }
    }

    /// MIME type a browser would typically declare for `name`.
    pub fn mime_type(self, name: &str) -> &'static str {
        let ext = extension_of(name).map(str::to_ascii_lowercase);
        match (self, ext.as_deref()) {
            (Self::Csv, _) => "text/csv",
            (Self::Excel, Some("xls")) => "application/vnd.ms-excel",
            (Self::Excel, _) => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            (Self::Json, _) => "application/json",
            (Self::Parquet, _) => "application/vnd.apache.parquet",
            (Self::Tsv, _) => "text/tab-separated-values",
            (Self::Txt, _) => "text/plain",
            (Self::Xml, _) => "application/xml",
            (Self::Sqlite, Some("sql")) => "application/sql",
            (Self::Sqlite, _) => "application/vnd.sqlite3",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn extension_of(name: &str) -> Option<&str> {
    let (_, ext) = name.rsplit_once('.')?;
    (!ext.is_empty() && !ext.contains(&['/', '\\'][..])).then_some(ext)
}

/// Per-cycle options controlling ingestion and preview.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct PreviewOptions {
    /// If `None`, auto-detect format from the file extension.
    pub format: Option<FileFormat>,
    /// SQLite table to show. If `None`, the first table is shown.
    pub selected_table: Option<String>,
    /// Rows placed in the preview table. `None` keeps every row.
    ///
    /// Statistics and the export always cover the whole table.
    pub preview_rows: Option<usize>,
    /// Directory for the staged SQLite temp file. `None` uses the system temp dir.
    pub temp_dir: Option<PathBuf>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for PreviewOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewOptions")
            .field("format", &self.format)
            .field("selected_table", &self.selected_table)
            .field("preview_rows", &self.preview_rows)
            .field("temp_dir", &self.temp_dir)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            format: None,
            selected_table: None,
            preview_rows: None,
            temp_dir: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// What a format handler produced for one upload.
#[derive(Debug, Clone, PartialEq)]
pub enum Ingested {
    /// A table, plus the SQLite selector state when the upload was a database.
    Table {
        dataset: DataSet,
        /// Tables found in a database upload; empty for other formats.
        tables: Vec<String>,
        /// Table that was read from a database upload.
        selected_table: Option<String>,
        /// Strategy that parsed a `.txt` upload.
        strategy: Option<TxtStrategy>,
    },
    /// A `.txt` upload that is not tabular.
    RawText { content: String },
    /// A database upload with no tables.
    NoTables,
}

impl Ingested {
    fn table(dataset: DataSet) -> Self {
        Self::Table {
            dataset,
            tables: Vec::new(),
            selected_table: None,
            strategy: None,
        }
    }
}

/// Resolve the format of `upload`, honoring `options.format`.
pub fn resolve_format(upload: &UploadedFile, options: &PreviewOptions) -> PreviewResult<FileFormat> {
    match options.format {
        Some(f) => Ok(f),
        None => FileFormat::from_file_name(upload.name()).ok_or_else(|| {
            PreviewError::UnsupportedFormat {
                name: upload.name().to_string(),
            }
        }),
    }
}

/// Unified ingestion entry point for uploads.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` when a table was produced, with row/column stats
/// - `on_non_tabular` for raw text and table-less databases
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```
/// use tabular_preview::ingestion::{ingest_upload, Ingested, PreviewOptions};
/// use tabular_preview::UploadedFile;
///
/// let upload = UploadedFile::new("people.csv", None, b"id,name\n1,Ada\n".to_vec());
/// match ingest_upload(&upload, &PreviewOptions::default()).unwrap() {
///     Ingested::Table { dataset, .. } => assert_eq!(dataset.row_count(), 1),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn ingest_upload(upload: &UploadedFile, options: &PreviewOptions) -> PreviewResult<Ingested> {
    let fmt = resolve_format(upload, options)?;
    let ctx = IngestionContext {
        file_name: upload.name().to_string(),
        size_bytes: upload.size(),
        format: fmt,
    };

    let result = dispatch(fmt, upload, options);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(Ingested::Table { dataset, .. }) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: dataset.row_count(),
                    columns: dataset.column_count(),
                },
            ),
            Ok(Ingested::RawText { .. }) => obs.on_non_tabular(&ctx, NonTabular::RawText),
            Ok(Ingested::NoTables) => obs.on_non_tabular(&ctx, NonTabular::NoTables),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn dispatch(fmt: FileFormat, upload: &UploadedFile, options: &PreviewOptions) -> PreviewResult<Ingested> {
    let bytes = upload.bytes();
    match fmt {
        FileFormat::Csv => csv::ingest_csv_from_bytes(bytes).map(Ingested::table),
        FileFormat::Excel => ingest_excel_dispatch(bytes).map(Ingested::table),
        FileFormat::Json => json::ingest_json_from_bytes(bytes).map(Ingested::table),
        FileFormat::Parquet => parquet::ingest_parquet_from_bytes(bytes).map(Ingested::table),
        FileFormat::Tsv => csv::ingest_tsv_from_bytes(bytes).map(Ingested::table),
        FileFormat::Txt => Ok(match text::ingest_txt_from_bytes(bytes)? {
            TextIngestion::Table { dataset, strategy } => Ingested::Table {
                dataset,
                tables: Vec::new(),
                selected_table: None,
                strategy: Some(strategy),
            },
            TextIngestion::Raw { content } => Ingested::RawText { content },
        }),
        FileFormat::Xml => xml::ingest_xml_from_bytes(bytes).map(Ingested::table),
        FileFormat::Sqlite => {
            let outcome = sqlite::ingest_sqlite_from_bytes(
                bytes,
                options.selected_table.as_deref(),
                options.temp_dir.as_deref(),
            )?;
            Ok(match outcome {
                SqliteIngestion::NoTables => Ingested::NoTables,
                SqliteIngestion::Table {
                    tables,
                    table,
                    dataset,
                } => Ingested::Table {
                    dataset,
                    tables,
                    selected_table: Some(table),
                    strategy: None,
                },
            })
        }
    }
}

/// Severity of a failed cycle: infrastructure I/O is critical, content problems are errors.
pub fn severity_for_error(e: &PreviewError) -> IngestionSeverity {
    match e {
        PreviewError::Io(_) => IngestionSeverity::Critical,
        PreviewError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        PreviewError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            IngestionSeverity::Critical
        }
        _ => IngestionSeverity::Error,
    }
}

fn ingest_excel_dispatch(bytes: &[u8]) -> PreviewResult<DataSet> {
    // Avoid unused warnings when the feature is off.
    let _ = bytes;

    #[cfg(feature = "excel")]
    {
        super::excel::ingest_excel_from_bytes(bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(PreviewError::UnsupportedFormat {
            name: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FileFormat;

    #[test]
    fn every_allowed_extension_maps_to_one_format() {
        for ext in FileFormat::ALLOWED_EXTENSIONS {
            assert!(FileFormat::from_extension(ext).is_some(), "{ext}");
        }
        assert_eq!(FileFormat::from_extension("XLSX"), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_extension("pq"), None);
    }

    #[test]
    fn file_name_uses_last_suffix() {
        assert_eq!(FileFormat::from_file_name("data.backup.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_file_name("archive.db"), Some(FileFormat::Sqlite));
        assert_eq!(FileFormat::from_file_name("README"), None);
        assert_eq!(FileFormat::from_file_name("notes.md"), None);
    }
}
