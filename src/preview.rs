//! One render cycle: upload in, render model out.
//!
//! [`process_upload`] runs dispatch, ingestion, summary and export for one [`UploadedFile`] and
//! returns a [`RenderModel`] describing everything a host should draw. It never fails: errors
//! become [`Outcome::Failed`] with a remediation hint. No state survives between calls, so a
//! host that re-renders on every interaction (e.g. a new SQLite table selection) simply calls it
//! again with updated [`PreviewOptions`].

use serde::Serialize;

use crate::error::{ErrorKind, PreviewError, PreviewResult};
use crate::export::{export_csv, CsvExport};
use crate::ingestion::{ingest_upload, resolve_format, FileFormat, Ingested, PreviewOptions, TxtStrategy};
use crate::processing::{summarize, Summary};
use crate::types::DataSet;
use crate::upload::UploadedFile;

/// Shown under every error message.
pub const REMEDIATION_HINT: &str = "Make sure your file is properly formatted and not corrupted.";
/// Shown when a `.txt` upload falls through to raw text.
pub const RAW_TEXT_WARNING: &str = "Could not parse as tabular data. Displaying raw content.";
/// Shown for a database upload with no tables.
pub const NO_TABLES_NOTICE: &str = "No tables found in the database.";
/// Shown before anything is uploaded.
pub const IDLE_PROMPT: &str = "Please upload a file to get started!";

/// Everything the host draws for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    /// Name, size and type of the upload; `None` before anything is uploaded.
    pub details: Option<FileDetails>,
    pub outcome: Outcome,
}

/// Upload details shown on every cycle, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDetails {
    pub name: String,
    pub size_kb: f64,
    pub declared_type: Option<String>,
}

/// What the cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing uploaded yet.
    Idle {
        prompt: &'static str,
        formats: Vec<SupportedFormat>,
    },
    /// A table with its summary panels and export.
    Table(Box<TablePreview>),
    /// A `.txt` upload that is not tabular.
    RawText {
        content: String,
        warning: &'static str,
    },
    /// A database upload with no tables.
    NoTables { notice: &'static str },
    /// The cycle failed; nothing else is rendered.
    Failed(ErrorReport),
}

/// The table view plus its panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub format: FileFormat,
    /// Per-format success notice.
    pub success: String,
    /// SQLite table selector entries; empty for other formats.
    pub tables: Vec<String>,
    /// SQLite table on display.
    pub selected_table: Option<String>,
    /// Strategy that parsed a `.txt` upload.
    pub strategy: Option<TxtStrategy>,
    /// Rows shown in the table view (possibly truncated by `preview_rows`).
    pub preview: DataSet,
    pub summary: Summary,
    pub export: CsvExport,
}

/// User-visible error state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    pub hint: &'static str,
}

impl ErrorReport {
    pub fn from_error(err: &PreviewError) -> Self {
        Self {
            kind: err.kind(),
            message: format!("Error reading file: {err}"),
            hint: REMEDIATION_HINT,
        }
    }
}

/// A row of the "supported formats" list shown while idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedFormat {
    pub format: FileFormat,
    pub extensions: &'static [&'static str],
    pub description: &'static str,
}

const SUPPORTED_FORMATS: [(FileFormat, &[&str], &str); 8] = [
    (FileFormat::Csv, &[".csv"], "Comma-separated values"),
    (FileFormat::Excel, &[".xlsx", ".xls"], "Microsoft Excel files"),
    (FileFormat::Json, &[".json"], "JavaScript Object Notation"),
    (FileFormat::Parquet, &[".parquet"], "Apache Parquet columnar format"),
    (FileFormat::Tsv, &[".tsv"], "Tab-separated values"),
    (FileFormat::Txt, &[".txt"], "Plain text files"),
    (FileFormat::Xml, &[".xml"], "Extensible Markup Language"),
    (FileFormat::Sqlite, &[".sqlite", ".db", ".sql"], "SQLite database files"),
];

impl RenderModel {
    /// The state before anything is uploaded.
    pub fn idle() -> Self {
        Self {
            details: None,
            outcome: Outcome::Idle {
                prompt: IDLE_PROMPT,
                formats: SUPPORTED_FORMATS
                    .iter()
                    .map(|&(format, extensions, description)| SupportedFormat {
                        format,
                        extensions,
                        description,
                    })
                    .collect(),
            },
        }
    }

    /// The table preview, if the cycle produced one.
    pub fn table(&self) -> Option<&TablePreview> {
        match &self.outcome {
            Outcome::Table(t) => Some(t),
            _ => None,
        }
    }

    /// The error report, if the cycle failed.
    pub fn error(&self) -> Option<&ErrorReport> {
        match &self.outcome {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl FileDetails {
    pub fn of(upload: &UploadedFile) -> Self {
        Self {
            name: upload.name().to_string(),
            size_kb: upload.size() as f64 / 1024.0,
            declared_type: upload.declared_type().map(str::to_string),
        }
    }
}

/// Run one render cycle for `upload`.
///
/// # Examples
///
/// ```
/// use tabular_preview::{process_upload, PreviewOptions, UploadedFile};
///
/// let upload = UploadedFile::new("people.csv", None, b"name,age\nAda,36\nGrace,45\n".to_vec());
/// let model = process_upload(&upload, &PreviewOptions::default());
///
/// let table = model.table().unwrap();
/// assert_eq!(table.summary.rows, 2);
/// assert_eq!(table.export.file_name, "processed_people.csv");
/// ```
pub fn process_upload(upload: &UploadedFile, options: &PreviewOptions) -> RenderModel {
    let span = tracing::info_span!("process_upload", file = %upload.name(), size = upload.size());
    let _enter = span.enter();

    let outcome = match build_outcome(upload, options) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(error = %err, kind = ?err.kind(), "upload could not be previewed");
            Outcome::Failed(ErrorReport::from_error(&err))
        }
    };

    RenderModel {
        details: Some(FileDetails::of(upload)),
        outcome,
    }
}

fn build_outcome(upload: &UploadedFile, options: &PreviewOptions) -> PreviewResult<Outcome> {
    let format = resolve_format(upload, options)?;
    tracing::debug!(%format, "dispatching upload");

    match ingest_upload(upload, options)? {
        Ingested::Table {
            dataset,
            tables,
            selected_table,
            strategy,
        } => {
            let summary = summarize(&dataset);
            let export = export_csv(&dataset, upload.name())?;
            let preview = match options.preview_rows {
                Some(n) if n < dataset.row_count() => dataset.head(n),
                _ => dataset,
            };
            tracing::info!(
                rows = summary.rows,
                columns = summary.columns,
                memory_kb = summary.memory_kb,
                "table ready"
            );
            Ok(Outcome::Table(Box::new(TablePreview {
                format,
                success: success_notice(format, tables.len()),
                tables,
                selected_table,
                strategy,
                preview,
                summary,
                export,
            })))
        }
        Ingested::RawText { content } => Ok(Outcome::RawText {
            content,
            warning: RAW_TEXT_WARNING,
        }),
        Ingested::NoTables => Ok(Outcome::NoTables {
            notice: NO_TABLES_NOTICE,
        }),
    }
}

fn success_notice(format: FileFormat, table_count: usize) -> String {
    match format {
        FileFormat::Sqlite => {
            format!("Database loaded successfully! Found {table_count} table(s).")
        }
        other => format!("{} file loaded successfully!", other.label()),
    }
}
