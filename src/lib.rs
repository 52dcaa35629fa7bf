//! `tabular-preview` turns an uploaded file into a previewable table.
//!
//! One call to [`process_upload`] takes an [`UploadedFile`] through format dispatch, ingestion
//! into an in-memory [`types::DataSet`], summary statistics and CSV export, and returns a
//! [`RenderModel`] that a host (a web page, the bundled CLI) draws. Each call is independent: a
//! host re-renders by calling it again, e.g. with a different SQLite table selected in
//! [`PreviewOptions::selected_table`].
//!
//! ## Supported formats (by extension)
//!
//! - **CSV** `.csv`, **TSV** `.tsv`
//! - **Excel** `.xlsx`, `.xls` (first sheet; requires the Cargo feature `excel`, on by default)
//! - **JSON** `.json` (an object or an array of objects; nested objects flatten to dotted names)
//! - **Parquet** `.parquet`
//! - **TXT** `.txt` (comma-delimited, then tab-delimited, then raw text)
//! - **XML** `.xml` (each child of the root element is a row)
//! - **SQLite** `.sqlite`, `.db`, `.sql` (database files, one table at a time)
//!
//! Column types are inferred per column: [`types::DataType::Int64`], [`types::DataType::Float64`],
//! [`types::DataType::Bool`], [`types::DataType::DateTime`] or [`types::DataType::Utf8`].
//!
//! ## Example
//!
//! ```rust
//! use tabular_preview::{process_upload, Outcome, PreviewOptions, UploadedFile};
//!
//! let csv = b"city,temp\nOslo,3.5\nLima,19.0\n".to_vec();
//! let upload = UploadedFile::new("weather.csv", Some("text/csv".to_string()), csv);
//!
//! let model = process_upload(&upload, &PreviewOptions::default());
//! match &model.outcome {
//!     Outcome::Table(table) => {
//!         assert_eq!(table.summary.rows, 2);
//!         assert!(table.summary.stats.is_some());
//!         assert!(table.export.as_str().starts_with("city,temp\n"));
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```
//!
//! Failures never escape [`process_upload`]; they become [`Outcome::Failed`]:
//!
//! ```rust
//! use tabular_preview::{process_upload, ErrorKind, PreviewOptions, UploadedFile};
//!
//! let upload = UploadedFile::new("data.json", None, b"42".to_vec());
//! let report = process_upload(&upload, &PreviewOptions::default()).error().cloned().unwrap();
//! assert_eq!(report.kind, ErrorKind::UnsupportedShape);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format dispatch and per-format handlers
//! - [`processing`]: summary panels and descriptive statistics
//! - [`export`]: CSV download artifact
//! - [`preview`]: the per-cycle pipeline and [`RenderModel`]
//! - [`render`]: plain-text rendering of a [`RenderModel`]
//! - [`types`]: schema and in-memory dataset types
//! - [`error`]: error types and user-facing error kinds

pub mod error;
pub mod export;
pub mod ingestion;
pub mod preview;
pub mod processing;
pub mod render;
pub mod types;
pub mod upload;

pub use error::{ErrorKind, PreviewError, PreviewResult};
pub use ingestion::{FileFormat, PreviewOptions};
pub use preview::{process_upload, ErrorReport, FileDetails, Outcome, RenderModel, TablePreview};
pub use upload::UploadedFile;
