//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_upload`] (from [`unified`]) which:
//!
//! - picks a format from the file extension (or you can override via [`PreviewOptions`])
//! - runs the matching format handler over the uploaded bytes
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`] (CSV and TSV)
//! - `excel` (feature `excel`)
//! - [`json`]
//! - [`parquet`]
//! - [`text`] (`.txt` cascade)
//! - [`xml`]
//! - [`sqlite`]

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod infer;
pub mod json;
pub mod observability;
pub mod parquet;
pub mod sqlite;
pub mod text;
pub mod unified;
pub mod xml;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, NonTabular,
    TracingObserver,
};
pub use text::TxtStrategy;
pub use unified::{FileFormat, Ingested, PreviewOptions, ingest_upload, resolve_format, severity_for_error};
