use serde::Serialize;
use thiserror::Error;

/// Convenience result type for ingestion and preview operations.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Error type returned by ingestion and preview functions.
///
/// This is a single error enum shared across every format handler. Hosts normally never see it
/// directly: [`crate::preview::process_upload`] folds it into an error state with
/// [`PreviewError::kind`] and a remediation hint.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Underlying I/O error (e.g. temp file staging failed, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV/TSV/TXT ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet decoding error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML is not well-formed.
    #[error("xml error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// SQLite connection or query error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Text that must be UTF-8 is not.
    #[error("encoding error: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The file name has no supported extension.
    #[error("unsupported file type: '{name}'")]
    UnsupportedFormat { name: String },

    /// The content decoded fine but cannot be arranged into rows and columns.
    #[error("unsupported shape: {message}")]
    UnsupportedShape { message: String },

    /// The content is not well-formed for its format.
    #[error("failed to parse input at row {row}: {message}")]
    ParseFailure { row: usize, message: String },

    /// The requested SQLite table does not exist in the uploaded database.
    #[error("table '{table}' not found (available: {available:?})")]
    TableNotFound { table: String, available: Vec<String> },
}

/// Coarse error taxonomy shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// JSON/XML content that cannot be coerced to rows and columns.
    UnsupportedShape,
    /// Malformed content for the detected format.
    ParseFailure,
    /// Non-UTF-8 text where UTF-8 is required.
    EncodingFailure,
    /// SQLite connection, query, or temp-file failures.
    DatabaseError,
}

impl PreviewError {
    /// Classify this error into the user-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PreviewError::Io(_) | PreviewError::Sqlite(_) | PreviewError::TableNotFound { .. } => {
                ErrorKind::DatabaseError
            }
            PreviewError::Encoding(_) => ErrorKind::EncodingFailure,
            PreviewError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Utf8 { .. } => ErrorKind::EncodingFailure,
                _ => ErrorKind::ParseFailure,
            },
            PreviewError::Json(err) if err.is_data() => ErrorKind::UnsupportedShape,
            PreviewError::UnsupportedShape { .. } => ErrorKind::UnsupportedShape,
            #[cfg(feature = "excel")]
            PreviewError::Excel(_) => ErrorKind::ParseFailure,
            PreviewError::Json(_)
            | PreviewError::UnsupportedFormat { .. }
            | PreviewError::Parquet(_)
            | PreviewError::Xml(_)
            | PreviewError::ParseFailure { .. } => ErrorKind::ParseFailure,
        }
    }
}
