//! Plain-text (`.txt`) ingestion.
//!
//! A `.txt` upload may be comma-delimited, tab-delimited, or not tabular at all. Strategies are
//! tried lazily in order and the first success wins:
//!
//! 1. comma-delimited
//! 2. tab-delimited
//! 3. raw UTF-8 text (always succeeds for valid UTF-8)
//!
//! A delimited strategy only counts as a success when it yields at least two columns. A single
//! column means the delimiter never occurred, so the next strategy gets its turn.

use serde::Serialize;

use crate::error::{PreviewError, PreviewResult};
use crate::types::DataSet;

use super::csv::ingest_delimited_from_reader;

/// Parse strategies for `.txt` uploads, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TxtStrategy {
    Comma,
    Tab,
    RawText,
}

const DELIMITED: [(TxtStrategy, u8); 2] = [(TxtStrategy::Comma, b','), (TxtStrategy::Tab, b'\t')];

/// Outcome of ingesting a `.txt` upload.
#[derive(Debug, Clone, PartialEq)]
pub enum TextIngestion {
    /// Parsed as a table by a delimited strategy.
    Table { dataset: DataSet, strategy: TxtStrategy },
    /// Not tabular; the decoded content is shown as-is.
    Raw { content: String },
}

/// Run the `.txt` strategy cascade over `bytes`.
///
/// Only an invalid UTF-8 payload at the raw-text step is an error.
pub fn ingest_txt_from_bytes(bytes: &[u8]) -> PreviewResult<TextIngestion> {
    let parsed = DELIMITED.iter().find_map(|&(strategy, delimiter)| {
        match try_delimited(bytes, delimiter) {
            Ok(dataset) => Some((strategy, dataset)),
            Err(err) => {
                tracing::debug!(?strategy, error = %err, "txt strategy failed");
                None
            }
        }
    });

    if let Some((strategy, dataset)) = parsed {
        tracing::debug!(?strategy, columns = dataset.column_count(), "txt parsed");
        return Ok(TextIngestion::Table { dataset, strategy });
    }

    let content = std::str::from_utf8(bytes)?.to_string();
    tracing::debug!(bytes = bytes.len(), "txt is not tabular; using raw text");
    Ok(TextIngestion::Raw { content })
}

fn try_delimited(bytes: &[u8], delimiter: u8) -> PreviewResult<DataSet> {
    let ds = ingest_delimited_from_reader(bytes, delimiter)?;
    if ds.column_count() < 2 {
        return Err(PreviewError::ParseFailure {
            row: 1,
            message: format!(
                "delimiter {:?} yields a single column",
                char::from(delimiter)
            ),
        });
    }
    Ok(ds)
}
