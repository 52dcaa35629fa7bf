//! Shape, memory and per-column summaries of a [`DataSet`].

use serde::Serialize;

use crate::types::{DataSet, DataType};

use super::describe::{describe, DescriptiveStats};

/// One row of the column information table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: DataType,
    pub non_null: usize,
    pub null: usize,
}

/// Everything the summary panels show for a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub columns: usize,
    /// Deep memory footprint in KiB.
    pub memory_kb: f64,
    pub column_info: Vec<ColumnSummary>,
    /// Present only when the table has at least one numeric column.
    pub stats: Option<DescriptiveStats>,
}

/// Per-column type, non-null and null counts.
///
/// `non_null + null` always equals the row count.
pub fn column_summaries(dataset: &DataSet) -> Vec<ColumnSummary> {
    dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let null = dataset.column(idx).filter(|v| v.is_missing()).count();
            ColumnSummary {
                name: field.name.clone(),
                data_type: field.data_type,
                non_null: dataset.row_count() - null,
                null,
            }
        })
        .collect()
}

/// Compute the summary panels for `dataset`.
pub fn summarize(dataset: &DataSet) -> Summary {
    Summary {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        memory_kb: dataset.deep_size_bytes() as f64 / 1024.0,
        column_info: column_summaries(dataset),
        stats: describe(dataset),
    }
}
