//! In-memory summaries of an ingested [`crate::types::DataSet`].
//!
//! Currently implemented:
//!
//! - [`summarize()`]: shape, deep memory footprint, column info and (when any column is numeric)
//!   descriptive statistics
//! - [`describe()`]: count/mean/std/min/quartiles/max for numeric columns
//!
//! ## Example
//!
//! ```rust
//! use tabular_preview::processing::summarize;
//! use tabular_preview::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("name", DataType::Utf8),
//!     Field::new("age", DataType::Int64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("Ada".to_string()), Value::Int64(36)],
//!         vec![Value::Utf8("Grace".to_string()), Value::Null],
//!     ],
//! );
//!
//! let summary = summarize(&ds);
//! assert_eq!(summary.column_info[1].null, 1);
//!
//! // Only `age` is numeric, so only `age` gets statistics.
//! let stats = summary.stats.unwrap();
//! assert_eq!(stats.columns.len(), 1);
//! assert_eq!(stats.columns[0].mean, 36.0);
//! ```

pub mod describe;
pub mod summary;

pub use describe::{describe, DescriptiveStats, NumericColumnStats};
pub use summary::{column_summaries, summarize, ColumnSummary, Summary};
