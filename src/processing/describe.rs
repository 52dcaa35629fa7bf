//! Descriptive statistics for numeric columns.

use serde::Serialize;

use crate::types::DataSet;

/// The eight describe statistics for one numeric column.
///
/// Statistics that are undefined for the column (empty column, `std` of a single value) are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericColumnStats {
    pub column: String,
    /// Non-missing values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Statistics for every numeric column, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub columns: Vec<NumericColumnStats>,
}

impl DescriptiveStats {
    /// Row labels, in display order.
    pub const STATISTICS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Look up stats by column name.
    pub fn column(&self, name: &str) -> Option<&NumericColumnStats> {
        self.columns.iter().find(|c| c.column == name)
    }
}

impl NumericColumnStats {
    /// Values in [`DescriptiveStats::STATISTICS`] order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.p50,
            self.p75,
            self.max,
        ]
    }
}

/// Describe the numeric columns of `dataset`.
///
/// Returns `None` when the dataset has no numeric (`Int64`/`Float64`) column.
pub fn describe(dataset: &DataSet) -> Option<DescriptiveStats> {
    let columns: Vec<NumericColumnStats> = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.data_type.is_numeric())
        .map(|(idx, f)| {
            let values: Vec<f64> = dataset
                .column(idx)
                .filter(|v| !v.is_missing())
                .filter_map(|v| v.as_f64())
                .collect();
            column_stats(&f.name, values)
        })
        .collect();

    (!columns.is_empty()).then_some(DescriptiveStats { columns })
}

fn column_stats(column: &str, mut values: Vec<f64>) -> NumericColumnStats {
    values.sort_by(f64::total_cmp);
    let count = values.len();

    let (mean, std) = if count == 0 {
        (f64::NAN, f64::NAN)
    } else {
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            f64::NAN
        } else {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        };
        (mean, std)
    };

    NumericColumnStats {
        column: column.to_string(),
        count,
        mean,
        std,
        min: values.first().copied().unwrap_or(f64::NAN),
        p25: quantile(&values, 0.25),
        p50: quantile(&values, 0.50),
        p75: quantile(&values, 0.75),
        max: values.last().copied().unwrap_or(f64::NAN),
    }
}

/// Linear-interpolated quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::describe;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn people() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("age", DataType::Int64),
            Field::new("score", DataType::Float64),
        ]);
        let rows = vec![
            vec![Value::Utf8("Ada".into()), Value::Int64(30), Value::Float64(1.0)],
            vec![Value::Utf8("Grace".into()), Value::Int64(40), Value::Null],
            vec![Value::Utf8("Linus".into()), Value::Int64(20), Value::Float64(3.0)],
            vec![Value::Null, Value::Int64(10), Value::Float64(f64::NAN)],
        ];
        DataSet::new(schema, rows)
    }

    #[test]
    fn describe_covers_only_numeric_columns() {
        let stats = describe(&people()).unwrap();
        let names: Vec<&str> = stats.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["age", "score"]);
    }

    #[test]
    fn describe_matches_reference_values() {
        let stats = describe(&people()).unwrap();
        let age = stats.column("age").unwrap();
        assert_eq!(age.count, 4);
        assert_eq!(age.mean, 25.0);
        assert!((age.std - 12.909944487358056).abs() < 1e-12);
        assert_eq!(age.min, 10.0);
        assert_eq!(age.p25, 17.5);
        assert_eq!(age.p50, 25.0);
        assert_eq!(age.p75, 32.5);
        assert_eq!(age.max, 40.0);
    }

    #[test]
    fn describe_skips_missing_values() {
        let stats = describe(&people()).unwrap();
        let score = stats.column("score").unwrap();
        assert_eq!(score.count, 2);
        assert_eq!(score.mean, 2.0);
        assert_eq!(score.p50, 2.0);
    }

    #[test]
    fn describe_is_none_without_numeric_columns() {
        let schema = Schema::new(vec![Field::new("name", DataType::Utf8)]);
        let ds = DataSet::new(schema, vec![vec![Value::Utf8("Ada".into())]]);
        assert!(describe(&ds).is_none());
    }

    #[test]
    fn single_value_has_undefined_std() {
        let schema = Schema::new(vec![Field::new("x", DataType::Int64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Int64(7)]]);
        let stats = describe(&ds).unwrap();
        assert!(stats.columns[0].std.is_nan());
        assert_eq!(stats.columns[0].p75, 7.0);
    }
}
