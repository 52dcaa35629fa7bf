//! Column type inference shared by the format handlers.
//!
//! Text-sourced handlers (CSV, TSV, TXT, XML) collect raw strings and call [`text_table`].
//! Typed sources (JSON, Excel, Parquet, SQLite) collect loosely typed [`Value`]s per column and
//! call [`unify_column`] to settle on one [`DataType`] per column.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{DataSet, DataType, Field, Value};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Cell spellings read as missing values in text sources.
const NA_VALUES: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Build a dataset from header names and rows of raw text cells.
///
/// `None` and blank cells become [`Value::Null`]. Every row must already have one cell per
/// header.
pub fn text_table(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> DataSet {
    let names = normalize_column_names(headers);
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Option<&str>> = rows
                .iter()
                .map(|row| row.get(idx).and_then(|c| c.as_deref()))
                .collect();
            let (data_type, values) = infer_text_column(&cells);
            (Field::new(name, data_type), values)
        })
        .collect();
    DataSet::from_columns(rows.len(), columns)
}

/// Build a dataset of `row_count` rows from column names and loosely typed column values.
pub fn typed_table(row_count: usize, columns: Vec<(String, Vec<Value>)>) -> DataSet {
    let (names, values): (Vec<String>, Vec<Vec<Value>>) = columns.into_iter().unzip();
    let names = normalize_column_names(names);
    DataSet::from_columns(
        row_count,
        names
            .into_iter()
            .zip(values)
            .map(|(name, values)| {
                let (data_type, values) = unify_column(values);
                (Field::new(name, data_type), values)
            })
            .collect(),
    )
}

/// Blank names become `Unnamed: <idx>`; repeats get `.1`, `.2`, ... suffixes.
pub fn normalize_column_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let trimmed = name.trim();
            let base = if trimmed.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                trimmed.to_string()
            };
            let mut candidate = base.clone();
            let mut n = 1;
            while seen.contains(&candidate) {
                candidate = format!("{base}.{n}");
                n += 1;
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Infer one column of raw text cells.
pub fn infer_text_column(cells: &[Option<&str>]) -> (DataType, Vec<Value>) {
    let trimmed: Vec<Option<&str>> = cells
        .iter()
        .copied()
        .map(|c| c.map(str::trim).filter(|s| !is_missing_text(s)))
        .collect();
    let present = || trimmed.iter().flatten().copied();

    if present().next().is_none() {
        return (DataType::Utf8, vec![Value::Null; trimmed.len()]);
    }

    if present().all(|s| s.parse::<i64>().is_ok()) {
        return (DataType::Int64, map_cells(&trimmed, |s| s.parse().ok().map(Value::Int64)));
    }
    if present().all(|s| parse_float(s).is_some()) {
        return (DataType::Float64, map_cells(&trimmed, |s| parse_float(s).map(Value::Float64)));
    }
    if present().all(|s| parse_bool(s).is_some()) {
        return (DataType::Bool, map_cells(&trimmed, |s| parse_bool(s).map(Value::Bool)));
    }
    if present().all(|s| parse_datetime(s).is_some()) {
        return (
            DataType::DateTime,
            map_cells(&trimmed, |s| parse_datetime(s).map(Value::DateTime)),
        );
    }

    // Keep the untrimmed text for string columns.
    let values = cells
        .iter()
        .map(|c| match c {
            Some(s) if !is_missing_text(s.trim()) => Value::Utf8((*s).to_string()),
            _ => Value::Null,
        })
        .collect();
    (DataType::Utf8, values)
}

fn is_missing_text(s: &str) -> bool {
    s.is_empty() || NA_VALUES.contains(&s)
}

fn map_cells(cells: &[Option<&str>], parse: impl Fn(&str) -> Option<Value>) -> Vec<Value> {
    cells
        .iter()
        .copied()
        .map(|c| c.and_then(&parse).unwrap_or(Value::Null))
        .collect()
}

/// Settle a column of loosely typed values on a single type.
///
/// Ints mixed with floats widen to floats. Any other mix falls back to strings.
pub fn unify_column(values: Vec<Value>) -> (DataType, Vec<Value>) {
    let mut kinds = values.iter().filter(|v| !v.is_null()).map(kind_of);
    let Some(first) = kinds.next() else {
        return (DataType::Utf8, values);
    };

    let mut data_type = first;
    for kind in kinds {
        data_type = match (data_type, kind) {
            (a, b) if a == b => a,
            (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                DataType::Float64
            }
            _ => DataType::Utf8,
        };
        if data_type == DataType::Utf8 {
            break;
        }
    }

    let values = values
        .into_iter()
        .map(|v| match (data_type, v) {
            (_, Value::Null) => Value::Null,
            (DataType::Float64, Value::Int64(i)) => Value::Float64(i as f64),
            (DataType::Utf8, Value::Utf8(s)) => Value::Utf8(s),
            (DataType::Utf8, other) => Value::Utf8(other.to_string()),
            (_, other) => other,
        })
        .collect();
    (data_type, values)
}

fn kind_of(v: &Value) -> DataType {
    match v {
        Value::Int64(_) => DataType::Int64,
        Value::Float64(_) => DataType::Float64,
        Value::Bool(_) => DataType::Bool,
        Value::DateTime(_) => DataType::DateTime,
        Value::Utf8(_) | Value::Null => DataType::Utf8,
    }
}

fn parse_float(s: &str) -> Option<f64> {
    match s.to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" => Some(f64::INFINITY),
        "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
        _ => s.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse an ISO-8601 date or date-time. Offsets are normalised to UTC.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_win_over_floats() {
        let (dt, values) = infer_text_column(&[Some("1"), Some(" 2 "), None, Some("")]);
        assert_eq!(dt, DataType::Int64);
        assert_eq!(
            values,
            vec![Value::Int64(1), Value::Int64(2), Value::Null, Value::Null]
        );
    }

    #[test]
    fn mixed_numbers_become_floats() {
        let (dt, values) = infer_text_column(&[Some("1"), Some("2.5")]);
        assert_eq!(dt, DataType::Float64);
        assert_eq!(values, vec![Value::Float64(1.0), Value::Float64(2.5)]);
    }

    #[test]
    fn booleans_and_datetimes_need_every_cell() {
        let (dt, _) = infer_text_column(&[Some("True"), Some("false")]);
        assert_eq!(dt, DataType::Bool);

        let (dt, values) = infer_text_column(&[Some("2024-01-02"), Some("2024-01-03 10:30:00")]);
        assert_eq!(dt, DataType::DateTime);
        assert_eq!(values[0], Value::DateTime(parse_datetime("2024-01-02 00:00:00").unwrap()));

        let (dt, _) = infer_text_column(&[Some("true"), Some("maybe")]);
        assert_eq!(dt, DataType::Utf8);
    }

    #[test]
    fn all_null_column_is_string() {
        let (dt, values) = infer_text_column(&[None, Some("  ")]);
        assert_eq!(dt, DataType::Utf8);
        assert_eq!(values, vec![Value::Null, Value::Null]);
    }

    #[test]
    fn na_spellings_are_null() {
        let (dt, values) = infer_text_column(&[Some("1.5"), Some("NaN"), Some("N/A")]);
        assert_eq!(dt, DataType::Float64);
        assert_eq!(values, vec![Value::Float64(1.5), Value::Null, Value::Null]);
    }

    #[test]
    fn unify_widens_ints_and_stringifies_mixes() {
        let (dt, values) = unify_column(vec![Value::Int64(1), Value::Null, Value::Float64(0.5)]);
        assert_eq!(dt, DataType::Float64);
        assert_eq!(values, vec![Value::Float64(1.0), Value::Null, Value::Float64(0.5)]);

        let (dt, values) = unify_column(vec![Value::Int64(1), Value::Utf8("x".to_string())]);
        assert_eq!(dt, DataType::Utf8);
        assert_eq!(
            values,
            vec![Value::Utf8("1".to_string()), Value::Utf8("x".to_string())]
        );
    }

    #[test]
    fn column_names_are_made_unique() {
        let names = normalize_column_names(vec![
            "a".to_string(),
            "a".to_string(),
            "".to_string(),
            "a".to_string(),
        ]);
        assert_eq!(names, vec!["a", "a.1", "Unnamed: 2", "a.2"]);
    }
}
