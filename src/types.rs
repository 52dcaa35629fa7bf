//! Core data model types.
//!
//! Every format handler produces an in-memory [`DataSet`]: an ordered [`Schema`] of uniquely named,
//! typed [`Field`]s plus row-major [`Value`] storage.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Date-time without time zone (UTC when the source carried an offset).
    DateTime,
}

impl DataType {
    /// Whether descriptive statistics apply to this type.
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }

    /// Short lowercase name used in column info tables.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::Bool => "bool",
            DataType::Utf8 => "string",
            DataType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Date-time.
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null, or a float `NaN`. Missing values are excluded from counts and statistics.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view used by statistics; `None` for nulls and non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Bytes held by this cell: the enum slot plus any heap payload.
    pub fn deep_size(&self) -> usize {
        let payload = match self {
            Value::Utf8(s) => s.len(),
            _ => 0,
        };
        std::mem::size_of::<Value>() + payload
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            // `{:?}` keeps a trailing `.0` so whole floats do not read back as integers.
            Value::Float64(v) if v.is_nan() => f.write_str("NaN"),
            Value::Float64(v) => write!(f, "{v:?}"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Utf8(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Build a dataset of `row_count` rows from typed columns.
    ///
    /// `row_count` is explicit so a source with rows but no columns keeps its rows.
    ///
    /// # Panics
    ///
    /// Panics if a column does not hold exactly `row_count` values.
    pub fn from_columns(row_count: usize, columns: Vec<(Field, Vec<Value>)>) -> Self {
        assert!(
            columns.iter().all(|(_, v)| v.len() == row_count),
            "all columns must have {row_count} values"
        );

        let mut rows: Vec<Vec<Value>> = (0..row_count)
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();
        let mut fields = Vec::with_capacity(columns.len());
        for (field, values) in columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
            fields.push(field);
        }

        Self::new(Schema::new(fields), rows)
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Iterate the values of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Estimated memory footprint in bytes, including string payloads.
    pub fn deep_size_bytes(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .map(Value::deep_size)
            .sum()
    }

    /// Copy of the first `n` rows, keeping the schema.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_columns_transposes_into_rows() {
        let ds = DataSet::from_columns(
            2,
            vec![
                (
                    Field::new("id", DataType::Int64),
                    vec![Value::Int64(1), Value::Int64(2)],
                ),
                (
                    Field::new("name", DataType::Utf8),
                    vec![Value::Utf8("Ada".to_string()), Value::Null],
                ),
            ],
        );

        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.rows[1], vec![Value::Int64(2), Value::Null]);
        assert_eq!(ds.schema.index_of("name"), Some(1));
    }

    #[test]
    fn rows_survive_without_columns() {
        let ds = DataSet::from_columns(3, Vec::new());
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.column_count(), 0);
        assert!(ds.rows.iter().all(Vec::is_empty));
    }

    #[test]
    fn deep_size_counts_string_payloads() {
        let slot = std::mem::size_of::<Value>();
        let ds = DataSet::from_columns(
            2,
            vec![(
                Field::new("s", DataType::Utf8),
                vec![Value::Utf8("abcd".to_string()), Value::Null],
            )],
        );
        assert_eq!(ds.deep_size_bytes(), 2 * slot + 4);
    }

    #[test]
    fn display_keeps_float_marker() {
        assert_eq!(Value::Float64(1.0).to_string(), "1.0");
        assert_eq!(Value::Float64(98.5).to_string(), "98.5");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Null.to_string(), "");
    }
}
