//! Parquet ingestion implementation.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime};
use parquet::basic::{ConvertedType, Type as PhysicalType};
use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;
use parquet::schema::types::Type as SchemaType;

use crate::error::PreviewResult;
use crate::types::{self, DataSet, DataType, Value};

use super::infer::{normalize_column_names, unify_column};

/// Ingest Parquet bytes into an in-memory [`DataSet`].
///
/// Notes:
/// - Columns are the top-level fields of the file schema, in schema order
/// - Uses the Parquet record API (`RowIter`); nested groups are rendered as text
/// - Columns with no non-null values keep the type declared in the file schema
pub fn ingest_parquet_from_bytes(bytes: &[u8]) -> PreviewResult<DataSet> {
    let reader = SerializedFileReader::new(Bytes::copy_from_slice(bytes))?;

    let declared: Vec<(String, DataType)> = reader
        .metadata()
        .file_metadata()
        .schema()
        .get_fields()
        .iter()
        .map(|f| (f.name().to_string(), declared_type(f)))
        .collect();

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); declared.len()];
    let mut row_count = 0;
    for row_res in reader.get_row_iter(None)? {
        let row = row_res?;
        row_count += 1;

        // Build a name->Field map for lookup.
        let mut map: HashMap<&str, &Field> = HashMap::new();
        for (name, field) in row.get_column_iter() {
            map.insert(name.as_str(), field);
        }

        for ((name, _), col) in declared.iter().zip(columns.iter_mut()) {
            col.push(map.get(name.as_str()).map_or(Value::Null, |f| convert_parquet_field(f)));
        }
    }

    let names = normalize_column_names(declared.iter().map(|(n, _)| n.clone()).collect());
    let ds = DataSet::from_columns(
        row_count,
        names
            .into_iter()
            .zip(declared)
            .zip(columns)
            .map(|((name, (_, schema_type)), values)| {
                let all_null = values.iter().all(Value::is_null);
                let (data_type, values) = unify_column(values);
                let data_type = if all_null { schema_type } else { data_type };
                (types::Field::new(name, data_type), values)
            })
            .collect(),
    );
    tracing::debug!(
        rows = ds.row_count(),
        columns = ds.column_count(),
        "decoded parquet"
    );
    Ok(ds)
}

fn declared_type(field: &SchemaType) -> DataType {
    if !field.is_primitive() {
        return DataType::Utf8;
    }
    match field.get_basic_info().converted_type() {
        ConvertedType::DATE | ConvertedType::TIMESTAMP_MILLIS | ConvertedType::TIMESTAMP_MICROS => {
            return DataType::DateTime;
        }
        ConvertedType::UTF8 | ConvertedType::ENUM | ConvertedType::JSON => return DataType::Utf8,
        _ => {}
    }
    match field.get_physical_type() {
        PhysicalType::BOOLEAN => DataType::Bool,
        PhysicalType::INT32 | PhysicalType::INT64 => DataType::Int64,
        PhysicalType::FLOAT | PhysicalType::DOUBLE => DataType::Float64,
        _ => DataType::Utf8,
    }
}

fn convert_parquet_field(f: &Field) -> Value {
    match f {
        Field::Null => Value::Null,
        Field::Bool(b) => Value::Bool(*b),
        Field::Byte(v) => Value::Int64(i64::from(*v)),
        Field::Short(v) => Value::Int64(i64::from(*v)),
        Field::Int(v) => Value::Int64(i64::from(*v)),
        Field::Long(v) => Value::Int64(*v),
        Field::UByte(v) => Value::Int64(i64::from(*v)),
        Field::UShort(v) => Value::Int64(i64::from(*v)),
        Field::UInt(v) => Value::Int64(i64::from(*v)),
        Field::ULong(v) => match i64::try_from(*v) {
            Ok(v) => Value::Int64(v),
            Err(_) => Value::Float64(*v as f64),
        },
        Field::Float(v) => Value::Float64(f64::from(*v)),
        Field::Double(v) => Value::Float64(*v),
        Field::Str(s) => Value::Utf8(s.clone()),
        Field::Date(days) => {
            datetime_or_text(DateTime::from_timestamp(i64::from(*days) * 86_400, 0).map(|d| d.naive_utc()), f)
        }
        Field::TimestampMillis(ms) => {
            datetime_or_text(DateTime::from_timestamp_millis(*ms).map(|d| d.naive_utc()), f)
        }
        Field::TimestampMicros(us) => {
            datetime_or_text(DateTime::from_timestamp_micros(*us).map(|d| d.naive_utc()), f)
        }
        other => Value::Utf8(other.to_string()),
    }
}

fn datetime_or_text(dt: Option<NaiveDateTime>, f: &Field) -> Value {
    dt.map(Value::DateTime)
        .unwrap_or_else(|| Value::Utf8(f.to_string()))
}
