//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]` (one row per element)
//! - A single JSON object: `{"a":1}` (one row)
//!
//! Nested objects are flattened into dot-separated column names (`{"a":{"b":1}}` becomes column
//! `a.b`). Arrays are kept as JSON text.

use serde_json::Map;

use crate::error::{PreviewError, PreviewResult};
use crate::types::{DataSet, Value};

use super::infer::typed_table;

/// Ingest JSON bytes into an in-memory [`DataSet`].
pub fn ingest_json_from_bytes(bytes: &[u8]) -> PreviewResult<DataSet> {
    let text = std::str::from_utf8(bytes)?;
    ingest_json_from_str(text)
}

/// Ingest JSON from an in-memory string into a [`DataSet`].
pub fn ingest_json_from_str(input: &str) -> PreviewResult<DataSet> {
    let v: serde_json::Value = serde_json::from_str(input.trim_start_matches('\u{feff}'))?;
    match v {
        serde_json::Value::Array(items) => ingest_json_values(&items),
        serde_json::Value::Object(obj) => ingest_json_objects(&[&obj]),
        other => Err(PreviewError::UnsupportedShape {
            message: format!(
                "json must be an object or an array of objects, got {}",
                json_kind(&other)
            ),
        }),
    }
}

fn ingest_json_values(values: &[serde_json::Value]) -> PreviewResult<DataSet> {
    let objects = values
        .iter()
        .enumerate()
        .map(|(idx0, v)| {
            v.as_object().ok_or_else(|| PreviewError::UnsupportedShape {
                message: format!("row {} is not a json object (got {})", idx0 + 1, json_kind(v)),
            })
        })
        .collect::<PreviewResult<Vec<_>>>()?;
    ingest_json_objects(&objects)
}

fn ingest_json_objects(objects: &[&Map<String, serde_json::Value>]) -> PreviewResult<DataSet> {
    let mut columns: Vec<(String, Vec<Value>)> = Vec::new();

    for (row_idx, obj) in objects.iter().enumerate() {
        let mut flat: Vec<(String, Value)> = Vec::new();
        flatten_object(None, obj, &mut flat);

        for (name, value) in flat {
            let col = match columns.iter().position(|(n, _)| *n == name) {
                Some(idx) => &mut columns[idx].1,
                None => {
                    // Earlier rows did not have this key.
                    columns.push((name, vec![Value::Null; row_idx]));
                    let last = columns.len() - 1;
                    &mut columns[last].1
                }
            };
            // `{"a.b": 1, "a": {"b": 2}}` flattens to the same name twice; last one wins.
            if col.len() > row_idx {
                col[row_idx] = value;
            } else {
                col.push(value);
            }
        }

        // Pad columns this row did not mention.
        for (_, col) in columns.iter_mut() {
            if col.len() == row_idx {
                col.push(Value::Null);
            }
        }
    }

    let ds = typed_table(objects.len(), columns);
    tracing::debug!(
        rows = ds.row_count(),
        columns = ds.column_count(),
        "parsed json"
    );
    Ok(ds)
}

fn flatten_object(
    prefix: Option<&str>,
    obj: &Map<String, serde_json::Value>,
    out: &mut Vec<(String, Value)>,
) {
    for (key, v) in obj {
        let name = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match v {
            serde_json::Value::Object(inner) => flatten_object(Some(&name), inner, out),
            other => out.push((name, convert_json_value(other))),
        }
    }
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Value::Utf8(v.to_string()),
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
