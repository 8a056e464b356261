//! MySQL row conversion

use super::{Positional, column_meta, decode_or_text, fallback_text, float};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use sqlx::mysql::MySqlRow;

/// Convert returned rows into column metadata and positional values.
pub(crate) fn convert_mysql_rows(rows: &[MySqlRow]) -> Positional {
    let columns = column_meta(rows);
    let type_names: Vec<String> = columns
        .iter()
        .map(|c| c.type_name().to_uppercase())
        .collect();
    let values = rows
        .iter()
        .map(|row| {
            type_names
                .iter()
                .enumerate()
                .map(|(idx, type_name)| decode_mysql_cell(row, idx, type_name))
                .collect()
        })
        .collect();
    (columns, values)
}

fn decode_mysql_cell(row: &MySqlRow, idx: usize, type_name: &str) -> Value {
    match type_name {
        "BOOLEAN" => decode_or_text(row, idx, Value::Bool),
        name if name.contains("INT") && name.ends_with("UNSIGNED") => {
            decode_or_text(row, idx, |v: u64| Value::from(v))
        }
        name if name.contains("INT") => decode_or_text(row, idx, |v: i64| Value::from(v)),
        "FLOAT" => decode_or_text(row, idx, |v: f32| float(f64::from(v))),
        "DOUBLE" => decode_or_text(row, idx, float),
        "DECIMAL" => decode_or_text(row, idx, |v: Decimal| {
            v.to_f64()
                .map(float)
                .unwrap_or_else(|| Value::String(v.to_string()))
        }),
        "JSON" => decode_or_text(row, idx, |v: Value| v),
        "TIMESTAMP" => {
            decode_or_text(row, idx, |v: DateTime<Utc>| Value::String(v.to_rfc3339()))
        }
        "DATETIME" => decode_or_text(row, idx, |v: NaiveDateTime| {
            Value::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }),
        "DATE" => decode_or_text(row, idx, |v: NaiveDate| {
            Value::String(v.format("%Y-%m-%d").to_string())
        }),
        "TIME" => decode_or_text(row, idx, |v: NaiveTime| {
            Value::String(v.format("%H:%M:%S%.f").to_string())
        }),
        name if name.contains("BINARY") || name.contains("BLOB") => {
            decode_or_text(row, idx, |v: Vec<u8>| Value::String(BASE64_STANDARD.encode(v)))
        }
        _ => fallback_text(row, idx),
    }
}
