//! PostgreSQL row conversion

use super::{Positional, column_meta, decode_or_text, fallback_text, float};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;
use sqlx::postgres::PgRow;
use uuid::Uuid;

/// Convert returned rows into column metadata and positional values.
pub(crate) fn convert_pg_rows(rows: &[PgRow]) -> Positional {
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
                .map(|(idx, type_name)| decode_pg_cell(row, idx, type_name))
                .collect()
        })
        .collect();
    (columns, values)
}

fn decode_pg_cell(row: &PgRow, idx: usize, type_name: &str) -> Value {
    match type_name {
        "BOOL" => decode_or_text(row, idx, Value::Bool),
        "INT2" => decode_or_text(row, idx, |v: i16| Value::from(v)),
        "INT4" => decode_or_text(row, idx, |v: i32| Value::from(v)),
        "INT8" => decode_or_text(row, idx, |v: i64| Value::from(v)),
        "FLOAT4" => decode_or_text(row, idx, |v: f32| float(f64::from(v))),
        "FLOAT8" => decode_or_text(row, idx, float),
        "NUMERIC" => decode_or_text(row, idx, |v: Decimal| {
            v.to_f64()
                .map(float)
                .unwrap_or_else(|| Value::String(v.to_string()))
        }),
        "UUID" => decode_or_text(row, idx, |v: Uuid| Value::String(v.to_string())),
        "JSON" | "JSONB" => decode_or_text(row, idx, |v: Value| v),
        "TIMESTAMPTZ" => {
            decode_or_text(row, idx, |v: DateTime<Utc>| Value::String(v.to_rfc3339()))
        }
        "TIMESTAMP" => decode_or_text(row, idx, |v: NaiveDateTime| {
            Value::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }),
        "DATE" => decode_or_text(row, idx, |v: NaiveDate| {
            Value::String(v.format("%Y-%m-%d").to_string())
        }),
        "TIME" => decode_or_text(row, idx, |v: NaiveTime| {
            Value::String(v.format("%H:%M:%S%.f").to_string())
        }),
        "BYTEA" => decode_or_text(row, idx, |v: Vec<u8>| {
            Value::String(BASE64_STANDARD.encode(v))
        }),
        _ => fallback_text(row, idx),
    }
}
