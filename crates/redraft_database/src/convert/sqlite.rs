//! SQLite row conversion

use super::{Positional, column_meta, float, undecodable};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde_json::Value;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Convert returned rows into column metadata and positional values.
///
/// SQLite values carry their own storage class, so cells are decoded by
/// trying integer, real, text and blob in turn instead of trusting the
/// declared column type.
pub(crate) fn convert_sqlite_rows(rows: &[SqliteRow]) -> Positional {
    let columns = column_meta(rows);
    let values = rows
        .iter()
        .map(|row| (0..columns.len()).map(|idx| decode_sqlite_cell(row, idx)).collect())
        .collect();
    (columns, values)
}

fn decode_sqlite_cell(row: &SqliteRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(float).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    match row.try_get::<Option<Vec<u8>>, _>(idx) {
        Ok(Some(v)) => Value::String(BASE64_STANDARD.encode(v)),
        Ok(None) => Value::Null,
        Err(e) => undecodable(row, idx, &e),
    }
}
