//! Row conversion per driver.
//!
//! Each driver module turns its rows into the positional shape the result
//! table is built from: column metadata taken from the first row, then one
//! JSON value per cell. Cells that fail to decode as their reported type are
//! retried as text and become null as a last resort.

mod mysql;
mod postgres;
mod sqlite;

pub(crate) use mysql::convert_mysql_rows;
pub(crate) use postgres::convert_pg_rows;
pub(crate) use sqlite::convert_sqlite_rows;

use crate::ColumnMeta;
use serde_json::{Number, Value};
use sqlx::{Column, ColumnIndex, Decode, Row, Type, TypeInfo};
use tracing::debug;

/// Column metadata plus positional cell values.
pub(crate) type Positional = (Vec<ColumnMeta>, Vec<Vec<Value>>);

/// Decode cell `idx` as `T`, falling back to text.
pub(crate) fn decode_or_text<'r, R, T>(row: &'r R, idx: usize, to_json: impl FnOnce(T) -> Value) -> Value
where
    R: Row,
    usize: ColumnIndex<R>,
    T: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
{
    match row.try_get::<Option<T>, _>(idx) {
        Ok(Some(v)) => to_json(v),
        Ok(None) => Value::Null,
        Err(_) => fallback_text(row, idx),
    }
}

/// Decode cell `idx` as text, or null when the driver cannot render it.
pub(crate) fn fallback_text<'r, R>(row: &'r R, idx: usize) -> Value
where
    R: Row,
    usize: ColumnIndex<R>,
    String: Decode<'r, R::Database> + Type<R::Database>,
{
    match row.try_get::<Option<String>, _>(idx) {
        Ok(Some(v)) => Value::String(v),
        Ok(None) => Value::Null,
        Err(e) => undecodable(row, idx, &e),
    }
}

/// Null for a cell no decoder accepts, logged with its column and type.
pub(crate) fn undecodable<R: Row>(row: &R, idx: usize, error: &sqlx::Error) -> Value {
    let (column, type_name) = row
        .columns()
        .get(idx)
        .map(|c| (c.name(), c.type_info().name()))
        .unwrap_or(("?", "?"));
    debug!(idx, column, type_name, error = %error, "Undecodable cell returned as null");
    Value::Null
}

/// Non-finite floats have no JSON form and become null.
pub(crate) fn float(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

/// Column metadata from the first row; empty results have none.
pub(crate) fn column_meta<R>(rows: &[R]) -> Vec<ColumnMeta>
where
    R: Row,
{
    rows.first()
        .map(|row| {
            row.columns()
                .iter()
                .map(|c| ColumnMeta::new(c.name(), c.type_info().name()))
                .collect()
        })
        .unwrap_or_default()
}
