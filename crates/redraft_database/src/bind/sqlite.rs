//! SQLite parameter binding

use serde_json::Value;
use sqlx::sqlite::SqliteArguments;

pub(crate) type SqliteQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>;

/// Bind `values` with their natural JSON types.
pub(crate) fn bind_sqlite<'q>(mut query: SqliteQuery<'q>, values: &[Value]) -> SqliteQuery<'q> {
    for value in values {
        query = bind_sqlite_value(query, value);
    }
    query
}

fn bind_sqlite_value<'q>(query: SqliteQuery<'q>, value: &Value) -> SqliteQuery<'q> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(v) => query.bind(v),
            // SQLite integers are signed 64-bit; larger values keep their digits as text.
            None if n.is_u64() => query.bind(n.to_string()),
            None => query.bind(n.as_f64()),
        },
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.to_string()),
    }
}
