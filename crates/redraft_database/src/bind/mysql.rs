//! MySQL parameter binding

use serde_json::Value;
use sqlx::mysql::MySqlArguments;

pub(crate) type MySqlQuery<'q> = sqlx::query::Query<'q, sqlx::MySql, MySqlArguments>;

/// Bind `values` with their natural JSON types; the server converts them to
/// the column types on assignment.
pub(crate) fn bind_mysql<'q>(mut query: MySqlQuery<'q>, values: &[Value]) -> MySqlQuery<'q> {
    for value in values {
        query = bind_mysql_value(query, value);
    }
    query
}

fn bind_mysql_value<'q>(query: MySqlQuery<'q>, value: &Value) -> MySqlQuery<'q> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                query.bind(v)
            } else if let Some(v) = n.as_u64() {
                query.bind(v)
            } else {
                query.bind(n.as_f64())
            }
        }
        Value::String(s) => query.bind(s.clone()),
        // JSON columns and text columns both take the serialized document.
        other => query.bind(other.to_string()),
    }
}
