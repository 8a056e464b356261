//! PostgreSQL parameter binding

use super::{
    nullable, parameter_mismatch, to_bool, to_date, to_decimal, to_f64, to_i64,
    to_naive_datetime, to_text, to_time, to_utc_datetime,
};
use redraft_error::DispatchError;
use serde_json::Value;
use sqlx::TypeInfo;
use sqlx::postgres::{PgArguments, PgTypeInfo};
use uuid::Uuid;

pub(crate) type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, PgArguments>;

/// Bind `values` to a prepared statement whose parameter types are `types`.
///
/// Postgres receives parameters in binary form, so every value is converted
/// to exactly the type the server inferred for its placeholder.
pub(crate) fn bind_postgres<'q>(
    mut query: PgQuery<'q>,
    values: &[Value],
    types: &[PgTypeInfo],
) -> Result<PgQuery<'q>, DispatchError> {
    for (index, value) in values.iter().enumerate() {
        let type_name = types
            .get(index)
            .map(|ty| ty.name().to_uppercase())
            .unwrap_or_default();
        query = bind_postgres_value(query, index + 1, value, &type_name)?;
    }
    Ok(query)
}

fn bind_postgres_value<'q>(
    query: PgQuery<'q>,
    position: usize,
    value: &Value,
    type_name: &str,
) -> Result<PgQuery<'q>, DispatchError> {
    let mismatch = || parameter_mismatch(position, type_name);
    let query = match type_name {
        "BOOL" => query.bind(nullable(value, to_bool).ok_or_else(mismatch)?),
        "INT2" => query.bind(
            nullable(value, |v| to_i64(v).and_then(|n| i16::try_from(n).ok()))
                .ok_or_else(mismatch)?,
        ),
        "INT4" => query.bind(
            nullable(value, |v| to_i64(v).and_then(|n| i32::try_from(n).ok()))
                .ok_or_else(mismatch)?,
        ),
        "INT8" => query.bind(nullable(value, to_i64).ok_or_else(mismatch)?),
        "FLOAT4" => query.bind(
            nullable(value, |v| to_f64(v).map(|n| n as f32)).ok_or_else(mismatch)?,
        ),
        "FLOAT8" => query.bind(nullable(value, to_f64).ok_or_else(mismatch)?),
        "NUMERIC" => query.bind(nullable(value, to_decimal).ok_or_else(mismatch)?),
        "DATE" => query.bind(nullable(value, to_date).ok_or_else(mismatch)?),
        "TIME" => query.bind(nullable(value, to_time).ok_or_else(mismatch)?),
        "TIMESTAMP" => query.bind(nullable(value, to_naive_datetime).ok_or_else(mismatch)?),
        "TIMESTAMPTZ" => query.bind(nullable(value, to_utc_datetime).ok_or_else(mismatch)?),
        "UUID" => query.bind(
            nullable(value, |v| v.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok()))
                .ok_or_else(mismatch)?,
        ),
        "JSON" | "JSONB" => query.bind(match value {
            Value::Null => None,
            other => Some(other.clone()),
        }),
        // Character types, enums and domains all accept text input.
        _ => query.bind(to_text(value)),
    };
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::{Arguments, Execute};

    fn bind_one(value: Value, ty: PgTypeInfo) -> Result<PgQuery<'static>, DispatchError> {
        bind_postgres(sqlx::query("SELECT $1"), &[value], &[ty])
    }

    #[test]
    fn test_values_are_converted_to_reported_types() {
        assert!(bind_one(json!("42"), PgTypeInfo::with_name("int4")).is_ok());
        assert!(bind_one(json!("2024-01-31"), PgTypeInfo::with_name("date")).is_ok());
        assert!(bind_one(Value::Null, PgTypeInfo::with_name("timestamptz")).is_ok());
    }

    #[test]
    fn test_unconvertible_value_names_position_and_type() {
        let Err(err) = bind_postgres(
            sqlx::query("SELECT $1, $2"),
            &[json!("Alice"), json!("not a number")],
            &[PgTypeInfo::with_name("text"), PgTypeInfo::with_name("int4")],
        ) else {
            panic!("text in an integer parameter must not bind");
        };
        assert_eq!(
            err.kind,
            redraft_error::DispatchErrorKind::ParameterType {
                position: 2,
                expected: "INT4".to_string(),
            }
        );
    }

    #[test]
    fn test_out_of_range_integer_is_rejected() {
        assert!(bind_one(json!(70000), PgTypeInfo::with_name("int2")).is_err());
    }

    #[test]
    fn test_every_value_is_bound() {
        let mut query = bind_postgres(
            sqlx::query("SELECT $1, $2"),
            &[json!(1), json!("x")],
            &[PgTypeInfo::with_name("int8"), PgTypeInfo::with_name("text")],
        )
        .unwrap();
        let arguments = query.take_arguments().unwrap().unwrap();
        assert_eq!(arguments.len(), 2);
    }
}
