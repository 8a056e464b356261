//! Parameter binding per driver.
//!
//! Submitted form values arrive as JSON. MySQL and SQLite coerce freely, so
//! values bind with their natural JSON type. Postgres prepares the statement
//! first and each value is converted to the parameter type the server reports.

mod mysql;
mod postgres;
mod sqlite;

pub(crate) use mysql::bind_mysql;
pub(crate) use postgres::bind_postgres;
pub(crate) use sqlite::bind_sqlite;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use redraft_error::{DispatchError, DispatchErrorKind};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Apply `convert` to a non-null value; JSON null becomes SQL NULL.
///
/// The outer `None` signals a value that cannot be converted.
pub(crate) fn nullable<T>(value: &Value, convert: impl Fn(&Value) -> Option<T>) -> Option<Option<T>> {
    match value {
        Value::Null => Some(None),
        other => convert(other).map(Some),
    }
}

#[track_caller]
pub(crate) fn parameter_mismatch(position: usize, expected: &str) -> DispatchError {
    DispatchError::new(DispatchErrorKind::ParameterType {
        position,
        expected: expected.to_string(),
    })
}

pub(crate) fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().and_then(|n| match n {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Some(true),
            "false" | "f" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

pub(crate) fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Scalars as text; arrays and objects as their JSON text.
pub(crate) fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn to_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| to_naive_datetime(value).map(|dt| dt.date()))
}

pub(crate) fn to_time(value: &Value) -> Option<NaiveTime> {
    let text = value.as_str()?.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

pub(crate) fn to_naive_datetime(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// RFC 3339 timestamps keep their offset; naive timestamps are taken as UTC.
pub(crate) fn to_utc_datetime(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?.trim();
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| to_naive_datetime(value).map(|dt| dt.and_utc()))
}
