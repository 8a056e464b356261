//! Per-dialect resolution of driver type names to semantic column types.

use derive_getters::Getters;
use redraft_core::{ColumnType, Dialect};

/// Driver-reported description of a result column.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ColumnMeta {
    /// Column name as reported by the driver
    name: String,
    /// Driver type name (e.g. `INT4`, `VARCHAR`, `NUMBER`)
    type_name: String,
    /// Numeric scale, for drivers that report one
    #[builder(default)]
    scale: Option<i32>,
}

impl ColumnMeta {
    /// Describe a column without scale information.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            scale: None,
        }
    }
}

/// Map a driver column description to a semantic type for `dialect`.
///
/// Unknown type names resolve to `None`, as does every SQLite column:
/// SQLite values are dynamically typed, so declared types say nothing
/// reliable about the returned data.
///
/// # Examples
///
/// ```
/// use redraft_core::{ColumnType, Dialect};
/// use redraft_database::{ColumnMeta, resolve_column_type};
///
/// let id = ColumnMeta::new("id", "INT4");
/// assert_eq!(resolve_column_type(Dialect::Pg, &id), Some(ColumnType::Integer));
/// assert_eq!(resolve_column_type(Dialect::Sqlite, &id), None);
/// ```
pub fn resolve_column_type(dialect: Dialect, column: &ColumnMeta) -> Option<ColumnType> {
    let type_name = column.type_name.trim().to_uppercase();
    match dialect {
        Dialect::Pg => pg_type(&type_name),
        Dialect::Mysql => mysql_type(&type_name),
        Dialect::Mssql => mssql_type(&type_name),
        Dialect::Oracle => oracle_type(&type_name, column.scale),
        Dialect::Sqlite => None,
    }
}

fn pg_type(type_name: &str) -> Option<ColumnType> {
    match type_name {
        "INT2" | "INT4" | "INT8" | "SMALLINT" | "INTEGER" | "BIGINT" => Some(ColumnType::Integer),
        "FLOAT4" | "FLOAT8" | "REAL" | "DOUBLE PRECISION" | "NUMERIC" => Some(ColumnType::Float),
        "BOOL" | "BOOLEAN" => Some(ColumnType::Boolean),
        "DATE" => Some(ColumnType::Date),
        "TIMESTAMP" | "TIMESTAMPTZ" => Some(ColumnType::Datetime),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "CHAR[]" | "BPCHAR[]" | "VARCHAR[]" => Some(ColumnType::String),
        _ => None,
    }
}

fn mysql_type(type_name: &str) -> Option<ColumnType> {
    let base = type_name.trim_end_matches(" UNSIGNED");
    match base {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "BIT" => {
            Some(ColumnType::Integer)
        }
        "BOOLEAN" => Some(ColumnType::Boolean),
        "DECIMAL" | "FLOAT" | "DOUBLE" => Some(ColumnType::Float),
        "TIMESTAMP" | "DATETIME" => Some(ColumnType::Datetime),
        "DATE" => Some(ColumnType::Date),
        "VARCHAR" | "CHAR" | "TEXT" => Some(ColumnType::String),
        _ => None,
    }
}

// SQL Server drivers only distinguish broad classes; whole numbers share
// the numeric class with decimals, so they resolve to float.
fn mssql_type(type_name: &str) -> Option<ColumnType> {
    match type_name {
        "CHAR" | "VARCHAR" | "NCHAR" | "NVARCHAR" | "TEXT" | "NTEXT" | "UNIQUEIDENTIFIER"
        | "BINARY" | "VARBINARY" | "IMAGE" => Some(ColumnType::String),
        "TINYINT" | "SMALLINT" | "INT" | "BIGINT" | "BIT" | "DECIMAL" | "NUMERIC" | "MONEY"
        | "SMALLMONEY" | "FLOAT" | "REAL" => Some(ColumnType::Float),
        "DATE" | "TIME" | "DATETIME" | "DATETIME2" | "SMALLDATETIME" | "DATETIMEOFFSET" => {
            Some(ColumnType::Datetime)
        }
        _ => None,
    }
}

fn oracle_type(type_name: &str, scale: Option<i32>) -> Option<ColumnType> {
    match type_name {
        "NUMBER" => match scale {
            Some(scale) if scale > 0 => Some(ColumnType::Float),
            _ => Some(ColumnType::Integer),
        },
        "BINARY_FLOAT" | "BINARY_DOUBLE" => Some(ColumnType::Float),
        "ROWID" => Some(ColumnType::Integer),
        "CHAR" | "NCHAR" | "VARCHAR2" | "NVARCHAR2" | "LONG" | "CLOB" | "NCLOB" | "BLOB" => {
            Some(ColumnType::String)
        }
        "DATE" => Some(ColumnType::Datetime),
        name if name.starts_with("TIMESTAMP") || name.starts_with("INTERVAL") => {
            Some(ColumnType::Datetime)
        }
        _ => None,
    }
}
