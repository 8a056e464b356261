//! Supported database engine dialects.

use redraft_error::{DispatchError, DispatchErrorKind};
use serde::{Deserialize, Serialize};

/// Closed set of engine dialects the write-back core can target.
///
/// The identifiers are the data-source type names the caller already uses
/// (`mssql`, `mysql`, `oracle`, `pg`, `sqlite`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Dialect {
    /// Microsoft SQL Server
    Mssql,
    /// MySQL / MariaDB
    Mysql,
    /// Oracle Database
    Oracle,
    /// PostgreSQL
    Pg,
    /// SQLite
    Sqlite,
}

/// How a dialect spells bind placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// `:name`
    Named,
    /// `$1`, `$2`, ...
    Dollar,
    /// `@P1`, `@P2`, ...
    AtP,
    /// `?`
    Question,
}

impl Dialect {
    /// Parse a data-source type identifier.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedDialect` for identifiers outside the fixed set.
    ///
    /// # Examples
    ///
    /// ```
    /// use redraft_core::Dialect;
    ///
    /// assert_eq!(Dialect::parse("pg").unwrap(), Dialect::Pg);
    /// assert!(Dialect::parse("bigquery").is_err());
    /// ```
    #[track_caller]
    pub fn parse(id: &str) -> Result<Self, DispatchError> {
        id.parse::<Dialect>().map_err(|_| {
            tracing::debug!(dialect = %id, "Rejected unsupported dialect");
            DispatchError::new(DispatchErrorKind::UnsupportedDialect(id.to_string()))
        })
    }

    /// Whether `id` names a supported dialect.
    pub fn is_supported(id: &str) -> bool {
        id.parse::<Dialect>().is_ok()
    }

    /// Placeholder spelling the dialect's driver expects.
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            Dialect::Mssql => PlaceholderStyle::AtP,
            Dialect::Mysql | Dialect::Sqlite => PlaceholderStyle::Question,
            Dialect::Oracle => PlaceholderStyle::Named,
            Dialect::Pg => PlaceholderStyle::Dollar,
        }
    }
}
