//! Core data types for the redraft write-back core.
//!
//! This crate provides the data model shared by statement synthesis and
//! engine dispatch: column roles, dialects, statements and result tables.

mod connection;
mod dialect;
mod role;
mod statement;
mod table;

pub use connection::ConnectionConfig;
pub use dialect::{Dialect, PlaceholderStyle};
pub use role::{COLUMN_MAPPING_KEY, ColumnRole, ColumnRoleMapping};
pub use statement::{BoundStatement, UpdateStatement};
pub use table::{ColumnDescriptor, ColumnType, ExecutionOutcome, NO_DATA_MESSAGE, ResultTable, Row};
