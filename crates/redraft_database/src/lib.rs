//! Engine dispatch for the redraft write-back core.
//!
//! Runs a bound UPDATE statement against one of the supported engines inside
//! a single transaction, resolves the returned columns' types and classifies
//! failures. PostgreSQL, MySQL and SQLite are driven through `sqlx`; SQL
//! Server and Oracle have type resolvers but no connection builder.

mod bind;
mod connection;
mod convert;
mod dispatcher;
mod types;

pub use connection::connection_string;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use types::{ColumnMeta, ColumnMetaBuilder, resolve_column_type};
