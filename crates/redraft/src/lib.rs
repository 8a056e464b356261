//! Write edited form values back to the tables a SELECT query read from.
//!
//! A form view pairs a saved query with a column-role mapping. Submitting the
//! form rewrites the query into a parameterized `UPDATE … RETURNING`, binds
//! the submitted values, runs the statement on the data source's engine and
//! schedules a refresh of the query.
//!
//! # Example
//!
//! ```
//! use redraft::{ColumnRole, ColumnRoleMapping, bind, synthesize};
//! use serde_json::json;
//!
//! let mapping = ColumnRoleMapping::new()
//!     .with("id", ColumnRole::Identifier)
//!     .with("name", ColumnRole::Field);
//! let statement = synthesize("SELECT id, name FROM users", &mapping).unwrap();
//! let values = json!({"id": 7, "name": "Alice"});
//! let bound = bind(statement, values.as_object().unwrap()).unwrap();
//! assert_eq!(bound.parameters().len(), 2);
//! ```

mod config;
mod memory;
mod observability;
mod submission;

pub use config::{ENV_PREFIX, LogFormat, RedraftConfig, RedraftConfigBuilder};
pub use memory::{InMemoryViewStore, RecordingRefreshQueue};
pub use observability::init_tracing;
pub use submission::{FormSubmission, SubmissionResponse};

pub use redraft_core::{
    BoundStatement, COLUMN_MAPPING_KEY, ColumnDescriptor, ColumnRole, ColumnRoleMapping,
    ColumnType, ConnectionConfig, Dialect, ExecutionOutcome, NO_DATA_MESSAGE, PlaceholderStyle,
    ResultTable, Row, UpdateStatement,
};
pub use redraft_database::{
    ColumnMeta, ColumnMetaBuilder, Dispatcher, DispatcherBuilder, connection_string,
    resolve_column_type,
};
pub use redraft_error::{
    BindingError, BindingErrorKind, ConfigError, DispatchError, DispatchErrorKind, RedraftError,
    RedraftErrorKind, RedraftResult, SubmissionError, SubmissionErrorKind, SynthesisError,
    SynthesisErrorKind,
};
pub use redraft_interface::{
    CollaboratorResult, DataSource, DataSourceBuilder, FormView, FormViewBuilder, RefreshJob,
    RefreshJobBuilder, RefreshQueue, RefreshRequest, Requester, RequesterBuilder, SourceQuery,
    SourceQueryBuilder, StatementExecutor, ViewStore,
};
pub use redraft_synth::{bind, synthesize};
