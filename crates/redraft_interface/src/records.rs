//! Records exchanged with the view store and the refresh queue.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use redraft_core::ConnectionConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A configured data source.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct DataSource {
    /// Data source ID
    id: i64,
    /// Display name
    name: String,
    /// Engine type identifier (e.g. `pg`, `mysql`)
    engine: String,
    /// Connection settings
    #[builder(default)]
    #[serde(default)]
    configuration: ConnectionConfig,
}

/// The saved query a form view was built on.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct SourceQuery {
    /// Query ID
    id: i64,
    /// Text of the query that produced the latest result
    query_text: String,
    /// Data source the query runs against
    data_source: DataSource,
}

/// A form view: options (including the column-role mapping) over a source query.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct FormView {
    /// View ID
    id: String,
    /// View options document; carries `columnMapping`
    options: Value,
    /// Query the view renders
    query: SourceQuery,
}

/// Identity of the user submitting a form.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Requester {
    /// User ID
    id: i64,
    /// E-mail address
    email: String,
    /// Printable representation, used for API users
    display_name: String,
    /// Whether the request authenticated with an API key
    #[builder(default)]
    #[serde(default)]
    is_api_user: bool,
}

impl Requester {
    /// Name recorded in refresh-job metadata.
    pub fn username(&self) -> &str {
        if self.is_api_user {
            &self.display_name
        } else {
            &self.email
        }
    }
}

/// Request to re-run a source query after a successful write-back.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Query text to re-run
    query_text: String,
    /// Data source to run it on
    data_source_id: i64,
    /// Requesting user
    user_id: i64,
    /// Whether the requesting user is an API user
    is_api_user: bool,
    /// Free-form job metadata
    metadata: Map<String, Value>,
}

impl RefreshRequest {
    /// Build the refresh of `query` on behalf of `requester`.
    pub fn for_query(query: &SourceQuery, requester: &Requester) -> Self {
        let mut metadata = Map::new();
        metadata.insert("Username".to_string(), Value::from(requester.username()));
        metadata.insert("query_id".to_string(), Value::from(*query.id()));
        Self {
            query_text: query.query_text().clone(),
            data_source_id: *query.data_source().id(),
            user_id: *requester.id(),
            is_api_user: *requester.is_api_user(),
            metadata,
        }
    }
}

/// Job handle returned by the refresh queue.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct RefreshJob {
    /// Job ID
    id: String,
    /// Queue-reported status
    status: String,
    /// When the job was last updated
    #[builder(default = "Utc::now()")]
    updated_at: DateTime<Utc>,
}
