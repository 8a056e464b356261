//! Data-source connection configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form connection settings of a data source.
///
/// Keys follow the data source's own configuration schema (`host`, `port`,
/// `user`, `password`, `dbname`, `dbpath`, ...). Values are kept as JSON so
/// numeric ports and string ports are both accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionConfig(Map<String, Value>);

impl ConnectionConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Setting rendered as text; numbers and booleans are stringified, null
    /// and structured values count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Raw setting.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for ConnectionConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
