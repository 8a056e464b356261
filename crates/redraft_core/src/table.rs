//! Uniform tabular results of an executed statement.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message returned when a statement completes without returning rows.
pub const NO_DATA_MESSAGE: &str = "Query completed but it returned no data.";

/// Semantic column type shared by every dialect's resolver.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColumnType {
    /// Whole numbers
    Integer,
    /// Floating point and fixed-point numbers
    Float,
    /// Booleans
    Boolean,
    /// Text
    String,
    /// Timestamps
    Datetime,
    /// Calendar dates
    Date,
}

/// Name and resolved type of a result column.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Unique column name used as the row key
    name: String,
    /// Display name
    friendly_name: String,
    /// Resolved type, if the dialect's resolver knew it
    #[serde(rename = "type")]
    column_type: Option<ColumnType>,
}

impl ColumnDescriptor {
    /// Creates a descriptor whose display name equals its name.
    pub fn new(name: impl Into<String>, column_type: Option<ColumnType>) -> Self {
        let name = name.into();
        Self {
            friendly_name: name.clone(),
            name,
            column_type,
        }
    }
}

/// One returned record keyed by column name, in column order.
pub type Row = Map<String, Value>;

/// Columns and rows returned by an executed statement.
#[derive(Debug, Clone, Default, PartialEq, Getters, Serialize, Deserialize)]
pub struct ResultTable {
    /// Column descriptors in result order
    columns: Vec<ColumnDescriptor>,
    /// Returned rows
    rows: Vec<Row>,
}

impl ResultTable {
    /// Zip resolved columns with positional row values.
    ///
    /// Repeated column names are made unique with a running suffix
    /// (`id`, `id1`, `id2`, ...) so no value is lost when rows become maps.
    ///
    /// # Examples
    ///
    /// ```
    /// use redraft_core::{ColumnType, ResultTable};
    /// use serde_json::json;
    ///
    /// let table = ResultTable::from_positional(
    ///     vec![("id".to_string(), Some(ColumnType::Integer)), ("id".to_string(), None)],
    ///     vec![vec![json!(1), json!(2)]],
    /// );
    /// assert_eq!(table.columns()[1].name(), "id1");
    /// assert_eq!(table.rows()[0]["id1"], json!(2));
    /// ```
    pub fn from_positional(
        columns: Vec<(String, Option<ColumnType>)>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        let columns = dedupe_columns(columns);
        let rows = rows
            .into_iter()
            .map(|values| {
                columns
                    .iter()
                    .map(|c| c.name.clone())
                    .zip(values)
                    .collect::<Row>()
            })
            .collect();
        Self { columns, rows }
    }

    /// Whether no row was returned.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn dedupe_columns(columns: Vec<(String, Option<ColumnType>)>) -> Vec<ColumnDescriptor> {
    let mut seen: Vec<String> = Vec::with_capacity(columns.len());
    let mut duplicates = 1;
    columns
        .into_iter()
        .map(|(name, column_type)| {
            let name = if seen.contains(&name) {
                let renamed = format!("{}{}", name, duplicates);
                duplicates += 1;
                renamed
            } else {
                name
            };
            seen.push(name.clone());
            ColumnDescriptor::new(name, column_type)
        })
        .collect()
}

/// Non-cancelled result of executing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The statement returned rows
    Rows(ResultTable),
    /// The statement completed but returned no rows
    NoData,
    /// The statement failed; the message is meant for the submitting user
    Failed(String),
}

impl ExecutionOutcome {
    /// Split into the `(result, message)` pair callers display.
    pub fn into_parts(self) -> (Option<ResultTable>, Option<String>) {
        match self {
            ExecutionOutcome::Rows(table) => (Some(table), None),
            ExecutionOutcome::NoData => (None, Some(NO_DATA_MESSAGE.to_string())),
            ExecutionOutcome::Failed(message) => (None, Some(message)),
        }
    }

    /// Message accompanying the outcome, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ExecutionOutcome::Rows(_) => None,
            ExecutionOutcome::NoData => Some(NO_DATA_MESSAGE),
            ExecutionOutcome::Failed(message) => Some(message),
        }
    }

    /// Whether rows came back.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Rows(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_table_serializes_like_query_results() {
        let table = ResultTable::from_positional(
            vec![
                ("id".to_string(), Some(ColumnType::Integer)),
                ("name".to_string(), None),
            ],
            vec![vec![json!(7), json!("Alice")]],
        );
        assert_eq!(
            serde_json::to_value(&table).unwrap(),
            json!({
                "columns": [
                    {"name": "id", "friendly_name": "id", "type": "integer"},
                    {"name": "name", "friendly_name": "name", "type": null}
                ],
                "rows": [{"id": 7, "name": "Alice"}]
            })
        );
    }

    #[test]
    fn test_duplicate_counter_is_shared_across_names() {
        let table = ResultTable::from_positional(
            vec![
                ("a".to_string(), None),
                ("a".to_string(), None),
                ("b".to_string(), None),
                ("b".to_string(), None),
            ],
            vec![],
        );
        let names: Vec<&str> = table.columns().iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["a", "a1", "b", "b2"]);
    }

    #[test]
    fn test_no_data_parts() {
        assert_eq!(
            ExecutionOutcome::NoData.into_parts(),
            (None, Some("Query completed but it returned no data.".to_string()))
        );
    }
}
