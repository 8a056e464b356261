//! Synthesized UPDATE statements and their parameter sets.

use crate::PlaceholderStyle;
use derive_getters::Getters;
use serde::Serialize;
use serde_json::Value;

/// UPDATE statement derived from a source SELECT.
///
/// Holds the pieces the rewrite extracted rather than finished text, so the
/// same statement can be rendered with any dialect's placeholder spelling.
/// Every column appears exactly once as a placeholder: fields in the SET
/// clause, identifiers in the WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct UpdateStatement {
    /// Table reference and join clauses of the source query
    target: String,
    /// Filter of the source query, if it had one
    filter: Option<String>,
    /// Columns assigned in the SET clause
    fields: Vec<String>,
    /// Columns matched in the WHERE clause
    identifiers: Vec<String>,
}

impl UpdateStatement {
    /// Assemble a statement from rewrite fragments.
    pub fn new(
        target: impl Into<String>,
        filter: Option<String>,
        fields: Vec<String>,
        identifiers: Vec<String>,
    ) -> Self {
        Self {
            target: target.into(),
            filter: filter.filter(|f| !f.trim().is_empty()),
            fields,
            identifiers,
        }
    }

    /// Canonical text with `:column` placeholders.
    ///
    /// # Examples
    ///
    /// ```
    /// use redraft_core::UpdateStatement;
    ///
    /// let stmt = UpdateStatement::new(
    ///     "users",
    ///     Some("active = true".to_string()),
    ///     vec!["name".to_string()],
    ///     vec!["id".to_string()],
    /// );
    /// assert_eq!(
    ///     stmt.sql(),
    ///     "UPDATE users SET name = :name WHERE active = true AND id = :id RETURNING id, name"
    /// );
    /// ```
    pub fn sql(&self) -> String {
        self.render(PlaceholderStyle::Named)
    }

    /// Text with placeholders spelled for a particular driver.
    pub fn render(&self, style: PlaceholderStyle) -> String {
        let mut position = 0;
        let mut placeholder = |column: &str| {
            position += 1;
            match style {
                PlaceholderStyle::Named => format!(":{}", column),
                PlaceholderStyle::Dollar => format!("${}", position),
                PlaceholderStyle::AtP => format!("@P{}", position),
                PlaceholderStyle::Question => "?".to_string(),
            }
        };

        let assignments: Vec<String> = self
            .fields
            .iter()
            .map(|col| format!("{} = {}", col, placeholder(col)))
            .collect();

        let mut conditions: Vec<String> = self.filter.iter().cloned().collect();
        conditions.extend(
            self.identifiers
                .iter()
                .map(|col| format!("{} = {}", col, placeholder(col))),
        );

        let returning: Vec<&str> = self
            .identifiers
            .iter()
            .chain(self.fields.iter())
            .map(String::as_str)
            .collect();

        let mut sql = format!("UPDATE {} SET {}", self.target, assignments.join(", "));
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" RETURNING ");
        sql.push_str(&returning.join(", "));
        sql
    }

    /// Placeholder names in order of appearance in the rendered text.
    pub fn placeholders(&self) -> Vec<&str> {
        self.fields
            .iter()
            .chain(self.identifiers.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Statement paired with one submitted value per placeholder.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct BoundStatement {
    /// The statement being executed
    statement: UpdateStatement,
    /// `(placeholder, value)` pairs in order of appearance
    parameters: Vec<(String, Value)>,
}

impl BoundStatement {
    /// Pair a statement with its ordered parameters.
    ///
    /// Callers are expected to supply exactly one value per placeholder, in
    /// [`UpdateStatement::placeholders`] order.
    pub fn new(statement: UpdateStatement, parameters: Vec<(String, Value)>) -> Self {
        Self {
            statement,
            parameters,
        }
    }

    /// Parameter values in binding order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.parameters.iter().map(|(_, value)| value)
    }
}
