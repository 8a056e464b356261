//! Column-role mapping declared by a form view.

use redraft_error::{SynthesisError, SynthesisErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which view options carry the column-role mapping.
pub const COLUMN_MAPPING_KEY: &str = "columnMapping";

/// Role a result column plays in a write-back.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    /// Row-identifying key, matched in the WHERE clause
    #[display("identifier")]
    Identifier,
    /// User-editable value, assigned in the SET clause
    #[display("field")]
    Field,
}

impl ColumnRole {
    /// Interpret a declared role. Anything other than `field` identifies rows.
    pub fn from_declared(role: &str) -> Self {
        if role == "field" {
            ColumnRole::Field
        } else {
            ColumnRole::Identifier
        }
    }
}

/// Ordered mapping from column name to role.
///
/// Insertion order is preserved and drives the order of the SET, WHERE and
/// RETURNING clauses. Column names are unique; re-inserting a name replaces
/// its role in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoleMapping {
    entries: Vec<(String, ColumnRole)>,
}

impl ColumnRoleMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `column` with `role`.
    pub fn insert(&mut self, column: impl Into<String>, role: ColumnRole) {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = role,
            None => self.entries.push((column, role)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, column: impl Into<String>, role: ColumnRole) -> Self {
        self.insert(column, role);
        self
    }

    /// Extract the mapping from a view's options document.
    ///
    /// # Errors
    ///
    /// Returns `MalformedMapping` if the options have no `columnMapping`
    /// object or a role is not a string.
    pub fn from_view_options(view_id: &str, options: &Value) -> Result<Self, SynthesisError> {
        let mapping = options
            .get(COLUMN_MAPPING_KEY)
            .ok_or_else(|| {
                SynthesisError::new(SynthesisErrorKind::MalformedMapping(format!(
                    "Form with view id '{}' has no attribute '{}' defined.",
                    view_id, COLUMN_MAPPING_KEY
                )))
            })?
            .as_object()
            .ok_or_else(|| {
                SynthesisError::new(SynthesisErrorKind::MalformedMapping(format!(
                    "Form with view id '{}' has a '{}' attribute that is not an object.",
                    view_id, COLUMN_MAPPING_KEY
                )))
            })?;

        let mut roles = Self::new();
        for (column, role) in mapping {
            let role = role.as_str().ok_or_else(|| {
                SynthesisError::new(SynthesisErrorKind::MalformedMapping(format!(
                    "Form with view id '{}' declares a non-string role for column '{}'.",
                    view_id, column
                )))
            })?;
            roles.insert(column.clone(), ColumnRole::from_declared(role));
        }
        Ok(roles)
    }

    /// Columns with the `field` role, in declaration order.
    pub fn fields(&self) -> Vec<String> {
        self.columns_where(|role| role == ColumnRole::Field)
    }

    /// Columns with any other role, in declaration order.
    pub fn identifiers(&self) -> Vec<String> {
        self.columns_where(|role| role != ColumnRole::Field)
    }

    /// Iterate over `(column, role)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnRole)> {
        self.entries.iter().map(|(name, role)| (name.as_str(), *role))
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no column is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn columns_where(&self, keep: impl Fn(ColumnRole) -> bool) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, role)| keep(*role))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, ColumnRole)> for ColumnRoleMapping {
    fn from_iter<I: IntoIterator<Item = (S, ColumnRole)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (column, role) in iter {
            mapping.insert(column, role);
        }
        mapping
    }
}
