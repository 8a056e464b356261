//! Binding submitted form values to a synthesized statement.

use redraft_core::{BoundStatement, UpdateStatement};
use redraft_error::{BindingError, BindingErrorKind};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Attach one submitted value to every placeholder of `statement`.
///
/// `values` is the flat form payload keyed by column name. Only column names
/// are logged; submitted values never are.
///
/// # Errors
///
/// * `UnknownParameter` if the payload names a column the statement does not use.
/// * `MissingValue` if a placeholder has no submitted value. An explicit JSON
///   `null` counts as a value and binds SQL NULL.
///
/// # Examples
///
/// ```
/// use redraft_core::UpdateStatement;
/// use redraft_synth::bind;
/// use serde_json::json;
///
/// let stmt = UpdateStatement::new("users", None, vec!["name".into()], vec!["id".into()]);
/// let payload = json!({"id": 7, "name": "Alice"});
/// let bound = bind(stmt, payload.as_object().unwrap()).unwrap();
/// assert_eq!(bound.values().collect::<Vec<_>>(), vec![&json!("Alice"), &json!(7)]);
/// ```
#[instrument(skip_all, fields(placeholders = statement.placeholders().len(), submitted = values.len()))]
pub fn bind(
    statement: UpdateStatement,
    values: &Map<String, Value>,
) -> Result<BoundStatement, BindingError> {
    let placeholders = statement.placeholders();

    if let Some(unknown) = values
        .keys()
        .find(|key| !placeholders.contains(&key.as_str()))
    {
        return Err(BindingError::new(BindingErrorKind::UnknownParameter(
            unknown.clone(),
        )));
    }

    let parameters = placeholders
        .iter()
        .map(|name| {
            values
                .get(*name)
                .map(|value| (name.to_string(), value.clone()))
                .ok_or_else(|| BindingError::new(BindingErrorKind::MissingValue(name.to_string())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(columns = ?placeholders, "Bound submitted values");
    Ok(BoundStatement::new(statement, parameters))
}
