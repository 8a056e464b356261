//! Command-line interface for the redraft binary.

mod commands;
mod submit;
mod synthesize;

pub use commands::{Cli, Commands};
pub use submit::{SubmitArgs, handle_submit_command};
pub use synthesize::handle_synthesize_command;

use anyhow::Context;
use redraft_core::{COLUMN_MAPPING_KEY, ColumnRoleMapping};
use serde_json::{Map, Value};

/// Wrap a `{"column": "role"}` object given on the command line as view options.
fn view_options(mapping: &str) -> anyhow::Result<Value> {
    let roles: Value = serde_json::from_str(mapping).context("--mapping is not valid JSON")?;
    let mut options = Map::new();
    options.insert(COLUMN_MAPPING_KEY.to_string(), roles);
    Ok(Value::Object(options))
}

fn parse_mapping(mapping: &str) -> anyhow::Result<ColumnRoleMapping> {
    Ok(ColumnRoleMapping::from_view_options(
        "cli",
        &view_options(mapping)?,
    )?)
}

fn parse_object(flag: &str, text: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str(text).with_context(|| format!("{} is not valid JSON", flag))? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("{} must be a JSON object", flag),
    }
}
