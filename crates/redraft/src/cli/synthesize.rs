//! Synthesize command handler.

use super::parse_mapping;
use serde_json::json;

/// Print the synthesized statement and its placeholders as JSON.
#[tracing::instrument(skip_all)]
pub fn handle_synthesize_command(query: &str, mapping: &str) -> anyhow::Result<()> {
    let mapping = parse_mapping(mapping)?;
    let statement = redraft_synth::synthesize(query, &mapping)?;
    let output = json!({
        "sql": statement.sql(),
        "placeholders": statement.placeholders(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
