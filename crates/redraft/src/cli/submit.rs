//! Submit command handler.

use super::{parse_object, view_options};
use redraft::{FormSubmission, InMemoryViewStore, RecordingRefreshQueue, RedraftConfig};
use anyhow::Context;
use redraft_core::ConnectionConfig;
use redraft_interface::{DataSourceBuilder, FormViewBuilder, RequesterBuilder, SourceQueryBuilder};
use serde_json::json;
use std::path::Path;

const CLI_VIEW_ID: &str = "cli";

/// Arguments of the submit command.
#[derive(Debug, Clone)]
pub struct SubmitArgs<'a> {
    /// Engine type identifier
    pub dialect: &'a str,
    /// Connection settings file
    pub connection: &'a Path,
    /// Source SELECT query
    pub query: &'a str,
    /// Column roles JSON
    pub mapping: &'a str,
    /// Submitted values JSON
    pub values: &'a str,
    /// Submitting user
    pub user: &'a str,
}

/// Run one write-back and print `{job, data}` or `{data: null, error}`.
///
/// Rejected submissions are reported on stdout and exit with status 1;
/// unreadable arguments are returned as errors.
#[tracing::instrument(skip_all, fields(dialect = args.dialect))]
pub async fn handle_submit_command(config: &RedraftConfig, args: SubmitArgs<'_>) -> anyhow::Result<()> {
    let settings = std::fs::read_to_string(args.connection).with_context(|| {
        format!("Failed to read connection file {}", args.connection.display())
    })?;
    let connection: ConnectionConfig =
        serde_json::from_str(&settings).context("Connection file is not a JSON object")?;
    let options = view_options(args.mapping)?;
    let values = parse_object("--values", args.values)?;

    let view = FormViewBuilder::default()
        .id(CLI_VIEW_ID)
        .options(options)
        .query(
            SourceQueryBuilder::default()
                .id(0)
                .query_text(args.query)
                .data_source(
                    DataSourceBuilder::default()
                        .id(0)
                        .name(args.dialect)
                        .engine(args.dialect)
                        .configuration(connection)
                        .build()?,
                )
                .build()?,
        )
        .build()?;
    let requester = RequesterBuilder::default()
        .id(0)
        .email(args.user)
        .display_name(args.user)
        .build()?;

    let views = InMemoryViewStore::new();
    views.insert(view).await;
    let submission = FormSubmission::new(views, RecordingRefreshQueue::new(), config.dispatcher());

    match submission.submit(CLI_VIEW_ID, &requester, &values).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(err) => {
            let output = json!({ "data": null, "error": err.message() });
            println!("{}", serde_json::to_string_pretty(&output)?);
            std::process::exit(1);
        }
    }
}
