//! redraft command-line front end.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, SubmitArgs, handle_submit_command, handle_synthesize_command};
use redraft::{RedraftConfig, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = RedraftConfig::load(cli.config.as_deref())?;
    init_tracing(&config)?;
    info!(config_file = ?cli.config, "Starting redraft");

    match cli.command {
        Commands::Synthesize { query, mapping } => handle_synthesize_command(&query, &mapping),
        Commands::Submit {
            dialect,
            connection,
            query,
            mapping,
            values,
            user,
        } => {
            let args = SubmitArgs {
                dialect: &dialect,
                connection: &connection,
                query: &query,
                mapping: &mapping,
                values: &values,
                user: &user,
            };
            handle_submit_command(&config, args).await
        }
    }
}
