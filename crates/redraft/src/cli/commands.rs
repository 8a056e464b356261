//! Argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Write edited form values back to the tables a query read from.
#[derive(Parser, Debug)]
#[command(name = "redraft")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "REDRAFT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the UPDATE statement synthesized for a query and mapping
    Synthesize {
        /// Source SELECT query
        #[arg(short, long)]
        query: String,

        /// Column roles as a JSON object, e.g. '{"id": "id", "name": "field"}'
        #[arg(short, long)]
        mapping: String,
    },

    /// Synthesize, bind and execute a write-back against a data source
    Submit {
        /// Engine type identifier (pg, mysql, sqlite, mssql, oracle)
        #[arg(short, long)]
        dialect: String,

        /// JSON file holding the data source's connection settings
        #[arg(long)]
        connection: PathBuf,

        /// Source SELECT query
        #[arg(short, long)]
        query: String,

        /// Column roles as a JSON object
        #[arg(short, long)]
        mapping: String,

        /// Submitted values as a JSON object keyed by column
        #[arg(long)]
        values: String,

        /// Name recorded as the submitting user
        #[arg(long, env = "USER", default_value = "redraft")]
        user: String,
    },
}
