//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod run;
mod status;
mod validate;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a pipeline definition
    Run {
        /// Path to a pipeline definition JSON file
        definition: PathBuf,

        /// Write status snapshots to this file as the run progresses
        #[arg(long, env = "CASCADE_STATUS_PATH")]
        status_out: Option<PathBuf>,

        /// Run parameters as key=value pairs, exported to every stage
        #[arg(short, long, value_parser = parse_key_val)]
        param: Vec<(String, String)>,

        /// Keep executing remaining stages after a stage fails
        #[arg(long)]
        continue_on_error: bool,

        /// Default stage timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Pretty-print a published status snapshot
    Status {
        /// Path to a status snapshot JSON file
        path: PathBuf,
    },
    /// Validate a pipeline definition
    Validate {
        /// Path to a pipeline definition JSON file
        path: PathBuf,
    },
}

/// Parse a single key=value pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            definition,
            status_out,
            param,
            continue_on_error,
            timeout,
        } => run::handle_run(&definition, status_out, param, continue_on_error, timeout).await,
        Commands::Status { path } => status::handle_status(&path),
        Commands::Validate { path } => validate::handle_validate(&path),
    }
}
