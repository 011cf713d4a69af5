//! radiofind CLI - resolve a playable stream URL for an internet radio station.
//!
//! The binary is a thin boundary around [`radiofind_core::Resolver`]: it turns
//! flags or query strings into a [`radiofind_core::ResolutionRequest`] and
//! prints (or serves) the resulting JSON contract.
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;
pub mod server;
mod utils;

use cli::{Cli, Commands};
use utils::initialize_logging;

/// Execute the radiofind CLI with the current process arguments.
///
/// # Errors
///
/// Returns an error if logging cannot be initialised or a command hits an I/O
/// failure. Resolution faults are reported on stdout with exit code 1 instead.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;
    execute_command(cli).await
}

async fn execute_command(cli: Cli) -> Result<ExitCode> {
    let overrides = utils::settings::Overrides {
        config: cli.config.clone(),
        max_candidates: cli.max_candidates,
    };

    match cli.command {
        Commands::Resolve(args) => {
            let format = args.format.resolve();
            commands::resolve(&overrides, args.request(), format).await
        },
        Commands::Candidates(args) => {
            let format = args.format.resolve();
            commands::list_candidates(&overrides, args.request(), format).await
        },
        Commands::Probe { url, format } => {
            commands::probe_url(&overrides, &url, format.resolve()).await
        },
        Commands::Serve { host, port } => commands::serve(&overrides, &host, port).await,
    }
}
