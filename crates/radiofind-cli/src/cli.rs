//! # CLI Structure and Argument Parsing
//!
//! ```bash
//! # Resolve a station from its homepage and a stale stream URL
//! radiofind resolve --homepage https://station.example --stream http://old.example:8000/live
//!
//! # Show what would be tried, without probing
//! radiofind candidates --homepage https://station.example
//!
//! # Check a single URL
//! radiofind probe http://stream.example:8000/live
//!
//! # Run the HTTP endpoint
//! radiofind serve --port 8080
//! ```
//!
//! Output is text on a terminal and JSON when piped; `--format` overrides.

use clap::{Args, Parser, Subcommand};
use radiofind_core::ResolutionRequest;
use std::path::PathBuf;

use crate::utils::cli_args::FormatArg;

/// Main CLI structure for the `radiofind` command
#[derive(Parser, Clone, Debug)]
#[command(name = "radiofind")]
#[command(version)]
#[command(about = "radiofind - resolve playable stream URLs for internet radio stations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to `$RADIOFIND_CONFIG`, then the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the candidate limit for this invocation
    #[arg(long, global = true, value_name = "N")]
    pub max_candidates: Option<usize>,
}

/// Station inputs shared by `resolve` and `candidates`.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct StationArgs {
    /// Station homepage URL
    #[arg(long, default_value = "")]
    pub homepage: String,

    /// Previously known stream URL (may be stale or templated)
    #[arg(long, default_value = "")]
    pub stream: String,

    /// Label echoed back in the response
    #[arg(long, default_value = "")]
    pub name: String,

    #[command(flatten)]
    pub format: FormatArg,
}

impl StationArgs {
    pub fn request(&self) -> ResolutionRequest {
        ResolutionRequest::new(&self.homepage, &self.stream, self.name.clone())
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Find a working stream URL for a station
    Resolve(StationArgs),

    /// Print the candidate list a resolution would try, without probing
    Candidates(StationArgs),

    /// Probe a single URL and report whether it serves audio or a playlist
    Probe {
        /// URL to probe
        url: String,

        #[command(flatten)]
        format: FormatArg,
    },

    /// Serve `GET /api/resolve-stream` over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1", env = "RADIOFIND_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 8080, env = "RADIOFIND_PORT")]
        port: u16,
    },
}
