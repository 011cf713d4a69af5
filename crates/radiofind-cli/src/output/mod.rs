//! # Output Formatting
//!
//! - **Text**: human-readable, colored when the terminal allows it
//! - **JSON**: the same payloads the HTTP endpoint returns, pretty-printed
//!
//! ```bash
//! radiofind resolve --homepage https://station.example --format json | jq .url
//! ```

mod json;
mod text;

pub use json::print_json;
pub use text::{print_candidates, print_probe, print_response};

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty text output (default on a terminal)
    Text,
    /// Pretty-printed JSON (default when piped)
    Json,
}
