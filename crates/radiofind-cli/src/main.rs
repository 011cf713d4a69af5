//! radiofind CLI - resolve a playable stream URL for an internet radio station.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    radiofind_cli::run().await
}
