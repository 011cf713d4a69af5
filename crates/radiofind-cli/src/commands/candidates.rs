//! Candidates command implementation

use anyhow::Result;
use radiofind_core::{ResolutionRequest, Resolver};
use std::process::ExitCode;

use crate::output::{OutputFormat, print_candidates, print_json};
use crate::utils::settings::Overrides;

/// Print the tagged candidate list for a request without probing it.
pub async fn execute(
    overrides: &Overrides,
    request: ResolutionRequest,
    format: OutputFormat,
) -> Result<ExitCode> {
    let resolver = Resolver::new(&overrides.load()?)?;
    let candidates = resolver.candidates(&request).await;

    match format {
        OutputFormat::Text => print_candidates(&candidates),
        OutputFormat::Json => print_json(&candidates)?,
    }
    Ok(ExitCode::SUCCESS)
}
