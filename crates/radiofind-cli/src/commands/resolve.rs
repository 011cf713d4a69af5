//! Resolve command implementation

use anyhow::Result;
use radiofind_core::{ResolutionRequest, ResolveResponse, Resolver};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

use crate::output::{OutputFormat, print_json, print_response};
use crate::server::resolve_guarded;
use crate::utils::settings::Overrides;

/// Execute the resolve command.
///
/// Exits `0` whether or not a stream was found and `1` on an internal fault,
/// including a configuration that cannot build a resolver.
pub async fn execute(
    overrides: &Overrides,
    request: ResolutionRequest,
    format: OutputFormat,
) -> Result<ExitCode> {
    let built = overrides
        .load()
        .and_then(|config| Resolver::new(&config).map_err(anyhow::Error::from));
    let response = match built {
        Ok(resolver) => resolve_guarded(Arc::new(resolver), request).await,
        Err(e) => {
            error!(error = %format!("{e:#}"), "cannot build resolver");
            ResolveResponse::fault(format!("{e:#}"))
        },
    };

    match format {
        OutputFormat::Text => print_response(&response),
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(if response.is_fault() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
