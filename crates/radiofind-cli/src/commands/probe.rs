//! Probe command implementation

use anyhow::Result;
use radiofind_core::Resolver;
use serde_json::json;
use std::process::ExitCode;

use crate::output::{OutputFormat, print_json, print_probe};
use crate::utils::settings::Overrides;

/// Probe one URL. Exits `0` when it looks like a stream, `2` when it does not.
pub async fn execute(overrides: &Overrides, url: &str, format: OutputFormat) -> Result<ExitCode> {
    let resolver = Resolver::new(&overrides.load()?)?;
    let url = url.trim();
    let result = resolver.prober().probe(url).await;

    match format {
        OutputFormat::Text => print_probe(url, &result),
        OutputFormat::Json => print_json(&json!({
            "url": url,
            "ok": result.ok,
            "contentType": result.content_type,
        }))?,
    }

    Ok(if result.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}
