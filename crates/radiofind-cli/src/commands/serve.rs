//! Serve command implementation

use anyhow::{Context, Result};
use radiofind_core::Resolver;
use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

use crate::server;
use crate::utils::settings::Overrides;

/// Run the HTTP endpoint until interrupted.
pub async fn execute(overrides: &Overrides, host: &str, port: u16) -> Result<ExitCode> {
    let resolver = Resolver::new(&overrides.load()?)?;
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("Invalid host address '{host}'"))?;
    server::serve(resolver, SocketAddr::new(ip, port)).await?;
    Ok(ExitCode::SUCCESS)
}
