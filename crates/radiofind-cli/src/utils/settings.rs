//! Configuration loading with per-invocation overrides.

use anyhow::{Context, Result};
use radiofind_core::Config;
use std::path::PathBuf;

/// Values from global flags that override the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub max_candidates: Option<usize>,
}

impl Overrides {
    /// Load the configuration and apply the overrides.
    ///
    /// An explicit `--config` path must exist; otherwise the usual lookup
    /// (`$RADIOFIND_CONFIG`, platform config dir, defaults) applies.
    pub fn load(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load().context("Failed to load config")?,
        };

        if let Some(max) = self.max_candidates {
            config.resolver.max_candidates = max;
        }

        config.validate()?;
        Ok(config)
    }
}
