//! Configuration for the resolver.
//!
//! Configuration is stored in TOML and every field has a default, so an empty
//! or partial file is valid. Lookup order:
//!
//! 1. `$RADIOFIND_CONFIG` if set
//! 2. `config.toml` in the platform config directory
//! 3. Built-in defaults
//!
//! ## Example Configuration File
//!
//! ```toml
//! [resolver]
//! head_timeout_ms = 4000
//! max_candidates = 40
//! user_agent = "my-player/1.0"
//!
//! [heuristics]
//! version = 4
//! subdomain_prefixes = ["play", "stream", "radio", "live", "listen"]
//! ```
//!
//! ```rust
//! use radiofind_core::Config;
//!
//! let config: Config = toml::from_str("[resolver]\nmax_candidates = 40")?;
//! assert_eq!(config.resolver.max_candidates, 40);
//! assert_eq!(config.resolver.range_bytes, 2048);
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::heuristics::HeuristicsConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "RADIOFIND_CONFIG";

/// Upper bound on candidates kept before probing, whatever the config says.
pub const MAX_CANDIDATES_CAP: usize = 70;

/// Upper bound on `tried` URLs reported back to the caller.
pub const MAX_TRIED_CAP: usize = 20;

/// Allowed range for inner playlist entries probed per playlist.
pub const PLAYLIST_ENTRIES_RANGE: (usize, usize) = (10, 14);

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timeouts and bounds for the resolution pipeline
    pub resolver: ResolverConfig,
    /// Heuristic rule set for candidate filtering and probing
    pub heuristics: HeuristicsConfig,
}

/// Timeouts and bounds for one resolution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Timeout for the Prober's HEAD request.
    pub head_timeout_ms: u64,
    /// Timeout for the Prober's ranged GET fallback.
    pub range_timeout_ms: u64,
    /// Timeout for fetching a playlist body.
    pub playlist_timeout_ms: u64,
    /// Timeout for fetching an Icecast status document.
    pub status_timeout_ms: u64,
    /// Timeout for fetching the station homepage.
    pub homepage_timeout_ms: u64,
    /// Bytes requested by the ranged GET (`Range: bytes=0-{range_bytes - 1}`).
    pub range_bytes: u64,
    /// Candidates kept before probing starts. Capped at [`MAX_CANDIDATES_CAP`].
    pub max_candidates: usize,
    /// Inner playlist URLs probed per playlist. Clamped to [`PLAYLIST_ENTRIES_RANGE`].
    pub max_playlist_entries: usize,
    /// Listen URLs probed per Icecast status document.
    pub max_listen_urls: usize,
    /// Tried URLs reported in a failure response. Capped at [`MAX_TRIED_CAP`].
    pub max_tried: usize,
    /// Largest text body (homepage, playlist, status JSON) read into memory.
    pub max_body_bytes: usize,
    /// Redirects followed per request.
    pub max_redirects: usize,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            head_timeout_ms: 5_500,
            range_timeout_ms: 7_000,
            playlist_timeout_ms: 8_000,
            status_timeout_ms: 6_000,
            homepage_timeout_ms: 9_000,
            range_bytes: 2_048,
            max_candidates: 60,
            max_playlist_entries: 12,
            max_listen_urls: 20,
            max_tried: MAX_TRIED_CAP,
            max_body_bytes: 1024 * 1024,
            max_redirects: 10,
            user_agent: concat!("radiofind/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ResolverConfig {
    /// HEAD probe timeout.
    pub const fn head_timeout(&self) -> Duration {
        Duration::from_millis(self.head_timeout_ms)
    }

    /// Ranged GET probe timeout.
    pub const fn range_timeout(&self) -> Duration {
        Duration::from_millis(self.range_timeout_ms)
    }

    /// Playlist fetch timeout.
    pub const fn playlist_timeout(&self) -> Duration {
        Duration::from_millis(self.playlist_timeout_ms)
    }

    /// Status document fetch timeout.
    pub const fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    /// Homepage fetch timeout.
    pub const fn homepage_timeout(&self) -> Duration {
        Duration::from_millis(self.homepage_timeout_ms)
    }

    /// `max_candidates` after applying the hard cap.
    pub fn candidate_limit(&self) -> usize {
        self.max_candidates.min(MAX_CANDIDATES_CAP)
    }

    /// `max_playlist_entries` clamped into the allowed range.
    pub fn playlist_entry_limit(&self) -> usize {
        let (lo, hi) = PLAYLIST_ENTRIES_RANGE;
        self.max_playlist_entries.clamp(lo, hi)
    }

    /// `max_tried` after applying the hard cap.
    pub fn tried_limit(&self) -> usize {
        self.max_tried.min(MAX_TRIED_CAP)
    }

    /// `Range` header value for the fallback probe.
    pub fn range_header(&self) -> String {
        format!("bytes=0-{}", self.range_bytes.saturating_sub(1))
    }
}

impl Config {
    /// Load configuration from `$RADIOFIND_CONFIG`, the platform config
    /// directory, or defaults, in that order.
    ///
    /// A missing file yields defaults. A file that exists but cannot be read or
    /// parsed is an error.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load_from(Path::new(&path)),
            _ => match Self::config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load and validate configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            heuristics_version = config.heuristics.version,
            "loaded config"
        );
        Ok(config)
    }

    /// Platform config file location, if the platform has one.
    ///
    /// - Linux: `~/.config/radiofind/config.toml`
    /// - macOS: `~/Library/Application Support/dev.radiofind.radiofind/config.toml`
    /// - Windows: `%APPDATA%\radiofind\radiofind\config\config.toml`
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "radiofind", "radiofind")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reject configurations that cannot resolve anything.
    pub fn validate(&self) -> Result<()> {
        let r = &self.resolver;
        let timeouts = [
            ("head_timeout_ms", r.head_timeout_ms),
            ("range_timeout_ms", r.range_timeout_ms),
            ("playlist_timeout_ms", r.playlist_timeout_ms),
            ("status_timeout_ms", r.status_timeout_ms),
            ("homepage_timeout_ms", r.homepage_timeout_ms),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(Error::Config(format!("resolver.{name} must be positive")));
            }
        }
        if r.range_bytes == 0 {
            return Err(Error::Config("resolver.range_bytes must be positive".into()));
        }
        if r.max_candidates == 0 {
            return Err(Error::Config(
                "resolver.max_candidates must be positive".into(),
            ));
        }
        if r.max_body_bytes == 0 {
            return Err(Error::Config(
                "resolver.max_body_bytes must be positive".into(),
            ));
        }
        if r.user_agent.trim().is_empty() {
            return Err(Error::Config("resolver.user_agent must not be empty".into()));
        }
        self.heuristics.validate()
    }
}
