//! End-to-end resolution.
//!
//! [`Resolver::resolve`] walks the candidate list strictly in order, one
//! network call at a time, and stops at the first URL that passes a live
//! probe:
//!
//! - **status endpoint**: fetch the Icecast status JSON, probe each listen URL
//! - **playlist**: probe the playlist, parse it, probe the first few entries
//! - **direct**: probe the URL itself
//!
//! No URL is probed twice within one resolution. Failures of every kind
//! (network, malformed content, malformed input) just move on to the next
//! candidate; the caller always gets a [`ResolutionResult`].
//!
//! ```no_run
//! use radiofind_core::{Config, ResolutionRequest, Resolver};
//!
//! # async fn example() -> radiofind_core::Result<()> {
//! let resolver = Resolver::new(&Config::load()?)?;
//! let result = resolver
//!     .resolve(ResolutionRequest::new("https://station.example", "", "Example FM"))
//!     .await;
//! if let Some(url) = result.url {
//!     println!("play {url}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::{Config, ResolverConfig};
use crate::discovery::{CandidateGenerator, Prober};
use crate::fetcher::Fetcher;
use crate::heuristics::Heuristics;
use crate::icecast::fetch_listen_urls;
use crate::playlist::fetch_playlist;
use crate::types::{
    Candidate, CandidateKind, ProbeResult, ResolutionRequest, ResolutionResult, ResolutionSource,
};
use crate::urls::{dedup_key, dedup_preserving_order, looks_like_http};
use crate::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Per-request bookkeeping, owned by one `resolve` call.
#[derive(Debug, Default)]
struct Attempt {
    tried: Vec<String>,
    probed: HashSet<String>,
}

/// Resolves a station to a verified stream URL.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: ResolverConfig,
    rules: Arc<Heuristics>,
    fetcher: Fetcher,
    generator: CandidateGenerator,
    prober: Prober,
}

impl Resolver {
    /// Build a resolver. Fails only on invalid configuration or HTTP client setup.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let rules = Arc::new(Heuristics::from_config(&config.heuristics)?);
        let fetcher = Fetcher::new(&config.resolver)?;
        debug!(heuristics_version = rules.version(), "resolver ready");
        Ok(Self {
            config: config.resolver.clone(),
            generator: CandidateGenerator::new(fetcher.clone(), rules.clone(), &config.resolver),
            prober: Prober::new(fetcher.clone(), rules.clone(), &config.resolver),
            rules,
            fetcher,
        })
    }

    /// Candidate generator used by this resolver.
    pub const fn generator(&self) -> &CandidateGenerator {
        &self.generator
    }

    /// Prober used by this resolver.
    pub const fn prober(&self) -> &Prober {
        &self.prober
    }

    /// Heuristic rule set in use.
    pub fn heuristics(&self) -> &Heuristics {
        &self.rules
    }

    /// Generate the candidate list for a request without probing anything.
    pub async fn candidates(&self, request: &ResolutionRequest) -> Vec<Candidate> {
        self.generator.generate(&request.clone().cleaned()).await
    }

    /// Resolve a request. Never fails: "nothing found" is a normal result.
    #[instrument(skip_all, fields(homepage = %request.homepage, stream = %request.stream_hint))]
    pub async fn resolve(&self, request: ResolutionRequest) -> ResolutionResult {
        let request = request.cleaned();
        let candidates = self.generator.generate(&request).await;
        let mut attempt = Attempt::default();

        for candidate in &candidates {
            attempt.tried.push(candidate.url.clone());
            debug!(
                url = %candidate.url,
                kind = %candidate.kind,
                tier = candidate.tier.rank(),
                "trying"
            );

            let url = candidate.url.as_str();
            let found = match candidate.kind {
                CandidateKind::StatusEndpoint => self.try_status_endpoint(url, &mut attempt).await,
                CandidateKind::Playlist => self.try_playlist(url, &mut attempt).await,
                CandidateKind::Direct => self.try_direct(url, &mut attempt).await,
            };

            if let Some((url, source)) = found {
                info!(url = %url, %source, attempts = attempt.tried.len(), "resolved stream");
                let tried = self.bounded_tried(attempt.tried);
                return ResolutionResult::found(url, source, tried, request.name);
            }
        }

        info!(
            candidates = candidates.len(),
            probed = attempt.probed.len(),
            "no working stream found"
        );
        ResolutionResult::not_found(self.bounded_tried(attempt.tried), request.name)
    }

    async fn try_direct(
        &self,
        url: &str,
        attempt: &mut Attempt,
    ) -> Option<(String, ResolutionSource)> {
        let verdict = self.probe_once(url, attempt).await?;
        verdict
            .ok
            .then(|| (url.to_string(), ResolutionSource::Direct))
    }

    async fn try_playlist(
        &self,
        url: &str,
        attempt: &mut Attempt,
    ) -> Option<(String, ResolutionSource)> {
        let verdict = self.probe_once(url, attempt).await?;
        if !verdict.ok {
            return None;
        }

        let entries = fetch_playlist(
            &self.fetcher,
            &self.rules,
            url,
            self.config.playlist_timeout(),
        )
        .await;
        for entry in entries.into_iter().take(self.config.playlist_entry_limit()) {
            if let Some(verdict) = self.probe_once(&entry, attempt).await {
                if verdict.ok {
                    return Some((entry, ResolutionSource::Playlist));
                }
            }
        }
        None
    }

    async fn try_status_endpoint(
        &self,
        url: &str,
        attempt: &mut Attempt,
    ) -> Option<(String, ResolutionSource)> {
        let listen = fetch_listen_urls(&self.fetcher, url, self.config.status_timeout()).await;
        let listen = dedup_preserving_order(
            listen
                .iter()
                .filter(|u| looks_like_http(u) && !self.rules.has_template_placeholder(u)),
        );

        for listen_url in listen.into_iter().take(self.config.max_listen_urls) {
            if let Some(verdict) = self.probe_once(&listen_url, attempt).await {
                if verdict.ok {
                    return Some((listen_url, ResolutionSource::IcecastStatus));
                }
            }
        }
        None
    }

    /// Probe `url` unless it was already probed in this resolution.
    async fn probe_once(&self, url: &str, attempt: &mut Attempt) -> Option<ProbeResult> {
        if !attempt.probed.insert(dedup_key(url)) {
            debug!(url, "already probed");
            return None;
        }
        Some(self.prober.probe(url).await)
    }

    fn bounded_tried(&self, mut tried: Vec<String>) -> Vec<String> {
        tried.truncate(self.config.tried_limit());
        tried
    }
}
