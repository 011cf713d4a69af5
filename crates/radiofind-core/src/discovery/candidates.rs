//! Candidate generation.
//!
//! Builds the ordered list of URLs the resolver will try, in seven priority
//! tiers (see [`CandidateTier`]):
//!
//! 1. the stream hint itself
//! 2. its `https://` form
//! 3. status endpoints and mountpoints on the hint's origin, plus the hint's
//!    first path segment
//! 4. `href`/`src` targets on the homepage
//! 5. bare URLs in the homepage text
//! 6. status endpoints and mountpoints on the homepage's origin
//! 7. `play.`/`stream.`/`radio.`/`live.` subdomains of the homepage domain
//!
//! Tiers 4 to 7 need the homepage document; when it cannot be fetched only
//! tiers 1 to 3 contribute. The result is filtered, deduplicated and capped.

use crate::config::ResolverConfig;
use crate::discovery::extract::{extract_bare_urls, extract_link_targets};
use crate::fetcher::{FetchRequest, Fetcher};
use crate::heuristics::Heuristics;
use crate::types::{Candidate, CandidateKind, CandidateTier, ResolutionRequest};
use crate::urls::{
    bare_domain, dedup_key, first_path_segment, https_variant, is_absolute_http, looks_like_http,
    origin, scheme,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// A fetched homepage: the URL it was finally served from and its text.
#[derive(Debug, Clone)]
pub struct HomepageDocument {
    /// URL after redirects, used as the base for relative links.
    pub base_url: String,
    /// Page text, possibly truncated at the body cap.
    pub html: String,
}

/// Produces the prioritised candidate list for a request.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    fetcher: Fetcher,
    rules: Arc<Heuristics>,
    homepage_timeout: Duration,
    limit: usize,
}

impl CandidateGenerator {
    /// Build a generator sharing `fetcher` and `rules`.
    pub fn new(fetcher: Fetcher, rules: Arc<Heuristics>, config: &ResolverConfig) -> Self {
        Self {
            fetcher,
            rules,
            homepage_timeout: config.homepage_timeout(),
            limit: config.candidate_limit(),
        }
    }

    /// Maximum candidates returned.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Fetch the homepage (at most once) and build the candidate list.
    #[instrument(skip_all, fields(homepage = %request.homepage, stream = %request.stream_hint))]
    pub async fn generate(&self, request: &ResolutionRequest) -> Vec<Candidate> {
        let homepage = self.fetch_homepage(&request.homepage).await;
        let candidates = self.build(request, homepage.as_ref());
        debug!(
            count = candidates.len(),
            homepage_fetched = homepage.is_some(),
            "generated candidates"
        );
        candidates
    }

    /// GET the homepage. `None` when the URL is unusable or the fetch fails.
    pub async fn fetch_homepage(&self, homepage: &str) -> Option<HomepageDocument> {
        if !looks_like_http(homepage) {
            return None;
        }
        match self
            .fetcher
            .fetch_text(&FetchRequest::get(homepage, self.homepage_timeout))
            .await
        {
            Ok(fetched) => Some(HomepageDocument {
                base_url: fetched.response.final_url,
                html: fetched.body,
            }),
            Err(e) => {
                debug!(error = %e, category = e.category(), "homepage fetch failed");
                None
            },
        }
    }

    /// Build the candidate list from the request and an optional homepage.
    ///
    /// Pure: no network access.
    pub fn build(
        &self,
        request: &ResolutionRequest,
        homepage: Option<&HomepageDocument>,
    ) -> Vec<Candidate> {
        let mut raw: Vec<(String, CandidateTier)> = Vec::new();
        let hint = request.stream_hint.as_str();

        if looks_like_http(hint) {
            raw.push((hint.to_string(), CandidateTier::StreamHint));
            if let Some(upgraded) = https_variant(hint) {
                raw.push((upgraded, CandidateTier::HttpsUpgrade));
            }
            if let Some(hint_origin) = origin(hint) {
                self.push_mountpoints(&mut raw, &hint_origin, CandidateTier::HintMountpoint);
                if let Some(segment) = first_path_segment(hint) {
                    raw.push((
                        format!("{hint_origin}/{segment}"),
                        CandidateTier::HintMountpoint,
                    ));
                }
            }
        }

        if let Some(page) = homepage {
            for link in extract_link_targets(&page.html, &page.base_url) {
                raw.push((link, CandidateTier::HomepageLink));
            }
            for url in extract_bare_urls(&page.html) {
                raw.push((url, CandidateTier::HomepageText));
            }
            if let Some(home_origin) = origin(&request.homepage) {
                self.push_mountpoints(&mut raw, &home_origin, CandidateTier::HomepageMountpoint);
            }
            self.push_subdomain_guesses(&mut raw, &request.homepage);
        }

        self.finalize(raw)
    }

    fn push_mountpoints(
        &self,
        raw: &mut Vec<(String, CandidateTier)>,
        base: &str,
        tier: CandidateTier,
    ) {
        let paths = self
            .rules
            .mountpoints()
            .iter()
            .chain(self.rules.status_endpoints());
        for path in paths {
            raw.push((format!("{base}{path}"), tier));
        }
    }

    fn push_subdomain_guesses(&self, raw: &mut Vec<(String, CandidateTier)>, homepage: &str) {
        let (Some(domain), Some(scheme)) = (bare_domain(homepage), scheme(homepage)) else {
            return;
        };
        for prefix in self.rules.subdomain_prefixes() {
            raw.push((
                format!("{scheme}://{prefix}.{domain}/stream"),
                CandidateTier::SubdomainGuess,
            ));
        }
    }

    /// Filter, classify, dedup and cap.
    fn finalize(&self, raw: Vec<(String, CandidateTier)>) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (url, tier) in raw {
            if out.len() >= self.limit {
                break;
            }
            let Some(kind) = self.admit(&url, tier) else {
                continue;
            };
            if seen.insert(dedup_key(&url)) {
                out.push(Candidate { url, kind, tier });
            }
        }
        out
    }

    /// Classify `url` if it passes the filters, `None` otherwise.
    ///
    /// Every candidate must be absolute HTTP(S), free of template syntax and
    /// not junk. Outside the explicit hint tiers, direct candidates must also
    /// look like a stream; status endpoints and playlists always do.
    fn admit(&self, url: &str, tier: CandidateTier) -> Option<CandidateKind> {
        let rules = &self.rules;
        if !is_absolute_http(url) || rules.has_template_placeholder(url) || rules.is_junk(url) {
            return None;
        }
        let kind = rules.classify(url);
        let needs_signature = kind == CandidateKind::Direct && !tier.is_explicit_hint();
        if needs_signature && !rules.is_likely_audio_stream_url(url) {
            return None;
        }
        Some(kind)
    }
}
