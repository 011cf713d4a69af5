//! Request, candidate and result types.
//!
//! Everything here lives for one resolution request and is then dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason reported when every candidate failed.
pub const NO_STREAM_REASON: &str = "no_working_stream_found";

/// What the caller knows about a station.
///
/// All fields are untrusted and may be empty or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionRequest {
    /// Station homepage.
    pub homepage: String,
    /// Previously known stream URL, possibly stale or templated.
    #[serde(rename = "stream")]
    pub stream_hint: String,
    /// Free-form label echoed back unchanged.
    pub name: String,
}

impl ResolutionRequest {
    /// Build a request, trimming the two URL fields. `name` is kept verbatim.
    pub fn new(
        homepage: impl AsRef<str>,
        stream_hint: impl AsRef<str>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            homepage: homepage.as_ref().trim().to_string(),
            stream_hint: stream_hint.as_ref().trim().to_string(),
            name: name.into(),
        }
    }

    /// Same request with the URL fields trimmed.
    #[must_use]
    pub fn cleaned(self) -> Self {
        Self::new(&self.homepage, &self.stream_hint, self.name)
    }
}

/// How the orchestrator handles a candidate. Assigned once at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateKind {
    /// Icecast status JSON listing listen URLs.
    StatusEndpoint,
    /// M3U/M3U8/PLS playlist.
    Playlist,
    /// Anything else: probed as a stream.
    Direct,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StatusEndpoint => "status-endpoint",
            Self::Playlist => "playlist",
            Self::Direct => "direct",
        })
    }
}

/// Which generation rule produced a candidate, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateTier {
    /// The stream hint as given.
    StreamHint,
    /// `https://` form of an `http://` stream hint.
    HttpsUpgrade,
    /// Well-known paths on the stream hint's origin.
    HintMountpoint,
    /// `href`/`src` attributes on the homepage.
    HomepageLink,
    /// Bare URLs anywhere in the homepage text.
    HomepageText,
    /// Well-known paths on the homepage's origin.
    HomepageMountpoint,
    /// `play.`, `stream.`, ... prefixed to the homepage domain.
    SubdomainGuess,
}

impl CandidateTier {
    /// 1-based priority rank.
    pub const fn rank(self) -> u8 {
        match self {
            Self::StreamHint => 1,
            Self::HttpsUpgrade => 2,
            Self::HintMountpoint => 3,
            Self::HomepageLink => 4,
            Self::HomepageText => 5,
            Self::HomepageMountpoint => 6,
            Self::SubdomainGuess => 7,
        }
    }

    /// Tiers derived from the caller's own stream hint.
    pub const fn is_explicit_hint(self) -> bool {
        matches!(self, Self::StreamHint | Self::HttpsUpgrade)
    }
}

/// A URL to try, tagged with how to handle it and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Absolute HTTP(S) URL.
    pub url: String,
    /// Dispatch kind.
    pub kind: CandidateKind,
    /// Generation rule.
    pub tier: CandidateTier,
}

/// Verdict of a single probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    /// The URL looks like a live stream or playlist.
    pub ok: bool,
    /// Content type seen on the accepting response, empty on failure.
    pub content_type: String,
}

impl ProbeResult {
    /// Positive verdict.
    pub fn accepted(content_type: impl Into<String>) -> Self {
        Self {
            ok: true,
            content_type: content_type.into(),
        }
    }

    /// Negative verdict.
    pub fn rejected() -> Self {
        Self::default()
    }
}

/// Where a resolved URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionSource {
    /// A candidate that probed OK by itself.
    Direct,
    /// An entry inside a playlist.
    Playlist,
    /// A listen URL from an Icecast status document.
    IcecastStatus,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Playlist => "playlist",
            Self::IcecastStatus => "icecast-status",
        })
    }
}

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// A verified stream was found.
    pub ok: bool,
    /// The verified stream URL.
    pub url: Option<String>,
    /// How the stream URL was found.
    pub source: Option<ResolutionSource>,
    /// Candidates attempted, in order, bounded.
    pub tried_urls: Vec<String>,
    /// Failure reason.
    pub reason: Option<String>,
    /// Echo of the request name.
    pub name: String,
}

impl ResolutionResult {
    /// Successful resolution.
    pub fn found(
        url: impl Into<String>,
        source: ResolutionSource,
        tried_urls: Vec<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            ok: true,
            url: Some(url.into()),
            source: Some(source),
            tried_urls,
            reason: None,
            name: name.into(),
        }
    }

    /// Exhausted candidate list.
    pub fn not_found(tried_urls: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            ok: false,
            url: None,
            source: None,
            tried_urls,
            reason: Some(NO_STREAM_REASON.to_string()),
            name: name.into(),
        }
    }
}

/// Wire form of a resolution, as returned by the CLI and HTTP endpoint.
///
/// ```rust
/// use radiofind_core::{ResolutionResult, ResolutionSource, ResolveResponse};
///
/// let found = ResolutionResult::found("http://a/live", ResolutionSource::Direct, vec![], "A");
/// let json = serde_json::to_value(ResolveResponse::from(found))?;
/// assert_eq!(json["source"], "direct");
/// assert!(json.get("tried").is_none());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    /// `{ok: true, url, source, name}`
    Found {
        /// Always `true`.
        ok: bool,
        /// Verified stream URL.
        url: String,
        /// How it was found.
        source: ResolutionSource,
        /// Echoed label.
        name: String,
    },
    /// `{ok: false, url: null, reason, tried, name}`
    NotFound {
        /// Always `false`.
        ok: bool,
        /// Always `null`.
        url: Option<String>,
        /// Always `no_working_stream_found`.
        reason: String,
        /// Up to 20 attempted URLs, in order.
        tried: Vec<String>,
        /// Echoed label.
        name: String,
    },
    /// `{ok: false, error}` for unexpected internal faults.
    Fault {
        /// Always `false`.
        ok: bool,
        /// Fault message.
        error: String,
    },
}

impl ResolveResponse {
    /// Fault response carrying `message`.
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            ok: false,
            error: message.into(),
        }
    }

    /// True for the fault variant, which boundaries report as a server error.
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }
}

impl From<ResolutionResult> for ResolveResponse {
    fn from(result: ResolutionResult) -> Self {
        match (result.ok, result.url, result.source) {
            (true, Some(url), Some(source)) => Self::Found {
                ok: true,
                url,
                source,
                name: result.name,
            },
            _ => Self::NotFound {
                ok: false,
                url: None,
                reason: result
                    .reason
                    .unwrap_or_else(|| NO_STREAM_REASON.to_string()),
                tried: result.tried_urls,
                name: result.name,
            },
        }
    }
}
