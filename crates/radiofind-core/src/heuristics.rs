//! Heuristic rule set shared by candidate generation and probing.
//!
//! Which links on a station homepage are worth probing, which URLs are asset
//! junk, which MIME types count as "audio" and which URLs still contain
//! unresolved template syntax are all empirical judgements. They live here as
//! one versioned, serde-configurable table ([`HeuristicsConfig`]) that is
//! compiled once into [`Heuristics`] and injected wherever a decision is made.
//!
//! ```rust
//! use radiofind_core::Heuristics;
//!
//! let rules = Heuristics::default();
//! assert!(rules.is_playlist_url("http://example.com/live.m3u8"));
//! assert!(rules.is_junk("http://example.com/logo.png"));
//! assert!(rules.is_likely_audio_stream_url("http://example.com:8000/"));
//! assert!(rules.has_template_placeholder("http://example.com/${station}/stream"));
//! ```

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::CandidateKind;
use crate::{Error, Result};

/// Version of the built-in rule set. Bump when the defaults change.
pub const RULESET_VERSION: u32 = 3;

/// File extensions of static assets that never serve audio.
const DEFAULT_JUNK_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "ico", "bmp", "avif", "css", "js", "mjs", "map",
    "json", "xml", "rss", "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "woff",
    "woff2", "ttf", "eot", "otf", "txt", "csv",
];

/// Site sections that hold editorial pages rather than streams.
const DEFAULT_JUNK_SECTIONS: &[&str] = &[
    "news",
    "blog",
    "event",
    "events",
    "program",
    "programs",
    "programme",
    "programmes",
    "artist",
    "artists",
    "video",
    "videos",
    "music",
    "article",
    "articles",
];

const DEFAULT_PLAYLIST_EXTENSIONS: &[&str] = &["m3u", "m3u8", "pls"];

const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["mp3", "aac", "aacp", "ogg", "oga", "opus", "flac"];

/// Substrings that streaming servers commonly put in mountpoint URLs.
const DEFAULT_STREAM_MARKERS: &[&str] = &[
    "/stream",
    "/listen",
    "/live",
    "/radio",
    "icecast",
    "shoutcast",
];

const DEFAULT_AUDIO_MIME_TYPES: &[&str] = &[
    "audio/",
    "application/ogg",
    "application/x-mpegurl",
    "application/vnd.apple.mpegurl",
];

/// Fragments of unresolved templating syntax (`${var}`, `{{var}}`, `<%= %>`).
const DEFAULT_TEMPLATE_MARKERS: &[&str] = &[
    "${", "{{", "}}", "{", "}", "%7b", "%7d", "<%", "%>", "[[", "]]",
];

/// Well-known mountpoints tried on a known streaming origin.
const DEFAULT_MOUNTPOINTS: &[&str] = &["/stream", "/listen", "/live", "/;"];

/// Icecast status documents that list every mount with its listen URL.
const DEFAULT_STATUS_ENDPOINTS: &[&str] = &["/status-json.xsl", "/status-json"];

/// Host prefixes stations use for a dedicated streaming box.
const DEFAULT_SUBDOMAIN_PREFIXES: &[&str] = &["play", "stream", "radio", "live"];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Serializable heuristic rule set, the `[heuristics]` section of the config file.
///
/// Every list replaces (not extends) the built-in default when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Rule set version, reported in logs so tuned deployments can be told apart.
    pub version: u32,
    /// Asset extensions (without dot) that mark a URL as junk.
    pub junk_extensions: Vec<String>,
    /// Path sections (without slashes) that mark a URL as an editorial page.
    pub junk_sections: Vec<String>,
    /// Playlist extensions (without dot).
    pub playlist_extensions: Vec<String>,
    /// Audio file extensions (without dot) that make a URL look like a stream.
    pub audio_extensions: Vec<String>,
    /// Case-insensitive substrings that make a URL look like a stream.
    pub stream_markers: Vec<String>,
    /// Content-type prefixes accepted as audio or playlist content.
    pub audio_mime_types: Vec<String>,
    /// Case-insensitive fragments of unresolved template syntax.
    pub template_markers: Vec<String>,
    /// Mountpoint paths appended to a streaming origin.
    pub mountpoints: Vec<String>,
    /// Icecast status document paths appended to a streaming origin.
    pub status_endpoints: Vec<String>,
    /// Subdomain prefixes combined with the homepage host.
    pub subdomain_prefixes: Vec<String>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            version: RULESET_VERSION,
            junk_extensions: owned(DEFAULT_JUNK_EXTENSIONS),
            junk_sections: owned(DEFAULT_JUNK_SECTIONS),
            playlist_extensions: owned(DEFAULT_PLAYLIST_EXTENSIONS),
            audio_extensions: owned(DEFAULT_AUDIO_EXTENSIONS),
            stream_markers: owned(DEFAULT_STREAM_MARKERS),
            audio_mime_types: owned(DEFAULT_AUDIO_MIME_TYPES),
            template_markers: owned(DEFAULT_TEMPLATE_MARKERS),
            mountpoints: owned(DEFAULT_MOUNTPOINTS),
            status_endpoints: owned(DEFAULT_STATUS_ENDPOINTS),
            subdomain_prefixes: owned(DEFAULT_SUBDOMAIN_PREFIXES),
        }
    }
}

impl HeuristicsConfig {
    /// Reject rule sets that would make resolution impossible.
    pub fn validate(&self) -> Result<()> {
        if self.playlist_extensions.is_empty() {
            return Err(Error::Config(
                "heuristics.playlist_extensions must not be empty".into(),
            ));
        }
        if self.audio_mime_types.is_empty() {
            return Err(Error::Config(
                "heuristics.audio_mime_types must not be empty".into(),
            ));
        }
        for path in self.mountpoints.iter().chain(&self.status_endpoints) {
            if !path.starts_with('/') {
                return Err(Error::Config(format!(
                    "heuristics path '{path}' must start with '/'"
                )));
            }
        }
        Ok(())
    }
}

/// Compiled form of [`HeuristicsConfig`].
#[derive(Debug, Clone)]
pub struct Heuristics {
    version: u32,
    junk_extension: Option<Regex>,
    junk_section: Option<Regex>,
    playlist_extension: Regex,
    audio_extension: Option<Regex>,
    stream_marker: Option<Regex>,
    audio_mime: Regex,
    template_marker: Option<Regex>,
    mountpoints: Vec<String>,
    status_endpoints: Vec<String>,
    subdomain_prefixes: Vec<String>,
}

/// `(?:a|b|c)` over escaped literals, or `None` for an empty list.
fn alternation(items: &[String]) -> Option<String> {
    let parts: Vec<String> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(regex::escape)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(format!("(?:{})", parts.join("|")))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Config(format!("invalid heuristic pattern: {e}")))
}

/// Matches a dotted extension at the end of the path, before any query or fragment.
fn extension_regex(extensions: &[String]) -> Result<Option<Regex>> {
    alternation(extensions)
        .map(|alt| compile(&format!(r"\.{alt}(?:[?#]|$)")))
        .transpose()
}

impl Heuristics {
    /// Compile a rule set.
    pub fn from_config(config: &HeuristicsConfig) -> Result<Self> {
        config.validate()?;

        let playlist_extension = extension_regex(&config.playlist_extensions)?.ok_or_else(|| {
            Error::Config("heuristics.playlist_extensions must not be blank".into())
        })?;
        let audio_mime = alternation(&config.audio_mime_types)
            .map(|alt| compile(&alt))
            .transpose()?
            .ok_or_else(|| Error::Config("heuristics.audio_mime_types must not be blank".into()))?;
        let junk_section = alternation(&config.junk_sections)
            .map(|alt| compile(&format!(r"/{alt}(?:[/?#]|$)")))
            .transpose()?;

        Ok(Self {
            version: config.version,
            junk_extension: extension_regex(&config.junk_extensions)?,
            junk_section,
            playlist_extension,
            audio_extension: extension_regex(&config.audio_extensions)?,
            stream_marker: alternation(&config.stream_markers)
                .map(|alt| compile(&alt))
                .transpose()?,
            audio_mime,
            template_marker: alternation(&config.template_markers)
                .map(|alt| compile(&alt))
                .transpose()?,
            mountpoints: config.mountpoints.clone(),
            status_endpoints: config.status_endpoints.clone(),
            subdomain_prefixes: config.subdomain_prefixes.clone(),
        })
    }

    /// Rule set version this instance was compiled from.
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Mountpoint paths tried on a streaming origin.
    pub fn mountpoints(&self) -> &[String] {
        &self.mountpoints
    }

    /// Icecast status document paths tried on a streaming origin.
    pub fn status_endpoints(&self) -> &[String] {
        &self.status_endpoints
    }

    /// Subdomain prefixes combined with a homepage host.
    pub fn subdomain_prefixes(&self) -> &[String] {
        &self.subdomain_prefixes
    }

    /// True if `u` is a static asset or an editorial page section.
    pub fn is_junk(&self, u: &str) -> bool {
        let ext = self.junk_extension.as_ref().is_some_and(|re| re.is_match(u));
        let section = self.junk_section.as_ref().is_some_and(|re| re.is_match(u));
        ext || section
    }

    /// True if `u` points at an M3U/M3U8/PLS playlist.
    pub fn is_playlist_url(&self, u: &str) -> bool {
        self.playlist_extension.is_match(u)
    }

    /// True if `u` is an Icecast status document.
    pub fn is_status_endpoint(&self, u: &str) -> bool {
        let path = strip_query_and_fragment(u);
        self.status_endpoints
            .iter()
            .any(|endpoint| path.ends_with(endpoint.as_str()))
    }

    /// True if `u` carries any stream signature.
    ///
    /// Signatures: a playlist or audio extension, a stream marker (`/stream`,
    /// `icecast`, ...), an explicit non-default port, or a Shoutcast-style
    /// trailing `;`.
    pub fn is_likely_audio_stream_url(&self, u: &str) -> bool {
        if self.is_playlist_url(u) {
            return true;
        }
        if self.audio_extension.as_ref().is_some_and(|re| re.is_match(u)) {
            return true;
        }
        if self.stream_marker.as_ref().is_some_and(|re| re.is_match(u)) {
            return true;
        }
        if strip_query_and_fragment(u).ends_with(';') {
            return true;
        }
        has_explicit_port(u)
    }

    /// True if `u` still contains unresolved template syntax.
    pub fn has_template_placeholder(&self, u: &str) -> bool {
        self.template_marker
            .as_ref()
            .is_some_and(|re| re.is_match(u))
    }

    /// True if a `Content-Type` header value denotes audio or a playlist.
    pub fn is_audio_content_type(&self, content_type: &str) -> bool {
        !content_type.is_empty() && self.audio_mime.is_match(content_type)
    }

    /// Classify a candidate URL once, at generation time.
    pub fn classify(&self, u: &str) -> CandidateKind {
        if self.is_status_endpoint(u) {
            CandidateKind::StatusEndpoint
        } else if self.is_playlist_url(u) {
            CandidateKind::Playlist
        } else {
            CandidateKind::Direct
        }
    }
}

impl Default for Heuristics {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        // The built-in tables are constants and always compile.
        Self::from_config(&HeuristicsConfig::default()).expect("built-in heuristics compile")
    }
}

fn strip_query_and_fragment(u: &str) -> &str {
    u.split(['?', '#']).next().unwrap_or(u)
}

/// `Url::port` is `None` when the port equals the scheme default, so any
/// `Some` is a non-standard, explicitly chosen port.
fn has_explicit_port(u: &str) -> bool {
    Url::parse(u).is_ok_and(|url| url.port().is_some())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rules() -> Heuristics {
        Heuristics::default()
    }

    #[test]
    fn test_junk_extensions() {
        let r = rules();
        assert!(r.is_junk("http://example.com/img/logo.png"));
        assert!(r.is_junk("http://example.com/app.min.js?v=3"));
        assert!(r.is_junk("http://example.com/style.CSS#top"));
        assert!(!r.is_junk("http://example.com/stream.mp3"));
        assert!(!r.is_junk("http://example.com/status-json.xsl"));
    }

    #[test]
    fn test_junk_sections() {
        let r = rules();
        assert!(r.is_junk("http://example.com/news/2024/01/story"));
        assert!(r.is_junk("http://example.com/blog"));
        assert!(r.is_junk("http://example.com/programs?day=mon"));
        assert!(r.is_junk("http://example.com/artists/foo"));
        assert!(!r.is_junk("http://example.com/newsletter-stream"));
        assert!(!r.is_junk("http://example.com/live"));
    }

    #[test]
    fn test_playlist_detection() {
        let r = rules();
        assert!(r.is_playlist_url("http://example.com/a.m3u"));
        assert!(r.is_playlist_url("http://example.com/a.M3U8?token=1"));
        assert!(r.is_playlist_url("http://example.com/listen.pls#x"));
        assert!(!r.is_playlist_url("http://example.com/a.m3u.html"));
        assert!(!r.is_playlist_url("http://example.com/plsfoo"));
    }

    #[test]
    fn test_status_endpoint_detection() {
        let r = rules();
        assert!(r.is_status_endpoint("http://example.com/status-json.xsl"));
        assert!(r.is_status_endpoint("http://example.com:8000/status-json"));
        assert!(r.is_status_endpoint("http://example.com/status-json.xsl?mount=/live"));
        assert!(!r.is_status_endpoint("http://example.com/status-json.xsl/other"));
    }

    #[test]
    fn test_likely_audio_signatures() {
        let r = rules();
        assert!(r.is_likely_audio_stream_url("http://example.com/stream"));
        assert!(r.is_likely_audio_stream_url("http://example.com/listen/high"));
        assert!(r.is_likely_audio_stream_url("https://icecast.example.com/x"));
        assert!(r.is_likely_audio_stream_url("http://sc.example.com/;"));
        assert!(r.is_likely_audio_stream_url("http://r.example.com:8010/x"));
        assert!(r.is_likely_audio_stream_url("http://cdn.example.com/abc.aac"));
        assert!(r.is_likely_audio_stream_url("http://example.com/station.pls"));
        assert!(!r.is_likely_audio_stream_url("http://example.com/contact"));
        assert!(!r.is_likely_audio_stream_url("https://example.com:443/about"));
    }

    #[test]
    fn test_template_placeholders() {
        let r = rules();
        assert!(r.has_template_placeholder("http://example.com/${id}/stream"));
        assert!(r.has_template_placeholder("http://example.com/{{mount}}"));
        assert!(r.has_template_placeholder("http://example.com/%7Bmount%7D"));
        assert!(r.has_template_placeholder("http://example.com/<%= mount %>"));
        assert!(!r.has_template_placeholder("http://example.com/stream?a=1&b=2"));
    }

    #[test]
    fn test_audio_content_types() {
        let r = rules();
        assert!(r.is_audio_content_type("audio/mpeg"));
        assert!(r.is_audio_content_type("Audio/AAC; charset=binary"));
        assert!(r.is_audio_content_type("application/ogg"));
        assert!(r.is_audio_content_type("application/vnd.apple.mpegurl"));
        assert!(r.is_audio_content_type("application/x-mpegURL"));
        assert!(!r.is_audio_content_type("text/html; charset=utf-8"));
        assert!(!r.is_audio_content_type(""));
    }

    #[test]
    fn test_classify() {
        let r = rules();
        assert_eq!(
            r.classify("http://a.com/status-json.xsl"),
            CandidateKind::StatusEndpoint
        );
        assert_eq!(r.classify("http://a.com/x.pls"), CandidateKind::Playlist);
        assert_eq!(r.classify("http://a.com/stream"), CandidateKind::Direct);
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let config = HeuristicsConfig {
            junk_sections: vec!["shop".into()],
            stream_markers: Vec::new(),
            ..HeuristicsConfig::default()
        };
        let r = Heuristics::from_config(&config).unwrap();
        assert!(r.is_junk("http://example.com/shop/cart"));
        assert!(!r.is_junk("http://example.com/news/today"));
        assert!(!r.is_likely_audio_stream_url("http://example.com/stream"));
    }

    #[test]
    fn test_validate_rejects_bad_rules() {
        let empty_playlists = HeuristicsConfig {
            playlist_extensions: Vec::new(),
            ..HeuristicsConfig::default()
        };
        assert!(matches!(
            Heuristics::from_config(&empty_playlists),
            Err(Error::Config(_))
        ));

        let relative_mount = HeuristicsConfig {
            mountpoints: vec!["stream".into()],
            ..HeuristicsConfig::default()
        };
        assert!(relative_mount.validate().is_err());
    }

    #[test]
    fn test_heuristics_config_toml_roundtrip() {
        let config = HeuristicsConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: HeuristicsConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);

        let partial: HeuristicsConfig = toml::from_str("version = 7").unwrap();
        assert_eq!(partial.version, 7);
        assert_eq!(partial.mountpoints, owned(DEFAULT_MOUNTPOINTS));
    }
}
