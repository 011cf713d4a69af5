//! M3U/M3U8 and PLS playlist parsing.
//!
//! ```rust
//! use radiofind_core::Heuristics;
//! use radiofind_core::playlist::parse_playlist_text;
//!
//! let pls = "[playlist]\nNumberOfEntries=2\nFile1=http://a.example/hi\nFile2=http://a.example/lo\n";
//! let urls = parse_playlist_text("http://example.com/listen", pls, &Heuristics::default());
//! assert_eq!(urls, vec!["http://a.example/hi", "http://a.example/lo"]);
//! ```

use crate::fetcher::{FetchRequest, Fetcher};
use crate::heuristics::Heuristics;
use crate::urls::{dedup_preserving_order, looks_like_http};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument};

/// Playlist dialects we understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistFormat {
    /// One entry per line, `#` comments, optional `#EXTM3U` header.
    M3u,
    /// INI-style `[playlist]` with `FileN=` keys.
    Pls,
}

/// `FileN=value` with the value trimmed.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static PLS_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*File\d+[ \t]*=[ \t]*(.*?)[ \t]*\r?$").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static PLS_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[playlist\]").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static M3U_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.m3u8?(?:[?#]|$)").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static PLS_EXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\.pls(?:[?#]|$)").unwrap());

/// Decide the playlist dialect from the body first, then the URL extension.
pub fn detect_format(url: &str, body: &str) -> Option<PlaylistFormat> {
    let head = body.trim_start_matches('\u{feff}').trim_start();
    let starts_m3u = head
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("#EXTM3U"));

    if starts_m3u {
        Some(PlaylistFormat::M3u)
    } else if PLS_HEADER_RE.is_match(body) {
        Some(PlaylistFormat::Pls)
    } else if M3U_EXT_RE.is_match(url) {
        Some(PlaylistFormat::M3u)
    } else if PLS_EXT_RE.is_match(url) {
        Some(PlaylistFormat::Pls)
    } else {
        None
    }
}

/// Extract inner stream URLs from a playlist body.
///
/// Only absolute HTTP(S) entries without template placeholders are kept.
/// Output is deduplicated in order. Unknown formats yield nothing.
pub fn parse_playlist_text(url: &str, body: &str, rules: &Heuristics) -> Vec<String> {
    let Some(format) = detect_format(url, body) else {
        debug!(url, "unrecognised playlist format");
        return Vec::new();
    };

    let entries: Vec<&str> = match format {
        PlaylistFormat::M3u => body
            .lines()
            .map(|line| line.trim_start_matches('\u{feff}').trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect(),
        PlaylistFormat::Pls => PLS_FILE_RE
            .captures_iter(body)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().trim())
            .collect(),
    };

    let usable = entries
        .into_iter()
        .filter(|entry| looks_like_http(entry))
        .filter(|entry| !rules.has_template_placeholder(entry));
    dedup_preserving_order(usable)
}

/// Fetch a playlist and extract its inner stream URLs.
///
/// Any fetch failure (timeout, network error, non-2xx) yields an empty list.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_playlist(
    fetcher: &Fetcher,
    rules: &Heuristics,
    url: &str,
    timeout: Duration,
) -> Vec<String> {
    match fetcher.fetch_text(&FetchRequest::get(url, timeout)).await {
        Ok(fetched) => {
            let entries = parse_playlist_text(url, &fetched.body, rules);
            debug!(entries = entries.len(), "parsed playlist");
            entries
        },
        Err(e) => {
            debug!(error = %e, category = e.category(), "playlist fetch failed");
            Vec::new()
        },
    }
}
