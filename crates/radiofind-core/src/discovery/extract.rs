//! Link extraction from a station homepage.
//!
//! Two passes over the same document:
//!
//! - [`extract_link_targets`]: `href`/`src` attribute values, resolved against
//!   the page URL.
//! - [`extract_bare_urls`]: absolute URLs anywhere in the text, which catches
//!   stream URLs embedded in inline player scripts and JSON blobs.
//!
//! ```rust
//! use radiofind_core::discovery::extract::{extract_bare_urls, extract_link_targets};
//!
//! let html = r#"<a href="/station.m3u8">Listen</a>
//! <script>player.load("https:\/\/cdn.example.com\/live.aac");</script>"#;
//!
//! let links = extract_link_targets(html, "http://example.com/");
//! assert_eq!(links, vec!["http://example.com/station.m3u8"]);
//!
//! let bare = extract_bare_urls(html);
//! assert_eq!(bare, vec!["https://cdn.example.com/live.aac"]);
//! ```

use crate::urls::{dedup_preserving_order, looks_like_http, strip_trailing_punctuation, to_absolute};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// `href=` / `src=` attributes, double-quoted, single-quoted or bare.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:href|src)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`]+))"#).unwrap()
});

/// Regex for bare URLs
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s<>\[\]"'`(){}|\\^]+"#).unwrap());

/// Decode the handful of entities that show up inside attribute values.
fn decode_entities(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .replace("&amp;", "&")
            .replace("&#38;", "&")
            .replace("&#x2F;", "/")
            .replace("&#47;", "/")
            .replace("&quot;", "\"")
            .replace("&#39;", "'"),
    )
}

/// Every `href`/`src` value in `html`, made absolute against `base`.
///
/// Fragment-only links and non-HTTP schemes (`mailto:`, `javascript:`, ...)
/// are dropped. Output is deduplicated in document order.
pub fn extract_link_targets(html: &str, base: &str) -> Vec<String> {
    let mut out = Vec::new();
    for cap in ATTR_RE.captures_iter(html) {
        let Some(raw) = cap.get(1).or_else(|| cap.get(2)).or_else(|| cap.get(3)) else {
            continue;
        };
        let value = decode_entities(raw.as_str().trim());
        if value.is_empty() || value.starts_with('#') {
            continue;
        }
        if let Some(absolute) = to_absolute(base, &value) {
            if looks_like_http(&absolute) {
                out.push(absolute);
            }
        }
    }
    dedup_preserving_order(out)
}

/// Absolute HTTP(S) URLs anywhere in `text`, trailing punctuation stripped.
///
/// JSON-escaped slashes (`https:\/\/host\/path`) are unescaped first.
pub fn extract_bare_urls(text: &str) -> Vec<String> {
    let text: Cow<'_, str> = if text.contains("\\/") {
        Cow::Owned(text.replace("\\/", "/"))
    } else {
        Cow::Borrowed(text)
    };

    let found = BARE_URL_RE
        .find_iter(&text)
        .map(|m| decode_entities(strip_trailing_punctuation(m.as_str())).into_owned())
        .filter(|u| to_absolute("", u).is_some())
        .collect::<Vec<_>>();
    dedup_preserving_order(found)
}
