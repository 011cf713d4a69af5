//! URL helpers: absolutisation, scheme checks, origins and order-preserving dedup.
//!
//! None of these functions fail loudly. Malformed input yields `None` (or is
//! dropped from a sequence) and the caller treats it as absent.

use std::collections::HashSet;
use url::{Host, Url};

/// Resolve `href` against `base`, returning an absolute URL string.
///
/// An already-absolute `href` is returned in normalised form even when `base`
/// is empty or malformed. Returns `None` for anything that does not resolve.
///
/// ```rust
/// use radiofind_core::urls::to_absolute;
///
/// assert_eq!(
///     to_absolute("http://example.com/radio/", "../live.m3u").as_deref(),
///     Some("http://example.com/live.m3u")
/// );
/// assert_eq!(
///     to_absolute("", "https://cdn.example.com/a.aac").as_deref(),
///     Some("https://cdn.example.com/a.aac")
/// );
/// assert_eq!(to_absolute("not a url", "/x"), None);
/// ```
pub fn to_absolute(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }
    let base = Url::parse(base.trim()).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

/// True iff `u` starts with `http://` or `https://`, ignoring case.
pub fn looks_like_http(u: &str) -> bool {
    let bytes = u.as_bytes();
    let starts_with = |prefix: &str| {
        bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    };
    starts_with("http://") || starts_with("https://")
}

/// True iff `u` parses as an absolute HTTP(S) URL with a host.
pub fn is_absolute_http(u: &str) -> bool {
    parse_http(u).is_some_and(|url| url.host().is_some())
}

/// Key used for duplicate detection.
///
/// Parsable URLs compare by their `url::Url` serialisation (lowercased
/// scheme and host, default port dropped, empty path made `/`), anything else
/// by its trimmed text.
pub fn dedup_key(u: &str) -> String {
    let trimmed = u.trim();
    Url::parse(trimmed).map_or_else(|_| trimmed.to_string(), |url| url.to_string())
}

/// Stable dedup: keeps the first occurrence of each URL and drops blanks.
///
/// The first-seen spelling is kept verbatim.
///
/// ```rust
/// use radiofind_core::urls::dedup_preserving_order;
///
/// let out = dedup_preserving_order([
///     "http://Example.com/stream",
///     "",
///     "http://example.com:80/stream",
///     "http://example.com/live",
/// ]);
/// assert_eq!(out, vec!["http://Example.com/stream", "http://example.com/live"]);
/// ```
pub fn dedup_preserving_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(dedup_key(item)) {
            out.push(item.to_string());
        }
    }
    out
}

/// The `https://` form of an `http://` URL, preserving the rest verbatim.
pub fn https_variant(u: &str) -> Option<String> {
    let u = u.trim();
    match (u.get(..7), u.get(7..)) {
        (Some(scheme), Some(rest)) if scheme.eq_ignore_ascii_case("http://") && !rest.is_empty() => {
            Some(format!("https://{rest}"))
        },
        _ => None,
    }
}

/// `scheme://host[:port]` of an absolute HTTP(S) URL.
pub fn origin(u: &str) -> Option<String> {
    let url = parse_http(u)?;
    let origin = url.origin();
    origin
        .is_tuple()
        .then(|| origin.ascii_serialization())
}

/// Scheme of an absolute HTTP(S) URL (`"http"` or `"https"`).
pub fn scheme(u: &str) -> Option<String> {
    parse_http(u).map(|url| url.scheme().to_string())
}

/// First non-empty path segment, e.g. `"radio1"` for `http://h/radio1/hi.mp3`.
pub fn first_path_segment(u: &str) -> Option<String> {
    let url = parse_http(u)?;
    let segment = url.path_segments()?.next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Host with a leading `www.` removed. `None` for IP hosts and non-HTTP URLs.
pub fn bare_domain(u: &str) -> Option<String> {
    let url = parse_http(u)?;
    match url.host()? {
        Host::Domain(domain) => {
            let domain = domain.strip_prefix("www.").unwrap_or(domain);
            if domain.is_empty() {
                None
            } else {
                Some(domain.to_string())
            }
        },
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}

/// Strip punctuation that prose or script syntax leaves glued to a URL.
///
/// A trailing `;` is kept: it is the Shoutcast mountpoint convention.
pub fn strip_trailing_punctuation(u: &str) -> &str {
    u.trim_end_matches(['.', ',', ':', ')', ']', '}', '!', '?', '\'', '"', '\\'])
}

fn parse_http(u: &str) -> Option<Url> {
    let url = Url::parse(u.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
