//! Icecast `status-json.xsl` parsing.
//!
//! Icecast reports its mounts as `{"icestats": {"source": ...}}` where
//! `source` is a single object when one mount is live and an array otherwise.
//! Some proxies strip the `icestats` wrapper, so the root object is accepted
//! too.

use crate::fetcher::{FetchRequest, Fetcher};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    // Arrays first: `T` may itself accept an array.
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// One mount entry. Unknown fields are ignored; non-string values are skipped.
#[derive(Debug, Default, Deserialize)]
struct Source {
    #[serde(default)]
    listenurl: Option<Value>,
    #[serde(default)]
    url: Option<Value>,
}

impl Source {
    fn listen_url(&self) -> Option<String> {
        let pick = |v: &Option<Value>| {
            v.as_ref()
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        pick(&self.listenurl).or_else(|| pick(&self.url))
    }
}

/// Extract listen URLs from a status document.
///
/// Each source contributes `listenurl`, or `url` when `listenurl` is absent
/// or empty. Malformed documents yield an empty list.
///
/// ```rust
/// use radiofind_core::icecast::extract_listen_urls;
///
/// let body = r#"{"icestats":{"source":[{"listenurl":"http://a:8000/hi"},{"url":"http://a:8000/lo"}]}}"#;
/// assert_eq!(extract_listen_urls(body), vec!["http://a:8000/hi", "http://a:8000/lo"]);
/// assert!(extract_listen_urls("<html>").is_empty());
/// ```
pub fn extract_listen_urls(body: &str) -> Vec<String> {
    let Ok(document) = serde_json::from_str::<Value>(body) else {
        return Vec::new();
    };
    let stats = document.get("icestats").unwrap_or(&document);
    let Some(source) = stats.get("source") else {
        return Vec::new();
    };

    // A malformed entry (say, a bare string inside the array) only loses
    // itself, not its siblings.
    let entries: Vec<Value> = match serde_json::from_value::<OneOrMany<Value>>(source.clone()) {
        Ok(entries) => entries.into_vec(),
        Err(_) => return Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<Source>(entry).ok())
        .filter_map(|source| source.listen_url())
        .collect()
}

/// Fetch a status document and extract its listen URLs.
///
/// Fetch failures yield an empty list.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_listen_urls(fetcher: &Fetcher, url: &str, timeout: Duration) -> Vec<String> {
    match fetcher.fetch_text(&FetchRequest::get(url, timeout)).await {
        Ok(fetched) => {
            let urls = extract_listen_urls(&fetched.body);
            debug!(listen_urls = urls.len(), "parsed status document");
            urls
        },
        Err(e) => {
            debug!(error = %e, category = e.category(), "status fetch failed");
            Vec::new()
        },
    }
}
