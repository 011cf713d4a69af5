//! Liveness probing for candidate stream URLs.
//!
//! A probe answers one question: does this URL serve audio (or a playlist)
//! right now? It is a two-step cascade that short-circuits on success:
//!
//! 1. **HEAD**: accepted on a 2xx status when the content type is an audio or
//!    playlist MIME type, the URL has a playlist extension, or the response
//!    declares a positive `Content-Length`.
//! 2. **Ranged GET** (`Range: bytes=0-2047`): many streaming servers refuse
//!    HEAD but answer a short ranged GET. Accepted on 2xx/206 when the content
//!    type matches or the URL has a playlist extension.
//!
//! The response body is never read, so probing a live stream costs one
//! round-trip and a dropped connection.

use crate::config::ResolverConfig;
use crate::fetcher::{FetchErrorKind, FetchRequest, Fetcher, HttpResponse};
use crate::heuristics::Heuristics;
use crate::types::ProbeResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Which probe step produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStep {
    /// The HEAD request.
    Head,
    /// The ranged GET fallback.
    RangedGet,
}

/// HEAD acceptance rule.
pub fn head_accepts(response: &HttpResponse, url: &str, rules: &Heuristics) -> bool {
    response.is_success()
        && (rules.is_audio_content_type(&response.content_type)
            || rules.is_playlist_url(url)
            || response.content_length.is_some_and(|len| len > 0))
}

/// Ranged GET acceptance rule. 206 is a 2xx, so it is covered by `is_success`.
pub fn range_accepts(response: &HttpResponse, url: &str, rules: &Heuristics) -> bool {
    response.is_success()
        && (rules.is_audio_content_type(&response.content_type) || rules.is_playlist_url(url))
}

/// Probes URLs with the HEAD / ranged-GET cascade.
#[derive(Debug, Clone)]
pub struct Prober {
    fetcher: Fetcher,
    rules: Arc<Heuristics>,
    head_timeout: Duration,
    range_timeout: Duration,
    range: String,
}

impl Prober {
    /// Build a prober sharing `fetcher` and `rules`.
    pub fn new(fetcher: Fetcher, rules: Arc<Heuristics>, config: &ResolverConfig) -> Self {
        Self {
            fetcher,
            rules,
            head_timeout: config.head_timeout(),
            range_timeout: config.range_timeout(),
            range: config.range_header(),
        }
    }

    /// Probe `url`. Network failures count as a negative verdict.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn probe(&self, url: &str) -> ProbeResult {
        match self.probe_step(url).await {
            Some((step, content_type)) => {
                debug!(?step, content_type = %content_type, "probe accepted");
                ProbeResult::accepted(content_type)
            },
            None => {
                debug!("probe rejected");
                ProbeResult::rejected()
            },
        }
    }

    async fn probe_step(&self, url: &str) -> Option<(ProbeStep, String)> {
        match self
            .fetcher
            .request(&FetchRequest::head(url, self.head_timeout))
            .await
        {
            Ok(response) if head_accepts(&response, url, &self.rules) => {
                return Some((ProbeStep::Head, response.content_type));
            },
            Ok(response) => debug!(status = response.status, "HEAD not conclusive"),
            Err(e) => debug!(
                error = %e,
                kind = ?FetchErrorKind::of(&e),
                recoverable = e.is_recoverable(),
                "HEAD failed"
            ),
        }

        let ranged = FetchRequest::get(url, self.range_timeout).range(&self.range);
        match self.fetcher.request(&ranged).await {
            Ok(response) if range_accepts(&response, url, &self.rules) => {
                Some((ProbeStep::RangedGet, response.content_type))
            },
            Ok(response) => {
                debug!(
                    status = response.status,
                    content_type = %response.content_type,
                    "ranged GET not audio"
                );
                None
            },
            Err(e) => {
                debug!(
                    error = %e,
                    kind = ?FetchErrorKind::of(&e),
                    recoverable = e.is_recoverable(),
                    "ranged GET failed"
                );
                None
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prober_with(config: &ResolverConfig) -> Prober {
        Prober::new(
            Fetcher::new(config).unwrap(),
            Arc::new(Heuristics::default()),
            config,
        )
    }

    fn prober() -> Prober {
        prober_with(&ResolverConfig::default())
    }

    fn response(status: u16, content_type: &str, content_length: Option<u64>) -> HttpResponse {
        HttpResponse {
            status,
            content_type: content_type.to_string(),
            content_length,
            final_url: String::new(),
        }
    }

    #[test]
    fn test_head_acceptance_rules() {
        let rules = Heuristics::default();
        let plain = "http://a.com/x";
        assert!(head_accepts(&response(200, "audio/mpeg", None), plain, &rules));
        assert!(head_accepts(&response(200, "text/html", Some(512)), plain, &rules));
        assert!(head_accepts(&response(204, "", None), "http://a.com/x.pls", &rules));
        assert!(!head_accepts(&response(200, "text/html", Some(0)), plain, &rules));
        assert!(!head_accepts(&response(200, "text/html", None), plain, &rules));
        assert!(!head_accepts(&response(404, "audio/mpeg", Some(10)), plain, &rules));
    }

    #[test]
    fn test_range_acceptance_rules() {
        let rules = Heuristics::default();
        let plain = "http://a.com/x";
        assert!(range_accepts(&response(206, "audio/aac", None), plain, &rules));
        assert!(range_accepts(&response(200, "application/ogg", None), plain, &rules));
        assert!(range_accepts(&response(200, "text/plain", None), "http://a.com/a.m3u", &rules));
        assert!(!range_accepts(&response(200, "text/html", Some(2048)), plain, &rules));
        assert!(!range_accepts(&response(416, "audio/aac", None), plain, &rules));
    }

    #[tokio::test]
    async fn test_head_success_short_circuits() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/stream"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "audio/mpeg"))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&mock_server)
            .await;

        let url = format!("{}/stream", mock_server.uri());
        let result = prober().probe(&url).await;
        assert!(result.ok);
        assert_eq!(result.content_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_falls_back_to_ranged_get() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/live"))
            .and(header("range", "bytes=0-2047"))
            .respond_with(ResponseTemplate::new(206).insert_header("content-type", "audio/aacp"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/live", mock_server.uri());
        let result = prober().probe(&url).await;
        assert!(result.ok);
        assert_eq!(result.content_type, "audio/aacp");
    }

    #[tokio::test]
    async fn test_range_size_follows_config() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(header("range", "bytes=0-511"))
            .respond_with(ResponseTemplate::new(206).insert_header("content-type", "audio/mpeg"))
            .mount(&mock_server)
            .await;

        let config = ResolverConfig {
            range_bytes: 512,
            ..ResolverConfig::default()
        };
        let url = format!("{}/live", mock_server.uri());
        assert!(prober_with(&config).probe(&url).await.ok);
    }

    #[tokio::test]
    async fn test_html_page_is_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .set_body_string("<html></html>"),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/stream", mock_server.uri());
        let result = prober().probe(&url).await;
        assert!(!result.ok);
        assert_eq!(result.content_type, "");
    }

    #[tokio::test]
    async fn test_slow_server_is_rejected_within_timeouts() {
        let mock_server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(206)
                    .insert_header("content-type", "audio/mpeg")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let config = ResolverConfig {
            head_timeout_ms: 100,
            range_timeout_ms: 100,
            ..ResolverConfig::default()
        };
        let url = format!("{}/stream", mock_server.uri());
        let started = std::time::Instant::now();
        let result = prober_with(&config).probe(&url).await;
        assert!(!result.ok);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_rejected() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let result = prober()
            .probe(&format!("http://127.0.0.1:{port}/stream"))
            .await;
        assert!(!result.ok);
    }
}
