//! Time-bounded HTTP access.
//!
//! [`Fetcher`] is the only component that touches the network. Every request
//! runs under its own hard deadline; when the deadline passes the in-flight
//! request is dropped (which aborts the connection) and the call resolves to
//! [`Error::Timeout`]. Redirects are followed transparently.
//!
//! Callers get a [`Result`] and are expected to fold `Err` into a negative
//! outcome locally. Nothing above this layer treats a network failure as fatal.

use crate::config::ResolverConfig;
use crate::{Error, Result};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RANGE};
use reqwest::{Client, Method, Response, redirect};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// One outgoing request: method, URL, extra headers and a hard timeout.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    method: Method,
    url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl FetchRequest {
    /// A request with an arbitrary method.
    pub fn new(method: Method, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            timeout,
        }
    }

    /// A `HEAD` request.
    pub fn head(url: impl Into<String>, timeout: Duration) -> Self {
        Self::new(Method::HEAD, url, timeout)
    }

    /// A `GET` request.
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self::new(Method::GET, url, timeout)
    }

    /// Add a header. Values that are not valid header text are ignored.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add a `Range` header.
    #[must_use]
    pub fn range(self, value: &str) -> Self {
        self.header(RANGE, value)
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deadline for the whole exchange, body included.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Status line and headers of a response. The body is not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Final status code after redirects.
    pub status: u16,
    /// `Content-Type` header value, empty when absent.
    pub content_type: String,
    /// Declared `Content-Length`, if any.
    pub content_length: Option<u64>,
    /// URL that produced the response, after redirects.
    pub final_url: String,
}

impl HttpResponse {
    /// True for 2xx statuses (206 included).
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    fn from_response(response: &Response) -> Self {
        let headers = response.headers();
        Self {
            status: response.status().as_u16(),
            content_type: headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .unwrap_or_default(),
            content_length: headers
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok()),
            final_url: response.url().to_string(),
        }
    }
}

/// A successful text fetch.
#[derive(Debug, Clone)]
pub struct FetchedText {
    /// Response metadata.
    pub response: HttpResponse,
    /// Body decoded as UTF-8 (lossy), possibly truncated at the body cap.
    pub body: String,
    /// True when the body was cut at the cap.
    pub truncated: bool,
}

/// HTTP client with per-request deadlines and a body-size cap.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_body_bytes: usize,
}

impl Fetcher {
    /// Build a fetcher from resolver settings (user agent, redirects, body cap).
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Send a request and return its status and headers, whatever the status.
    ///
    /// The body is never read; dropping the response closes the connection,
    /// so a live stream answering a probe does not keep downloading.
    pub async fn request(&self, request: &FetchRequest) -> Result<HttpResponse> {
        let response = with_deadline(request, self.build(request).send()).await??;
        let meta = HttpResponse::from_response(&response);
        debug!(
            method = %request.method,
            url = %request.url,
            status = meta.status,
            content_type = %meta.content_type,
            "response"
        );
        Ok(meta)
    }

    /// Fetch a text body. Non-2xx statuses are an [`Error::HttpStatus`].
    ///
    /// At most `max_body_bytes` are read; the rest is discarded. The timeout
    /// covers the body as well as the headers.
    pub async fn fetch_text(&self, request: &FetchRequest) -> Result<FetchedText> {
        let limit = self.max_body_bytes;
        let exchange = async {
            let mut response = self.build(request).send().await?;
            let meta = HttpResponse::from_response(&response);
            if !meta.is_success() {
                return Err(Error::HttpStatus {
                    status: meta.status,
                    url: request.url.clone(),
                });
            }

            let mut bytes: Vec<u8> = Vec::new();
            let mut truncated = false;
            while let Some(chunk) = response.chunk().await? {
                let room = limit.saturating_sub(bytes.len());
                if chunk.len() > room {
                    bytes.extend_from_slice(&chunk[..room]);
                    truncated = true;
                    break;
                }
                bytes.extend_from_slice(&chunk);
            }

            Ok::<_, Error>(FetchedText {
                response: meta,
                body: String::from_utf8_lossy(&bytes).into_owned(),
                truncated,
            })
        };

        let fetched = with_deadline(request, exchange).await??;
        debug!(
            url = %request.url,
            bytes = fetched.body.len(),
            truncated = fetched.truncated,
            "fetched text"
        );
        Ok(fetched)
    }

    fn build(&self, request: &FetchRequest) -> reqwest::RequestBuilder {
        self.client
            .request(request.method.clone(), request.url.as_str())
            .headers(request.headers.clone())
    }
}

/// Run `fut` under the request's deadline.
async fn with_deadline<F: Future>(request: &FetchRequest, fut: F) -> Result<F::Output> {
    tokio::time::timeout(request.timeout, fut)
        .await
        .map_err(|_| {
            debug!(url = %request.url, timeout = ?request.timeout, "timed out");
            Error::Timeout(format!(
                "{} {} after {}ms",
                request.method,
                request.url,
                request.timeout.as_millis()
            ))
        })
}

/// Coarse failure class of a fetch, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Deadline passed.
    Timeout,
    /// DNS, TLS, connection or protocol failure.
    Network,
    /// Server answered with an unusable status.
    Status,
    /// Anything else.
    Other,
}

impl FetchErrorKind {
    /// Classify a fetch error.
    pub fn of(err: &Error) -> Self {
        match err {
            Error::Timeout(_) => Self::Timeout,
            Error::Network(e) if e.is_timeout() => Self::Timeout,
            Error::Network(_) => Self::Network,
            Error::HttpStatus { .. } => Self::Status,
            _ => Self::Other,
        }
    }
}
