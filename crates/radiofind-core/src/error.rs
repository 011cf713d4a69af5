//! Error types for radiofind-core operations.
//!
//! Resolution itself is best-effort: network failures, malformed playlists and
//! broken status documents are folded into negative outcomes by the component
//! that hit them and never reach the caller. The [`Error`] type therefore shows
//! up in two places:
//!
//! - as the failure half of [`Fetcher`](crate::Fetcher) results, where callers
//!   inspect it (mostly for logging) and move on;
//! - at construction time (invalid configuration, HTTP client setup), where it
//!   is a genuine fault.
//!
//! ## Recovery Hints
//!
//! ```rust
//! use radiofind_core::Error;
//!
//! let err = Error::Timeout("HEAD http://example.com/stream".to_string());
//! assert!(err.is_recoverable());
//! assert_eq!(err.category(), "timeout");
//! ```

use thiserror::Error;

/// The main error type for radiofind-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Network operation failed.
    ///
    /// DNS failures, refused connections, TLS errors and resets all land here.
    /// The underlying `reqwest::Error` is preserved.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request did not complete within its time budget and was aborted.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The server answered with a status the caller cannot use.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Status code returned by the server.
        status: u16,
        /// URL that produced the status.
        url: String,
    },

    /// Configuration or heuristics are invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if the error might go away on a later attempt.
    ///
    /// Timeouts, connection failures and 5xx/429 statuses are considered
    /// transient. Configuration faults and other statuses are permanent.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Config(_) => false,
        }
    }

    /// Get the error category as a static identifier for structured logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::Config(_) => "config",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formatting() {
        assert_eq!(
            Error::Timeout("GET http://a/".into()).to_string(),
            "Timeout: GET http://a/"
        );
        assert_eq!(
            Error::HttpStatus {
                status: 404,
                url: "http://a/stream".into()
            }
            .to_string(),
            "HTTP 404 from http://a/stream"
        );
        assert_eq!(
            Error::Config("bad".into()).to_string(),
            "Configuration error: bad"
        );
    }

    #[test]
    fn test_error_categories() {
        let cases = [
            (Error::Timeout(String::new()), "timeout"),
            (Error::Config(String::new()), "config"),
            (
                Error::HttpStatus {
                    status: 500,
                    url: String::new(),
                },
                "http_status",
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.category(), expected, "category for {error:?}");
        }
    }

    #[test]
    fn test_error_recoverability() {
        assert!(Error::Timeout("t".into()).is_recoverable());
        assert!(
            Error::HttpStatus {
                status: 503,
                url: String::new()
            }
            .is_recoverable()
        );
        assert!(
            Error::HttpStatus {
                status: 429,
                url: String::new()
            }
            .is_recoverable()
        );
        assert!(
            !Error::HttpStatus {
                status: 404,
                url: String::new()
            }
            .is_recoverable()
        );
        assert!(!Error::Config("c".into()).is_recoverable());
    }

    #[test]
    fn test_result_type_alias() {
        fn fails() -> Result<u8> {
            Err(Error::Config("nope".into()))
        }
        assert!(matches!(fails(), Err(Error::Config(_))));
    }
}
