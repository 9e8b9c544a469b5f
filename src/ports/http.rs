//! HTTP port for talking to the issue tracker's REST API.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`HttpClient`] to keep the trait dyn-compatible.
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// A single GET request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// Absolute request URL.
    pub url: String,
    /// Header name/value pairs, in the order they are sent.
    pub headers: Vec<(String, String)>,
    /// Upper bound on the whole request, in seconds. `None` uses the transport default.
    pub timeout_secs: Option<u64>,
}

impl HttpRequest {
    /// Creates a request for `url` with no headers and no explicit timeout.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout_secs: None,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Bounds the request by `secs` seconds.
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Transport-level failure. Non-success statuses are *not* errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum HttpError {
    /// The request exceeded its timeout.
    #[error("request timed out")]
    Timeout,
    /// Connection, TLS, or body-read failure.
    #[error("{0}")]
    Transport(String),
}

/// Performs HTTP requests.
///
/// Abstracting HTTP lets the fetcher run against recorded cassettes or
/// in-process fakes instead of the network.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when no response was received.
    fn get(&self, request: &HttpRequest) -> HttpFuture<'_>;
}
