//! Replaying adapter for the `HttpClient` port.

use std::sync::{Arc, Mutex};

use super::{decode, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse};

/// Serves recorded tracker responses from a cassette.
///
/// The request URL must match the recorded one. Headers are not compared
/// since recordings redact credentials.
pub struct ReplayingHttpClient {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
}

impl ReplayingHttpClient {
    /// Create a replaying HTTP client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self {
            replayer: Some(replayer),
        }
    }

    /// Create a replaying HTTP client with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl HttpClient for ReplayingHttpClient {
    fn get(&self, request: &HttpRequest) -> HttpFuture<'_> {
        let input = serde_json::json!({ "url": request.url });
        let output = next_output(self.replayer.as_ref(), "http", "get", &input, &["url"]);
        let result: Result<HttpResponse, _> = decode(output, HttpError::Transport);
        Box::pin(async move { result })
    }
}
