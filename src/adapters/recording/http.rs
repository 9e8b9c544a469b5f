//! Recording adapter for the `HttpClient` port.

use std::sync::{Arc, Mutex};

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{HttpClient, HttpFuture, HttpRequest};

/// Records HTTP interactions while delegating to an inner implementation.
///
/// `Authorization` header values are redacted before they reach the cassette.
pub struct RecordingHttpClient {
    inner: Box<dyn HttpClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingHttpClient {
    /// Creates a new recording HTTP client wrapping the given implementation.
    pub fn new(inner: Box<dyn HttpClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

fn redacted(request: &HttpRequest) -> HttpRequest {
    let mut request = request.clone();
    for (name, value) in &mut request.headers {
        if name.eq_ignore_ascii_case("authorization") {
            *value = "<redacted>".to_string();
        }
    }
    request
}

impl HttpClient for RecordingHttpClient {
    fn get(&self, request: &HttpRequest) -> HttpFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let result = self.inner.get(&request).await;
            record_interaction(&self.recorder, "http", "get", &redacted(&request), &result);
            result
        })
    }
}
