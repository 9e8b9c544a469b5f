//! Live adapter for the `HttpClient` port using `reqwest`.

use std::time::Duration;

use reqwest::Client;

use crate::ports::http::{HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse};

/// Live HTTP client backed by a shared `reqwest` connection pool.
pub struct LiveHttpClient {
    client: Client,
}

impl LiveHttpClient {
    /// Creates a new live HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for LiveHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_error(e: &reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Transport(e.to_string())
    }
}

impl HttpClient for LiveHttpClient {
    fn get(&self, request: &HttpRequest) -> HttpFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let mut builder = self.client.get(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(secs) = request.timeout_secs {
                builder = builder.timeout(Duration::from_secs(secs));
            }

            let response = builder.send().await.map_err(|e| map_error(&e))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| map_error(&e))?;
            Ok(HttpResponse { status, body })
        })
    }
}
