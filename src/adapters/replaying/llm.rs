//! Replaying adapter for the `LlmClient` port.

use std::sync::{Arc, Mutex};

use super::{decode, next_output};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient, LlmError};

/// Serves recorded model replies from a cassette.
///
/// The model and prompt must match the recorded ones, so a changed prompt
/// template shows up as a replay failure instead of a stale reply.
pub struct ReplayingLlmClient {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
}

impl ReplayingLlmClient {
    /// Create a replaying LLM client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self {
            replayer: Some(replayer),
        }
    }

    /// Create a replaying LLM client with no cassette. Panics when called.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let input = serde_json::to_value(request).unwrap_or_default();
        let output = next_output(
            self.replayer.as_ref(),
            "llm",
            "complete",
            &input,
            &["model", "prompt"],
        );
        let result: Result<CompletionResponse, _> = decode(output, LlmError::Malformed);
        Box::pin(async move { result })
    }
}
