//! Language-model port used by the analyzer.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`LlmClient`] to keep the trait dyn-compatible.
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

/// One single-turn, non-streaming completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Triage prompt sent as the only user turn.
    pub prompt: String,
    /// Output token limit. `None` leaves the limit to the provider where the
    /// API allows it.
    pub max_tokens: Option<u32>,
}

/// Text of a finished completion plus token accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Concatenated text parts of the reply.
    pub text: String,
    /// Prompt tokens billed.
    pub prompt_tokens: u32,
    /// Output tokens billed.
    pub completion_tokens: u32,
}

/// Why a completion produced no usable reply.
///
/// Serializable so recorded failures replay as the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LlmError {
    /// The request never got a response, or the response could not be read.
    #[error("{0}")]
    Transport(String),
    /// The provider answered with a non-success status.
    #[error("{provider} API error ({status}): {message}")]
    Api {
        /// Provider name, e.g. `Gemini`.
        provider: String,
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body when it has none.
        message: String,
    },
    /// The reply was blocked, cut off, or empty.
    #[error("{provider} returned no text (finishReason: {reason})")]
    NoText {
        /// Provider name.
        provider: String,
        /// Provider finish/stop reason, `unknown` when absent.
        reason: String,
    },
    /// The success body did not have the provider's documented shape.
    #[error("{0}")]
    Malformed(String),
}

/// Sends completion requests to a language model.
pub trait LlmClient: Send + Sync {
    /// Generates a completion for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] when no usable text came back.
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_>;
}
