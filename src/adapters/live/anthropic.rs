//! Live adapter for the `LlmClient` port using the Anthropic messages API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::llm::{
    CompletionFuture, CompletionRequest, CompletionResponse, LlmClient, LlmError,
};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PROVIDER: &str = "Anthropic";
/// The messages API requires a limit; used when none is configured.
const FALLBACK_MAX_TOKENS: u32 = 1024;

/// Live LLM client that calls the Anthropic messages API.
///
/// A missing key is not checked here; the API rejects the call instead.
pub struct AnthropicClient {
    client: Client,
    api_key: Option<String>,
}

impl AnthropicClient {
    /// Creates a client authenticating with `api_key`.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<Block>,
    stop_reason: Option<String>,
    usage: Usage,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Block {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn request_body(request: &CompletionRequest) -> MessagesRequest<'_> {
    MessagesRequest {
        model: &request.model,
        max_tokens: request.max_tokens.unwrap_or(FALLBACK_MAX_TOKENS),
        messages: [Message {
            role: "user",
            content: &request.prompt,
        }],
    }
}

fn transport(e: reqwest::Error) -> LlmError {
    LlmError::Transport(format!("Anthropic API request failed: {e}"))
}

fn malformed(e: serde_json::Error) -> LlmError {
    LlmError::Malformed(format!("Failed to parse Anthropic API response: {e}"))
}

fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api {
        provider: PROVIDER.to_string(),
        status,
        message,
    }
}

/// Joins the text blocks of a reply that ended on its own.
fn completion(response: MessagesResponse) -> Result<CompletionResponse, LlmError> {
    let text: String = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            Block::Text { text } => Some(text),
            Block::Other => None,
        })
        .collect();
    let finished = matches!(
        response.stop_reason.as_deref(),
        None | Some("end_turn" | "stop_sequence")
    );
    if text.trim().is_empty() || !finished {
        return Err(LlmError::NoText {
            provider: PROVIDER.to_string(),
            reason: response.stop_reason.unwrap_or_else(|| "unknown".to_string()),
        });
    }

    Ok(CompletionResponse {
        text,
        prompt_tokens: response.usage.input_tokens,
        completion_tokens: response.usage.output_tokens,
    })
}

impl LlmClient for AnthropicClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let mut builder = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&request_body(&request));
            if let Some(key) = &self.api_key {
                builder = builder.header("x-api-key", key);
            }

            let response = builder.send().await.map_err(transport)?;
            let status = response.status();
            let body = response.text().await.map_err(transport)?;

            if !status.is_success() {
                return Err(api_error(status.as_u16(), body));
            }

            let parsed: MessagesResponse = serde_json::from_str(&body).map_err(malformed)?;
            completion(parsed)
        })
    }
}
