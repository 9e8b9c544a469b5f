//! Live adapter for the `LlmClient` port using the Gemini `generateContent` API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::llm::{
    CompletionFuture, CompletionRequest, CompletionResponse, LlmClient, LlmError,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const PROVIDER: &str = "Gemini";

/// Live LLM client that calls Google Gemini.
///
/// A missing key is not checked here; the API rejects the call instead.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
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
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    // Thinking tokens count against `maxOutputTokens` on 2.5 models, so the
    // limit is only sent when one is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: UsageMetadata,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

fn request_body(request: &CompletionRequest) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part {
                text: &request.prompt,
            }],
        }],
        generation_config: request
            .max_tokens
            .map(|max_output_tokens| GenerationConfig { max_output_tokens }),
    }
}

fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api {
        provider: PROVIDER.to_string(),
        status,
        message,
    }
}

fn transport(e: reqwest::Error) -> LlmError {
    LlmError::Transport(format!("Gemini API request failed: {e}"))
}

fn malformed(e: serde_json::Error) -> LlmError {
    LlmError::Malformed(format!("Failed to parse Gemini API response: {e}"))
}

fn no_text(reason: Option<String>) -> LlmError {
    LlmError::NoText {
        provider: PROVIDER.to_string(),
        reason: reason.unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Joins the text parts of the first candidate.
///
/// A reply only counts when it has text and finished normally. Blocked
/// prompts, safety stops, and replies cut off by the token limit are errors.
fn completion(response: GenerateResponse) -> Result<CompletionResponse, LlmError> {
    let GenerateResponse {
        candidates,
        prompt_feedback,
        usage_metadata,
    } = response;

    let Some(candidate) = candidates.into_iter().next() else {
        return Err(no_text(prompt_feedback.and_then(|f| f.block_reason)));
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .map(|part| part.text)
        .collect();
    let finished = matches!(candidate.finish_reason.as_deref(), None | Some("STOP"));
    if text.trim().is_empty() || !finished {
        return Err(no_text(candidate.finish_reason));
    }

    Ok(CompletionResponse {
        text,
        prompt_tokens: usage_metadata.prompt_token_count,
        completion_tokens: usage_metadata.candidates_token_count,
    })
}

impl LlmClient for GeminiClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let url = format!("{GEMINI_API_BASE}/{}:generateContent", request.model);

            let mut builder = self.client.post(&url).json(&request_body(&request));
            if let Some(key) = &self.api_key {
                builder = builder.header("x-goog-api-key", key);
            }

            let response = builder.send().await.map_err(transport)?;
            let status = response.status();
            let body = response.text().await.map_err(transport)?;

            if !status.is_success() {
                return Err(api_error(status.as_u16(), body));
            }

            let parsed: GenerateResponse = serde_json::from_str(&body).map_err(malformed)?;
            completion(parsed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(max_tokens: Option<u32>) -> CompletionRequest {
        CompletionRequest {
            model: "gemini-2.5-flash".into(),
            prompt: "hi".into(),
            max_tokens,
        }
    }

    fn parse(raw: &str) -> Result<CompletionResponse, LlmError> {
        completion(serde_json::from_str(raw).unwrap())
    }

    fn rejected(raw: &str) -> LlmError {
        parse(raw).unwrap_err()
    }

    #[test]
    fn request_body_omits_token_limit_by_default() {
        let value = serde_json::to_value(request_body(&request(None))).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn request_body_sends_configured_limit_in_camel_case() {
        let value = serde_json::to_value(request_body(&request(Some(64)))).unwrap();
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 64);
    }

    #[test]
    fn joins_parts_of_first_candidate() {
        let response = parse(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
            }"#,
        )
        .unwrap();
        assert_eq!(response.text, "{\"a\":1}");
        assert_eq!(response.prompt_tokens, 12);
        assert_eq!(response.completion_tokens, 3);
    }

    #[test]
    fn blocked_reply_is_an_error() {
        let err = rejected(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert_eq!(
            err.to_string(),
            "Gemini returned no text (finishReason: SAFETY)"
        );
    }

    #[test]
    fn reply_cut_off_by_thinking_tokens_is_an_error() {
        let err = rejected(
            r#"{
                "candidates": [{"finishReason": "MAX_TOKENS", "content": {"role": "model"}}],
                "usageMetadata": {"promptTokenCount": 300, "thoughtsTokenCount": 1023}
            }"#,
        );
        assert_eq!(
            err,
            LlmError::NoText {
                provider: "Gemini".into(),
                reason: "MAX_TOKENS".into(),
            }
        );
    }

    #[test]
    fn truncated_text_is_not_passed_on() {
        let err = rejected(
            r#"{"candidates": [{
                "finishReason": "MAX_TOKENS",
                "content": {"parts": [{"text": "{\"summary\": \"Crash"}]}
            }]}"#,
        );
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn blocked_prompt_reports_block_reason() {
        let err = rejected(r#"{"promptFeedback":{"blockReason":"OTHER"}}"#);
        assert_eq!(
            err.to_string(),
            "Gemini returned no text (finishReason: OTHER)"
        );
    }

    #[test]
    fn api_error_prefers_structured_message() {
        let err = api_error(
            403,
            r#"{"error":{"code":403,"message":"denied","status":"PERMISSION_DENIED"}}"#.into(),
        );
        assert_eq!(err.to_string(), "Gemini API error (403): denied");

        let err = api_error(502, "Bad Gateway".into());
        assert_eq!(err.to_string(), "Gemini API error (502): Bad Gateway");
    }
}
