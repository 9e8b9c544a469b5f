//! Turns an [`Issue`] into an [`Analysis`] with one language-model call.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::TriageError;
use crate::ports::{CompletionRequest, LlmClient};
use crate::record::{Analysis, Issue, IssueType};

/// Fields a model reply must contain.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "summary",
    "type",
    "priority_score",
    "suggested_labels",
    "potential_impact",
];

const EMPTY_BODY: &str = "No description provided";
const EMPTY_COMMENTS: &str = "No comments yet";

/// Sends issues to a model and normalizes its replies.
pub struct IssueAnalyzer<'a> {
    llm: &'a dyn LlmClient,
    model: String,
    max_tokens: Option<u32>,
}

impl<'a> IssueAnalyzer<'a> {
    /// Creates an analyzer that calls `model` through `llm`.
    ///
    /// `max_tokens` of `None` leaves the reply limit to the provider.
    pub fn new(llm: &'a dyn LlmClient, model: impl Into<String>, max_tokens: Option<u32>) -> Self {
        Self {
            llm,
            model: model.into(),
            max_tokens,
        }
    }

    /// Analyzes one issue.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Model`] when the model call fails, and the
    /// errors of [`parse_analysis`] when its reply is unusable.
    pub async fn analyze(&self, issue: &Issue) -> Result<Analysis, TriageError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: build_prompt(issue),
            max_tokens: self.max_tokens,
        };
        let response = self
            .llm
            .complete(&request)
            .await
            .map_err(|e| TriageError::Model(e.to_string()))?;
        debug!(
            prompt_tokens = response.prompt_tokens,
            completion_tokens = response.completion_tokens,
            "model replied"
        );
        parse_analysis(&response.text)
    }
}

/// Builds the triage prompt for `issue`.
#[must_use]
pub fn build_prompt(issue: &Issue) -> String {
    let body = or_placeholder(&issue.body, EMPTY_BODY);
    let comments = or_placeholder(&issue.comments, EMPTY_COMMENTS);
    let types = IssueType::ALL.map(IssueType::as_str).join(", ");

    format!(
        r#"You triage GitHub issues for a software team.

Read the issue below and answer with a single JSON object and nothing else:
no prose, no markdown, no code fences.

{{
  "summary": "One sentence stating the core problem or request",
  "type": "One of: {types}",
  "priority_score": "A score from 1 to 5 followed by a short justification, e.g. \"4 - Breaks a core workflow\"",
  "suggested_labels": ["label-one", "label-two"],
  "potential_impact": "One sentence on the user or business impact"
}}

Issue:
---
Title: {title}

Body:
{body}

Comments:
{comments}
---

Rules:
1. Output only the JSON object.
2. "type" must be exactly one of: {types}.
3. "priority_score" must be a string that starts with a digit from 1 to 5.
4. When the issue says little, infer from the title and comments.
5. Keep labels short, specific, and lowercase.

JSON:"#,
        title = issue.title,
    )
}

fn or_placeholder<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    if text.trim().is_empty() {
        placeholder
    } else {
        text
    }
}

/// Removes a leading code fence (with optional language tag) and its closing fence.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || "-_".contains(c));
    let inner = rest.find("```").map_or(rest, |end| &rest[..end]);
    inner.trim()
}

/// Parses and validates a raw model reply.
///
/// # Errors
///
/// - [`TriageError::Parse`] if the reply is not JSON.
/// - [`TriageError::IncompleteResponse`] if it is not an object with every
///   field in [`REQUIRED_FIELDS`].
/// - [`TriageError::InvalidAnalysis`] if a field has the wrong shape, `type` is
///   outside the enum, or `priority_score` does not start with 1-5.
pub fn parse_analysis(text: &str) -> Result<Analysis, TriageError> {
    let value: Value =
        serde_json::from_str(strip_code_fence(text)).map_err(|_| TriageError::Parse)?;
    let Value::Object(mut object) = value else {
        return Err(TriageError::IncompleteResponse);
    };
    if !REQUIRED_FIELDS.iter().all(|field| object.contains_key(*field)) {
        return Err(TriageError::IncompleteResponse);
    }

    let fields: Map<String, Value> = REQUIRED_FIELDS
        .iter()
        .filter_map(|field| object.remove_entry(*field))
        .collect();
    let analysis: Analysis = serde_json::from_value(Value::Object(fields))
        .map_err(|e| TriageError::InvalidAnalysis(e.to_string()))?;

    if !starts_with_priority_digit(&analysis.priority_score) {
        return Err(TriageError::InvalidAnalysis(format!(
            "priority_score must start with a digit from 1 to 5, got {:?}",
            analysis.priority_score
        )));
    }
    Ok(analysis)
}

fn starts_with_priority_digit(score: &str) -> bool {
    let mut chars = score.trim_start().chars();
    let leading = matches!(chars.next(), Some('1'..='5'));
    leading && !chars.next().is_some_and(|c| c.is_ascii_digit())
}
