//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;

use serde_json::json;

use triage::cassette::recorder::CassetteRecorder;
use triage::config::Config;

pub const REPO: &str = "https://github.com/acme/widgets";
pub const CACHE_FILE: &str = "https%3A__github.com_acme_widgets_issue_42.json";
pub const ISSUE_URL: &str = "https://api.github.com/repos/acme/widgets/issues/42";
pub const COMMENTS_URL: &str = "https://api.github.com/repos/acme/widgets/issues/42/comments";
pub const ANALYSIS_JSON: &str = r#"{"summary":"The app crashes at launch on v2.1","type":"bug","priority_score":"4 - Blocks startup","suggested_labels":["bug","crash"],"potential_impact":"Users on v2.1 cannot open the app"}"#;

/// Writes a monolithic cassette for issue 42: issue, comments, and one model reply.
///
/// The model reply is recorded for the default model, so replaying it under
/// another `TRIAGE_MODEL` fails.
pub fn write_issue_cassette(path: &Path, issue_status: u16, model_reply: &str) {
    let issue = r#"{"title":"Crash on startup","body":null}"#;
    let comments = r#"[{"body":"Happens on v2.1 only"}]"#;
    let mut recorder = CassetteRecorder::new(path, "acme-widgets-42", "test");
    recorder.record(
        "http",
        "get",
        json!({"url": ISSUE_URL}),
        json!({"Ok": {"status": issue_status, "body": issue}}),
    );
    recorder.record(
        "http",
        "get",
        json!({"url": COMMENTS_URL}),
        json!({"Ok": {"status": 200, "body": comments}}),
    );
    recorder.record(
        "llm",
        "complete",
        json!({"model": Config::default().model}),
        json!({"Ok": {"text": model_reply, "prompt_tokens": 120, "completion_tokens": 40}}),
    );
    recorder.finish().expect("cassette should be written");
}

/// Writes a cassette with no interactions; any port call against it panics.
pub fn write_empty_cassette(path: &Path) {
    CassetteRecorder::new(path, "empty", "test")
        .finish()
        .expect("cassette should be written");
}
