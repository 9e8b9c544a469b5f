//! Record-replay round trip through the whole pipeline.
//!
//! 1. Run the pipeline with recording adapters wrapped around in-process fakes.
//! 2. Replay the per-port cassettes with a fresh cache.
//! 3. Assert the replayed record equals the recorded one.

mod common;

use std::sync::Arc;

use common::{write_issue_cassette, ANALYSIS_JSON, REPO};
use triage::adapters::memory::MemoryStore;
use triage::adapters::recording::{RecordingHttpClient, RecordingLlmClient};
use triage::cassette::config::CassetteConfig;
use triage::cassette::format::Cassette;
use triage::cassette::session::RecordingSession;
use triage::config::Config;
use triage::context::ServiceContext;
use triage::pipeline::Triage;
use triage::AnalysisRecord;

#[tokio::test]
async fn recorded_run_replays_identically() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.cassette.yaml");
    write_issue_cassette(&source, 200, ANALYSIS_JSON);
    let config = Config::default();

    // --- Phase 1: record, with a replayed "network" standing in for live services ---
    let session = RecordingSession::new(dir.path().join("recorded")).unwrap();
    let upstream = ServiceContext::replaying(&source).unwrap();
    let http = RecordingHttpClient::new(upstream.http, Arc::clone(&session.http));
    let llm = RecordingLlmClient::new(upstream.llm, Arc::clone(&session.llm));
    let recording = ServiceContext {
        http: Box::new(http),
        llm: Box::new(llm),
        store: Box::new(MemoryStore::default()),
    };
    let recorded = Triage::new(&recording, &config).run(REPO, 42, false).await;
    assert!(recorded.is_success());
    drop(recording);
    let out_dir = session.finish().unwrap();

    let http = Cassette::load(&out_dir.join("http.cassette.yaml")).unwrap();
    assert_eq!(http.interactions.len(), 2);
    let url = &http.interactions[1].input["url"];
    assert!(url.as_str().unwrap().ends_with("/comments"));
    let llm = Cassette::load(&out_dir.join("llm.cassette.yaml")).unwrap();
    let input = &llm.interactions[0].input;
    assert_eq!(input["model"], config.model.as_str());
    let prompt = input["prompt"].as_str().unwrap();
    assert!(prompt.contains("Crash on startup"));

    // --- Phase 2: replay twice, determinism included ---
    let cassettes = CassetteConfig::from_session_dir(&out_dir);
    for _ in 0..2 {
        let ctx = ServiceContext::replaying_from(&cassettes).unwrap();
        let replayed = Triage::new(&ctx, &config).run(REPO, 42, false).await;
        assert_eq!(replayed, recorded);
    }
}

#[tokio::test]
async fn recorded_model_failure_replays_as_failure_record() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("prose.cassette.yaml");
    write_issue_cassette(&source, 200, "Sure! This is clearly a bug.");

    let ctx = ServiceContext::replaying(&source).unwrap();
    let config = Config::default();
    let record = Triage::new(&ctx, &config).run(REPO, 42, false).await;

    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        serde_json::json!({
            "error": "AI response parsing failed",
            "details": "Could not parse AI output as JSON"
        })
    );
    assert!(matches!(record, AnalysisRecord::Failure(_)));
}
