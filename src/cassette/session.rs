//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::recorder::CassetteRecorder;

/// One recorder per recorded port, all writing into the same directory.
pub struct RecordingSession {
    /// Recorder for tracker HTTP interactions.
    pub http: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for LLM interactions.
    pub llm: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Starts a session writing `http.cassette.yaml` and `llm.cassette.yaml` into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, String> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| {
            format!(
                "Failed to create cassette directory {}: {e}",
                output_dir.display()
            )
        })?;

        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let commit = commit_hash();
        let make_recorder = |port: &str| {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(
                path,
                format!("{timestamp}-{port}"),
                &commit,
            )))
        };

        let http = make_recorder("http");
        let llm = make_recorder("llm");
        Ok(Self {
            http,
            llm,
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes every cassette. Recording adapters must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder
                .finish()
                .map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.http, "http")?;
        finish_one(self.llm, "llm")?;
        Ok(self.output_dir)
    }
}

/// Current git commit, or `"unknown"` outside a checkout.
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(
            || {
                warn!("could not read git commit hash, recording as 'unknown'");
                "unknown".to_string()
            },
            |s| s.trim().to_string(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;

    #[test]
    fn finish_writes_one_cassette_per_port() {
        let dir = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(dir.path().join("run")).unwrap();
        session.llm.lock().unwrap().record(
            "llm",
            "complete",
            serde_json::json!({}),
            serde_json::json!({"Ok": {"text": "x"}}),
        );

        let out = session.finish().unwrap();

        let http = Cassette::load(&out.join("http.cassette.yaml")).unwrap();
        let llm = Cassette::load(&out.join("llm.cassette.yaml")).unwrap();
        assert_eq!(http.interactions.len(), 0);
        assert_eq!(llm.interactions.len(), 1);
    }

    #[test]
    fn finish_refuses_while_adapter_holds_recorder() {
        let dir = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(dir.path()).unwrap();
        let _held = Arc::clone(&session.http);
        let err = session.finish().unwrap_err();
        assert!(err.contains("http still has references"));
    }

    #[test]
    fn commit_hash_is_never_empty() {
        assert!(!commit_hash().is_empty());
    }
}
