//! Cassette data structures.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number within the cassette, assigned by the recorder.
    pub seq: u64,
    /// Port name (`"http"` or `"llm"`).
    pub port: String,
    /// Method invoked on the port (`"get"`, `"complete"`).
    pub method: String,
    /// What was sent to the port.
    pub input: serde_json::Value,
    /// What the port returned, `{"Ok": ..}` or `{"Err": ..}`.
    pub output: serde_json::Value,
}

/// An ordered list of interactions plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the cassette was written.
    pub recorded_at: DateTime<Utc>,
    /// Git commit of the recording checkout, or `"unknown"`.
    pub commit: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads and parses a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error string naming the file if it cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_reads_what_serde_yaml_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.cassette.yaml");
        let cassette = Cassette {
            name: "run".into(),
            recorded_at: Utc::now(),
            commit: "abc123".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "http".into(),
                method: "get".into(),
                input: json!({"url": "https://api.github.com/repos/acme/widgets/issues/1"}),
                output: json!({"Ok": {"status": 200, "body": "{}"}}),
            }],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        assert_eq!(Cassette::load(&path).unwrap(), cassette);
    }

    #[test]
    fn load_names_the_missing_file() {
        let err = Cassette::load(Path::new("/nonexistent/x.cassette.yaml")).unwrap_err();
        assert!(err.contains("/nonexistent/x.cassette.yaml"));
    }
}
