//! Replaying adapters that serve recorded interactions.
//!
//! Each adapter checks the call against what was recorded before serving the
//! output, so a cassette recorded for a different request fails loudly.

pub mod http;
pub mod llm;

pub use http::ReplayingHttpClient;
pub use llm::ReplayingLlmClient;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;

/// Pull the next recorded output for `port::method`, checking that it was
/// recorded for `request`.
///
/// Only the `fields` present in the recorded input are compared, so
/// hand-written cassettes may leave out what they do not care about.
///
/// # Panics
///
/// Panics when no cassette is configured for the port, when the cassette is
/// exhausted, when a compared field differs, or when the replayer lock is
/// poisoned. A cassette that does not match the code under test is a bug in
/// the test.
pub(crate) fn next_output(
    replayer: Option<&Arc<Mutex<CassetteReplayer>>>,
    port: &str,
    method: &str,
    request: &Value,
    fields: &[&str],
) -> Value {
    let Some(replayer) = replayer else {
        panic!("no cassette configured for the {port} port");
    };
    let interaction = replayer
        .lock()
        .expect("replayer lock poisoned")
        .next_interaction(port, method);

    for field in fields {
        let Some(recorded) = interaction.input.get(field) else {
            continue;
        };
        let actual = request.get(field).unwrap_or(&Value::Null);
        assert!(
            recorded == actual,
            "Cassette mismatch at {port}::{method}: recorded {field} {recorded}, got {actual}"
        );
    }
    interaction.output
}

/// Decode a recorded `{"Ok": ..}` or `{"Err": ..}` output.
///
/// An output of the wrong shape becomes the error built by `malformed`.
pub(crate) fn decode<T, E>(output: Value, malformed: fn(String) -> E) -> Result<T, E>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    match serde_json::from_value(output) {
        Ok(result) => result,
        Err(e) => Err(malformed(format!("malformed cassette output: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};

    fn replayer(input: Value) -> Arc<Mutex<CassetteReplayer>> {
        let cassette = Cassette {
            name: "t".into(),
            recorded_at: Utc::now(),
            commit: "c".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "llm".into(),
                method: "complete".into(),
                input,
                output: json!("reply"),
            }],
        };
        Arc::new(Mutex::new(CassetteReplayer::new(&cassette)))
    }

    #[test]
    fn serves_output_when_recorded_fields_match() {
        let replayer = replayer(json!({"model": "m", "prompt": "p"}));
        let request = json!({"model": "m", "prompt": "p", "max_tokens": null});

        let output = next_output(
            Some(&replayer),
            "llm",
            "complete",
            &request,
            &["model", "prompt"],
        );

        assert_eq!(output, json!("reply"));
    }

    #[test]
    fn fields_missing_from_the_recording_are_not_compared() {
        let replayer = replayer(json!({}));
        let output = next_output(
            Some(&replayer),
            "llm",
            "complete",
            &json!({"model": "other"}),
            &["model"],
        );
        assert_eq!(output, json!("reply"));
    }

    #[test]
    #[should_panic(expected = "Cassette mismatch at llm::complete: recorded prompt")]
    fn differing_field_panics() {
        let replayer = replayer(json!({"model": "m", "prompt": "old prompt"}));
        let _ = next_output(
            Some(&replayer),
            "llm",
            "complete",
            &json!({"model": "m", "prompt": "new prompt"}),
            &["model", "prompt"],
        );
    }

    #[test]
    fn decode_reads_ok_and_err_and_flags_bad_shapes() {
        let ok: Result<u32, String> = decode(json!({"Ok": 7}), |m| m);
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> = decode(json!({"Err": "boom"}), |m| m);
        assert_eq!(err, Err("boom".to_string()));

        let bad: Result<u32, String> = decode(json!("nonsense"), |m| m);
        assert!(bad.unwrap_err().starts_with("malformed cassette output"));
    }

    #[test]
    #[should_panic(expected = "no cassette configured for the llm port")]
    fn unconfigured_port_panics() {
        let _ = next_output(None, "llm", "complete", &json!({}), &[]);
    }
}
