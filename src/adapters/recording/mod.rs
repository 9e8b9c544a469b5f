//! Recording adapters that capture interactions to cassettes.

pub mod http;
pub mod llm;

pub use http::RecordingHttpClient;
pub use llm::RecordingLlmClient;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Append one call and its result to `recorder`.
///
/// Results serialize with serde's external tagging, `{"Ok": ..}` or
/// `{"Err": ..}`, which `replaying::decode` turns back into the typed
/// result. Interactions that cannot be serialized are skipped with
/// a warning rather than failing the call.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input = serde_json::to_value(input);
    let output = serde_json::to_value(output);
    let (input, output) = match (input, output) {
        (Ok(input), Ok(output)) => (input, output),
        (Err(e), _) | (_, Err(e)) => {
            warn!(port, method, error = %e, "skipping unserializable interaction");
            return;
        }
    };

    if let Ok(mut guard) = recorder.lock() {
        guard.record(port, method, input, output);
    } else {
        warn!(port, method, "recorder lock poisoned, interaction dropped");
    }
}
