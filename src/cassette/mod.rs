//! Cassettes: recorded port interactions used to replay runs offline.
//!
//! A cassette is a YAML file holding the ordered `{seq, port, method, input,
//! output}` interactions of one run. `TRIAGE_RECORD=<dir>` captures the
//! `http` and `llm` ports of a live run; `TRIAGE_REPLAY=<file>` serves one.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
