//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the triage pipeline and an
//! external system (tracker HTTP, language model, cache storage).
//! Implementations live in `src/adapters/`.

pub mod http;
pub mod llm;
pub mod store;

pub use http::{HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse};
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient, LlmError};
pub use store::{KeyValueStore, StoreResult};
