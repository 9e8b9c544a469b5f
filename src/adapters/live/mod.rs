//! Live adapters for real external interactions.

pub mod anthropic;
pub mod gemini;
pub mod http;
pub mod store;
