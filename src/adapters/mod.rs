//! Adapter implementations of the port traits.
//!
//! `live` talks to real services, `recording` wraps live adapters and writes
//! cassettes, `replaying` serves cassettes, and `memory` holds cache entries
//! in-process.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;
