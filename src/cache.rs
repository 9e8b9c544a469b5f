//! Best-effort analysis cache keyed by repository URL and issue number.
//!
//! Reads never fail (a bad entry is a miss) and writes never fail the
//! caller (errors are logged and dropped). Storage goes through the
//! [`KeyValueStore`] port, one entry per key, no expiry.

use std::fmt::Write as _;

use tracing::{debug, warn};

use crate::error::TriageError;
use crate::ports::{KeyValueStore, StoreResult};
use crate::record::AnalysisRecord;

/// Derives the entry name for `(repository_url, issue_number)`.
///
/// `/` becomes `_` and every character that is unsafe in a file name, as
/// well as `%`, `_` and `:`, is percent-escaped, so distinct inputs never
/// share a key.
#[must_use]
pub fn cache_key(repository_url: &str, issue_number: u64) -> String {
    let mut key = String::with_capacity(repository_url.len() + 24);
    for c in repository_url.chars() {
        match c {
            '/' => key.push('_'),
            '%' | '_' | ':' | '\\' | '*' | '?' | '"' | '<' | '>' | '|' => {
                let _ = write!(key, "%{:02X}", u32::from(c));
            }
            c if c.is_control() => {
                let _ = write!(key, "%{:02X}", u32::from(c));
            }
            c => key.push(c),
        }
    }
    let _ = write!(key, "_issue_{issue_number}.json");
    key
}

fn cache_io(e: impl std::fmt::Display) -> TriageError {
    TriageError::CacheIo(e.to_string())
}

/// Maps `(repository_url, issue_number)` to a previously stored [`AnalysisRecord`].
pub struct AnalysisCache<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> AnalysisCache<'a> {
    /// Creates a cache over `store`.
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Returns the stored record, or `None` when it is missing, unreadable, or malformed.
    #[must_use]
    pub fn get(&self, repository_url: &str, issue_number: u64) -> Option<AnalysisRecord> {
        let key = cache_key(repository_url, issue_number);
        let contents = match self.store.get(&key) {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                debug!(key = %key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %cache_io(e), "ignoring unreadable cache entry");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(record) => {
                debug!(key = %key, "cache hit");
                Some(record)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "ignoring malformed cache entry");
                None
            }
        }
    }

    /// Stores `record`, replacing any previous entry. Failures are logged and dropped.
    pub fn put(&self, repository_url: &str, issue_number: u64, record: &AnalysisRecord) {
        let key = cache_key(repository_url, issue_number);
        if let Err(e) = self.try_put(&key, record) {
            warn!(key = %key, error = %e, "failed to write cache entry");
        }
    }

    /// Removes every entry. Failures are logged and dropped.
    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %cache_io(e), "failed to clear cache");
        }
    }

    fn try_put(&self, key: &str, record: &AnalysisRecord) -> Result<(), TriageError> {
        let json = serde_json::to_string_pretty(record).map_err(cache_io)?;
        self.store.put(key, &json).map_err(cache_io)?;
        debug!(key = %key, "cached analysis");
        Ok(())
    }
}
