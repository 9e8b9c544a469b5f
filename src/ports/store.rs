//! Key-value store port backing the analysis cache.

use std::error::Error;

/// Result of a store operation.
pub type StoreResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Flat string-keyed storage with no expiry.
///
/// Keys are filesystem-safe identifiers; values are serialized records.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry exists but cannot be read.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be removed.
    fn clear(&self) -> StoreResult<()>;
}
