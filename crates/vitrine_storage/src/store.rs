//! Storage trait definition.

use vitrine_error::VitrineResult;

/// Trait for pluggable key-value persistence backends.
///
/// Callers treat every error as a cache miss, so implementations report
/// failures honestly instead of hiding them.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if nothing is stored under the key
    fn get(&self, key: &str) -> VitrineResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> VitrineResult<()>;

    /// Remove the value under `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> VitrineResult<()>;
}
