//! Key/value store contract

use async_trait::async_trait;
use std::time::Duration;

use crate::{Capabilities, CasOutcome, EntryMetadata, Result, StoreCleanMode};

/// Contract for the flat key/value store the tagging overlay runs on
///
/// The store only needs per-key values with per-key expiration. It has no
/// notion of tags; the overlay keeps its tag index in ordinary keys.
/// Implementations include the in-memory store and Redis.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Get a live value
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Get a value even if its lifetime has passed, as long as the store
    /// still holds it
    ///
    /// Stores that purge expired keys eagerly can rely on the default.
    async fn get_expired(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.get(key).await
    }

    /// Store a value, replacing any previous one
    ///
    /// `ttl` of `None` stores the value without expiration.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Delete a key
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Extend the remaining lifetime of a key by `extra`
    ///
    /// Returns `false` if the key doesn't exist.
    async fn touch(&self, key: &str, extra: Duration) -> Result<bool>;

    /// Describe a live key without loading its value
    async fn metadata(&self, key: &str) -> Result<Option<EntryMetadata>>;

    /// Run the store's native bulk clean
    ///
    /// Returns the number of keys removed, when the store can tell.
    async fn clean(&self, mode: StoreCleanMode) -> Result<u64>;

    /// Replace the value of `key` only if it currently equals `expected`
    ///
    /// `expected` of `None` means the key must be absent. This is the hook
    /// for atomic tag-set updates; stores without a conditional write keep
    /// the default and the overlay falls back to read-modify-write.
    async fn compare_and_swap(
        &self,
        _key: &str,
        _expected: Option<&[u8]>,
        _value: Vec<u8>,
        _ttl: Option<Duration>,
    ) -> Result<CasOutcome> {
        Ok(CasOutcome::Unsupported)
    }

    /// Features this store supports
    fn capabilities(&self) -> Capabilities;
}
