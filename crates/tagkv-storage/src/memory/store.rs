//! In-memory key/value store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tagkv_core::{
    Capabilities, CasOutcome, EntryMetadata, KvStore, Result, StoreCleanMode, StoreStats,
};

/// Configuration for the memory store
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Initial map capacity
    pub initial_capacity: usize,
    /// Offer `compare_and_swap` to the overlay
    pub compare_and_swap: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            compare_and_swap: true,
        }
    }
}

impl MemoryConfig {
    /// Create config with specific initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            ..Default::default()
        }
    }

    /// Behave like a plain get/set store without conditional writes
    pub fn without_cas(mut self) -> Self {
        self.compare_and_swap = false;
        self
    }
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: Vec<u8>,
    modified_at: SystemTime,
    expires_at: Option<SystemTime>,
}

impl StoredValue {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let now = SystemTime::now();
        Self {
            value,
            modified_at: now,
            expires_at: ttl.map(|ttl| now + ttl),
        }
    }

    fn is_expired(&self) -> bool {
        matches!(self.expires_at, Some(at) if SystemTime::now() >= at)
    }

    fn live_value(&self) -> Option<&[u8]> {
        if self.is_expired() {
            None
        } else {
            Some(&self.value)
        }
    }

    fn metadata(&self) -> EntryMetadata {
        EntryMetadata {
            size: self.value.len(),
            expires_at: self.expires_at,
            modified_at: Some(self.modified_at),
        }
    }
}

/// In-memory key/value store
///
/// Expired values stay readable through `get_expired` until a
/// `StoreCleanMode::Expired` clean purges them.
/// Cloning creates a new handle to the SAME underlying store.
#[derive(Clone)]
pub struct MemoryStore {
    data: Arc<DashMap<String, StoredValue>>,
    stats: Arc<RwLock<StoreStats>>,
    config: MemoryConfig,
}

impl MemoryStore {
    /// Create a new memory store
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            data: Arc::new(DashMap::with_capacity(config.initial_capacity)),
            stats: Arc::new(RwLock::new(StoreStats::default())),
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(MemoryConfig::default())
    }

    /// Operation counters
    pub fn stats(&self) -> StoreStats {
        let mut stats = self.stats.read().clone();
        stats.size = self.data.len();
        stats
    }

    /// Number of keys held, expired ones included
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .data
            .get(key)
            .and_then(|entry| entry.live_value().map(<[u8]>::to_vec));

        let mut stats = self.stats.write();
        if value.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        Ok(value)
    }

    async fn get_expired(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.data.insert(key.to_string(), StoredValue::new(value, ttl));
        self.stats.write().writes += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        match self.data.remove(key) {
            Some((_, entry)) if !entry.is_expired() => {
                self.stats.write().deletes += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn touch(&self, key: &str, extra: Duration) -> Result<bool> {
        match self.data.get_mut(key) {
            Some(mut entry) if !entry.is_expired() => {
                if let Some(at) = entry.expires_at {
                    entry.expires_at = Some(at + extra);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn metadata(&self, key: &str) -> Result<Option<EntryMetadata>> {
        Ok(self
            .data
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.metadata()))
    }

    async fn clean(&self, mode: StoreCleanMode) -> Result<u64> {
        let before = self.data.len();
        match mode {
            StoreCleanMode::All => self.data.clear(),
            StoreCleanMode::Expired => self.data.retain(|_, entry| !entry.is_expired()),
        }
        Ok(before.saturating_sub(self.data.len()) as u64)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<CasOutcome> {
        if !self.config.compare_and_swap {
            return Ok(CasOutcome::Unsupported);
        }

        // The entry guard holds the shard lock across compare and write.
        let swapped = match self.data.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let matches = occupied.get().live_value() == expected;
                if matches {
                    occupied.insert(StoredValue::new(value, ttl));
                }
                matches
            }
            Entry::Vacant(vacant) => {
                if expected.is_none() {
                    vacant.insert(StoredValue::new(value, ttl));
                    true
                } else {
                    false
                }
            }
        };

        let mut stats = self.stats.write();
        if swapped {
            stats.writes += 1;
            Ok(CasOutcome::Swapped)
        } else {
            stats.conflicts += 1;
            Ok(CasOutcome::Conflict)
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            tags: false,
            tag_listing: false,
            expired_read: true,
            automatic_cleaning: false,
            infinite_lifetime: true,
            compare_and_swap: self.config.compare_and_swap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_get_set() {
        let store = MemoryStore::with_defaults();

        store
            .set("key1", b"value1".to_vec(), Some(Duration::from_secs(60)))
            .await
            .unwrap();

        let result = store.get("key1").await.unwrap();
        assert_eq!(result, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = MemoryStore::with_defaults();
        assert!(store.get("nonexistent").await.unwrap().is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::with_defaults();
        store.set("key1", b"value1".to_vec(), None).await.unwrap();

        assert!(store.delete("key1").await.unwrap());
        assert!(!store.delete("key1").await.unwrap());
        assert!(store.get("key1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_value_only_readable_via_get_expired() {
        let store = MemoryStore::with_defaults();
        store
            .set("key1", b"old".to_vec(), Some(Duration::from_millis(20)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(store.get("key1").await.unwrap().is_none());
        assert!(store.metadata("key1").await.unwrap().is_none());
        assert_eq!(store.get_expired("key1").await.unwrap(), Some(b"old".to_vec()));
    }

    #[tokio::test]
    async fn test_touch_extends_lifetime() {
        let store = MemoryStore::with_defaults();
        store
            .set("key1", b"v".to_vec(), Some(Duration::from_secs(10)))
            .await
            .unwrap();

        let before = store.metadata("key1").await.unwrap().unwrap().expires_at.unwrap();
        assert!(store.touch("key1", Duration::from_secs(30)).await.unwrap());
        let after = store.metadata("key1").await.unwrap().unwrap().expires_at.unwrap();

        assert_eq!(after.duration_since(before).unwrap(), Duration::from_secs(30));
        assert!(!store.touch("missing", Duration::from_secs(30)).await.unwrap());
    }

    #[tokio::test]
    async fn test_metadata() {
        let store = MemoryStore::with_defaults();
        store.set("key1", b"12345".to_vec(), None).await.unwrap();

        let meta = store.metadata("key1").await.unwrap().unwrap();
        assert_eq!(meta.size, 5);
        assert!(meta.expires_at.is_none());
        assert!(meta.modified_at.is_some());
    }

    #[tokio::test]
    async fn test_clean_expired_keeps_live_keys() {
        let store = MemoryStore::with_defaults();
        store
            .set("short", b"v".to_vec(), Some(Duration::from_millis(10)))
            .await
            .unwrap();
        store.set("long", b"v".to_vec(), None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.clean(StoreCleanMode::Expired).await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get_expired("short").await.unwrap().is_none());

        assert_eq!(store.clean(StoreCleanMode::All).await.unwrap(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        let store = MemoryStore::with_defaults();

        let outcome = store
            .compare_and_swap("k", None, b"one".to_vec(), None)
            .await
            .unwrap();
        assert_eq!(outcome, CasOutcome::Swapped);

        // Stale expectation
        let outcome = store
            .compare_and_swap("k", None, b"two".to_vec(), None)
            .await
            .unwrap();
        assert_eq!(outcome, CasOutcome::Conflict);

        let outcome = store
            .compare_and_swap("k", Some(b"one"), b"two".to_vec(), None)
            .await
            .unwrap();
        assert_eq!(outcome, CasOutcome::Swapped);
        assert_eq!(store.get("k").await.unwrap(), Some(b"two".to_vec()));

        let stats = store.stats();
        assert_eq!(stats.writes, 2);
        assert_eq!(stats.conflicts, 1);
    }

    #[tokio::test]
    async fn test_compare_and_swap_disabled() {
        let store = MemoryStore::new(MemoryConfig::default().without_cas());

        let outcome = store
            .compare_and_swap("k", None, b"one".to_vec(), None)
            .await
            .unwrap();
        assert_eq!(outcome, CasOutcome::Unsupported);
        assert!(store.get("k").await.unwrap().is_none());
        assert!(!store.capabilities().compare_and_swap);
    }
}
