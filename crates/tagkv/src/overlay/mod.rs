//! Tagging overlay over a flat key/value store

use std::sync::Arc;
use std::time::{Duration, Instant};

use tagkv_core::{
    CacheKey, CacheMetrics, CacheOperation, Capabilities, CleanMode, EntryMetadata,
    JsonSerializer, KvStore, MatchMode, NoopMetrics, Result, SaveOptions, Serializer,
    StoreCleanMode,
};
use tracing::warn;

mod invalidation;
mod keys;
mod tag_store;

pub use keys::{KeyNormalizer, TAG_KEY_PREFIX};
pub use tag_store::TagStore;

/// Lifetime of a tag set when none is configured (one day)
pub const DEFAULT_TAG_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// How tag sets are rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagUpdateMode {
    /// Load, mutate, write back. Concurrent writers to one tag can lose updates.
    #[default]
    ReadModifyWrite,
    /// Conditional write retried up to `max_attempts` times; stores without
    /// compare-and-swap fall back to an unconditional write
    CompareAndSwap { max_attempts: u32 },
}

/// Configuration for TaggedCache
#[derive(Debug, Clone)]
pub struct TaggedCacheConfig {
    /// Namespace prepended to every entry id
    pub key_prefix: String,
    /// TTL for saves that don't specify one (`None` = never expire)
    pub default_ttl: Option<Duration>,
    /// Lifetime of every tag-set write
    pub tag_lifetime: Duration,
    /// Tag-set update strategy
    pub tag_updates: TagUpdateMode,
}

impl Default for TaggedCacheConfig {
    fn default() -> Self {
        Self {
            key_prefix: String::new(),
            default_ttl: Some(Duration::from_secs(3600)),
            tag_lifetime: DEFAULT_TAG_LIFETIME,
            tag_updates: TagUpdateMode::ReadModifyWrite,
        }
    }
}

impl TaggedCacheConfig {
    /// Create config with a key prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Create config with specific default TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            default_ttl: Some(ttl),
            ..Default::default()
        }
    }

    /// Override the tag-set lifetime
    pub fn tag_lifetime(mut self, lifetime: Duration) -> Self {
        self.tag_lifetime = lifetime;
        self
    }

    /// Update tag sets with compare-and-swap
    pub fn compare_and_swap(mut self, max_attempts: u32) -> Self {
        self.tag_updates = TagUpdateMode::CompareAndSwap { max_attempts };
        self
    }
}

/// Cache with tag-based invalidation on top of any [`KvStore`]
///
/// Generic over:
/// - `S`: The key/value store (Memory, Redis)
/// - `C`: The serializer used for tag sets
/// - `M`: The metrics collector
///
/// Payloads are opaque bytes. Nothing is held in the overlay itself; every
/// handle (and every process) sharing the store sees the same entries and
/// tag sets.
pub struct TaggedCache<S, C = JsonSerializer, M = NoopMetrics>
where
    S: KvStore,
    C: Serializer,
    M: CacheMetrics,
{
    store: Arc<S>,
    keys: KeyNormalizer,
    tags: TagStore<S, C>,
    metrics: Arc<M>,
    config: TaggedCacheConfig,
}

impl<S: KvStore> TaggedCache<S, JsonSerializer, NoopMetrics> {
    /// Create a TaggedCache with JSON tag sets and no metrics
    pub fn new(store: S) -> Self {
        Self::with_config(store, TaggedCacheConfig::default())
    }

    /// Create with custom config
    pub fn with_config(store: S, config: TaggedCacheConfig) -> Self {
        Self::with_serializer_and_metrics(store, JsonSerializer, NoopMetrics, config)
    }
}

impl<S, C, M> TaggedCache<S, C, M>
where
    S: KvStore,
    C: Serializer,
    M: CacheMetrics,
{
    /// Create a TaggedCache with custom serializer and metrics
    pub fn with_serializer_and_metrics(
        store: S,
        serializer: C,
        metrics: M,
        config: TaggedCacheConfig,
    ) -> Self {
        let store = Arc::new(store);
        let tags = TagStore::new(
            store.clone(),
            Arc::new(serializer),
            config.tag_lifetime,
            config.tag_updates,
        );

        Self {
            store,
            keys: KeyNormalizer::new(config.key_prefix.clone()),
            tags,
            metrics: Arc::new(metrics),
            config,
        }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The tag index
    pub fn tag_store(&self) -> &TagStore<S, C> {
        &self.tags
    }

    /// Active configuration
    pub fn config(&self) -> &TaggedCacheConfig {
        &self.config
    }

    /// Load an entry's payload
    ///
    /// With `skip_validity_check` the store may return a payload past its
    /// lifetime if it still holds it.
    pub async fn load(
        &self,
        id: impl CacheKey,
        skip_validity_check: bool,
    ) -> Result<Option<Vec<u8>>> {
        let id = id.cache_key();
        let key = self.keys.checked_entry_key(&id)?;
        let start = Instant::now();

        let payload = if skip_validity_check {
            self.store.get_expired(&key).await?
        } else {
            self.store.get(&key).await?
        };

        if payload.is_some() {
            self.metrics.record_hit(&id);
        } else {
            self.metrics.record_miss(&id);
        }
        self.metrics.record_latency(CacheOperation::Load, start.elapsed());
        Ok(payload)
    }

    /// Probe an entry without loading its payload
    pub async fn exists(&self, id: impl CacheKey) -> Result<Option<EntryMetadata>> {
        self.metadata(id).await
    }

    /// Size, expiry and modification time of a live entry
    pub async fn metadata(&self, id: impl CacheKey) -> Result<Option<EntryMetadata>> {
        let key = self.keys.checked_entry_key(&id.cache_key())?;
        self.store.metadata(&key).await
    }

    /// Save an entry and record it under each of its tags
    ///
    /// Tag sets are updated before the payload is written, so a failure in
    /// between leaves tag sets pointing at an absent entry; invalidation
    /// prunes such ids later. Re-saving an id does not remove it from tags
    /// it was saved with before.
    pub async fn save(
        &self,
        id: impl CacheKey,
        payload: impl Into<Vec<u8>>,
        options: impl Into<SaveOptions>,
    ) -> Result<()> {
        let id = id.cache_key();
        let key = self.keys.checked_entry_key(&id)?;
        let options = options.into();
        for tag in &options.tags {
            KeyNormalizer::check_tag(tag)?;
        }

        let start = Instant::now();
        for tag in invalidation::distinct_tags(&options.tags) {
            self.tags.add_id(tag, &id).await?;
        }
        self.metrics
            .record_latency(CacheOperation::TagWrite, start.elapsed());

        let ttl = if options.persistent {
            None
        } else {
            options.ttl.or(self.config.default_ttl)
        };

        let start = Instant::now();
        self.store.set(&key, payload.into(), ttl).await?;
        self.metrics.record_latency(CacheOperation::Save, start.elapsed());
        Ok(())
    }

    /// Delete an entry
    ///
    /// Tag sets are left untouched; use [`TaggedCache::invalidate`] to drop
    /// entries together with their tag references.
    pub async fn remove(&self, id: impl CacheKey) -> Result<bool> {
        let key = self.keys.checked_entry_key(&id.cache_key())?;
        let start = Instant::now();
        let removed = self.store.delete(&key).await?;
        self.metrics.record_latency(CacheOperation::Remove, start.elapsed());
        Ok(removed)
    }

    /// Extend an entry's lifetime by `extra`
    pub async fn touch(&self, id: impl CacheKey, extra: Duration) -> Result<bool> {
        let key = self.keys.checked_entry_key(&id.cache_key())?;
        let start = Instant::now();
        let touched = self.store.touch(&key, extra).await?;
        self.metrics.record_latency(CacheOperation::Touch, start.elapsed());
        Ok(touched)
    }

    /// Bulk clean
    ///
    /// `All` and `Expired` run the store's native clean (`All` also drops
    /// tag sets); the tag modes invalidate by tag. Returns the number of
    /// keys removed.
    pub async fn clean(&self, mode: CleanMode) -> Result<u64> {
        let start = Instant::now();
        let removed = match mode {
            CleanMode::All => self.store.clean(StoreCleanMode::All).await?,
            CleanMode::Expired => self.store.clean(StoreCleanMode::Expired).await?,
            CleanMode::MatchingAllTags(tags) => {
                self.invalidate(MatchMode::All, tags.as_slice()).await?.removed
            }
            CleanMode::MatchingAnyTag(tags) => {
                self.invalidate(MatchMode::Any, tags.as_slice()).await?.removed
            }
        };
        self.metrics.record_latency(CacheOperation::Clean, start.elapsed());
        Ok(removed)
    }

    /// Known tags
    ///
    /// Tag sets live under ordinary keys and the store can't enumerate them,
    /// so this is always empty.
    pub fn list_tags(&self) -> Vec<String> {
        warn!("Tag listing is not supported by the tagging overlay");
        Vec::new()
    }

    /// Capabilities of the store with tag support added
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            tags: true,
            tag_listing: false,
            ..self.store.capabilities()
        }
    }
}

impl<S, C, M> Clone for TaggedCache<S, C, M>
where
    S: KvStore,
    C: Serializer,
    M: CacheMetrics,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            keys: self.keys.clone(),
            tags: self.tags.clone(),
            metrics: self.metrics.clone(),
            config: self.config.clone(),
        }
    }
}
