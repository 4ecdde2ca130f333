//! tagkv: Tag-based invalidation for flat key/value caches
//!
//! # Features
//!
//! - **Tagged entries** on any store that only speaks get/set/delete
//! - **ALL / ANY invalidation** across every entry sharing a tag
//! - **Shared state**: tag sets are ordinary store keys, visible to every process
//! - **Optional compare-and-swap** tag updates on stores that support it
//! - **Pluggable serialization** (JSON, MessagePack, Bincode)
//! - **Metrics integration**
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tagkv::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new(MemoryConfig::default());
//!     let cache = TaggedCache::new(store);
//!
//!     cache
//!         .save("user:1", b"alice".to_vec(), SaveOpts::new().ttl_secs(60).tag("users"))
//!         .await?;
//!
//!     if let Some(payload) = cache.load("user:1", false).await? {
//!         println!("Got {} bytes", payload.len());
//!     }
//!
//!     let report = cache.invalidate(MatchMode::Any, &["users"]).await?;
//!     println!("Removed {} entries", report.removed);
//!
//!     Ok(())
//! }
//! ```

mod overlay;

// Re-export core
pub use tagkv_core::*;

// Re-export storage
#[cfg(feature = "memory")]
pub use tagkv_storage::{MemoryConfig, MemoryStore};

#[cfg(feature = "redis")]
pub use tagkv_storage::{RedisConfig, RedisStore};

// Export overlay
pub use overlay::{
    DEFAULT_TAG_LIFETIME, KeyNormalizer, TAG_KEY_PREFIX, TagStore, TagUpdateMode, TaggedCache,
    TaggedCacheConfig,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        CacheError, CacheKey, CleanMode, InvalidationReport, JsonSerializer, KvStore, MatchMode,
        Result, SaveOptions, SaveOpts, Serializer, TagUpdateMode, TaggedCache, TaggedCacheConfig,
    };

    #[cfg(feature = "memory")]
    pub use crate::{MemoryConfig, MemoryStore};

    #[cfg(feature = "redis")]
    pub use crate::{RedisConfig, RedisStore};

    #[cfg(feature = "msgpack")]
    pub use crate::MsgPackSerializer;

    #[cfg(feature = "bincode")]
    pub use crate::BincodeSerializer;
}
