use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use bb8_redis::RedisConnectionManager;
use parking_lot::RwLock as SyncRwLock;
use redis::{AsyncCommands, Value};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tagkv_core::{
    Capabilities, CacheError, CasOutcome, EntryMetadata, KvStore, Result, StoreCleanMode,
    StoreStats,
};

use super::config::RedisConfig;

fn store_error(err: redis::RedisError) -> CacheError {
    CacheError::StoreUnavailable(err.to_string())
}

/// Lifetime in milliseconds for SET PX, never zero
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// New PEXPIRE value for a key with `remaining_ms` left, extended by `extra`
fn extended_millis(remaining_ms: i64, extra: Duration) -> i64 {
    let extra = i64::try_from(extra.as_millis()).unwrap_or(i64::MAX);
    remaining_ms.saturating_add(extra)
}

/// GET-compare-EXEC on a connection that already WATCHes `key`
async fn swap_watched<C>(
    conn: &mut C,
    key: &str,
    expected: Option<&[u8]>,
    value: Vec<u8>,
    ttl: Option<Duration>,
) -> redis::RedisResult<CasOutcome>
where
    C: redis::aio::ConnectionLike + Send + Sync,
{
    let current: Option<Vec<u8>> = conn.get(key).await?;
    if current.as_deref() != expected {
        let _: () = redis::cmd("UNWATCH").query_async(conn).await?;
        return Ok(CasOutcome::Conflict);
    }

    let mut pipe = redis::pipe();
    pipe.atomic();
    if let Some(ttl) = ttl {
        pipe.pset_ex(key, value, ttl_millis(ttl));
    } else {
        pipe.set(key, value);
    }

    // EXEC replies nil when the watched key changed in between
    let exec: Option<Vec<Value>> = pipe.query_async(conn).await?;
    Ok(match exec {
        Some(_) => CasOutcome::Swapped,
        None => CasOutcome::Conflict,
    })
}

/// Redis store implementation
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool<RedisConnectionManager>,
    config: RedisConfig,
    stats: Arc<SyncRwLock<StoreStats>>,
}

impl RedisStore {
    /// Create a new Redis store
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        Ok(Self {
            pool,
            config,
            stats: Arc::new(SyncRwLock::new(StoreStats::default())),
        })
    }

    /// Operation counters seen by this handle
    pub fn stats(&self) -> StoreStats {
        self.stats.read().clone()
    }

    /// Get prefix for a key
    fn prefixed_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Get connection from pool
    async fn get_connection(&self) -> Result<PooledConnection<'_, RedisConnectionManager>> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.get_connection().await?;
        let prefixed = self.prefixed_key(key);

        let bytes: Option<Vec<u8>> = conn.get(&prefixed).await.map_err(store_error)?;

        let mut stats = self.stats.write();
        if bytes.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        Ok(bytes)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let prefixed = self.prefixed_key(key);

        if let Some(ttl) = ttl {
            let _: () = conn
                .pset_ex(&prefixed, value, ttl_millis(ttl))
                .await
                .map_err(store_error)?;
        } else {
            let _: () = conn.set(&prefixed, value).await.map_err(store_error)?;
        }

        self.stats.write().writes += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let prefixed = self.prefixed_key(key);

        let deleted: bool = conn.del(&prefixed).await.map_err(store_error)?;

        if deleted {
            self.stats.write().deletes += 1;
        }
        Ok(deleted)
    }

    async fn touch(&self, key: &str, extra: Duration) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let prefixed = self.prefixed_key(key);

        // -2: missing, -1: no expiry
        let remaining_ms: i64 = conn.pttl(&prefixed).await.map_err(store_error)?;
        match remaining_ms {
            -2 => Ok(false),
            -1 => Ok(true),
            ms => {
                conn.pexpire(&prefixed, extended_millis(ms, extra))
                    .await
                    .map_err(store_error)
            }
        }
    }

    async fn metadata(&self, key: &str) -> Result<Option<EntryMetadata>> {
        let mut conn = self.get_connection().await?;
        let prefixed = self.prefixed_key(key);

        let (exists, size, remaining_ms): (bool, usize, i64) = redis::pipe()
            .exists(&prefixed)
            .strlen(&prefixed)
            .pttl(&prefixed)
            .query_async(&mut *conn)
            .await
            .map_err(store_error)?;

        if !exists {
            return Ok(None);
        }

        let expires_at = (remaining_ms > 0)
            .then(|| SystemTime::now() + Duration::from_millis(remaining_ms as u64));

        Ok(Some(EntryMetadata {
            size,
            expires_at,
            modified_at: None,
        }))
    }

    async fn clean(&self, mode: StoreCleanMode) -> Result<u64> {
        // Redis expires keys on its own
        if mode == StoreCleanMode::Expired {
            return Ok(0);
        }

        let mut conn = self.get_connection().await?;

        let match_pattern = match &self.config.key_prefix {
            Some(prefix) => format!("{}:*", prefix),
            None => "*".to_string(),
        };

        let mut cursor = 0u64;
        let mut removed = 0u64;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(&match_pattern)
                .arg("COUNT")
                .arg(1000)
                .query_async(&mut *conn)
                .await
                .map_err(store_error)?;

            if !keys.is_empty() {
                let unlinked: u64 = conn.unlink(&keys).await.map_err(store_error)?;
                removed += unlinked;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(removed)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<CasOutcome> {
        // WATCH state belongs to this pooled connection and must not outlive
        // the call once it goes back to the pool
        let mut conn = self.get_connection().await?;
        let prefixed = self.prefixed_key(key);

        let _: () = redis::cmd("WATCH")
            .arg(&prefixed)
            .query_async(&mut *conn)
            .await
            .map_err(store_error)?;

        let outcome = match swap_watched(&mut *conn, &prefixed, expected, value, ttl).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let _: redis::RedisResult<()> =
                    redis::cmd("UNWATCH").query_async(&mut *conn).await;
                return Err(store_error(err));
            }
        };

        let mut stats = self.stats.write();
        match outcome {
            CasOutcome::Swapped => stats.writes += 1,
            _ => stats.conflicts += 1,
        }
        Ok(outcome)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            tags: false,
            tag_listing: false,
            expired_read: false,
            automatic_cleaning: true,
            infinite_lifetime: true,
            compare_and_swap: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_millis_keeps_sub_second_precision() {
        assert_eq!(ttl_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(ttl_millis(Duration::from_secs(60)), 60_000);
        assert_eq!(ttl_millis(Duration::ZERO), 1);
        assert_eq!(ttl_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_extended_millis_saturates() {
        assert_eq!(extended_millis(1_000, Duration::from_millis(500)), 1_500);
        assert_eq!(extended_millis(1_000, Duration::MAX), i64::MAX);
        assert_eq!(
            extended_millis(i64::MAX - 1, Duration::from_secs(10)),
            i64::MAX
        );
    }

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
    }

    #[tokio::test]
    #[ignore = "needs a running Redis (REDIS_URL)"]
    async fn test_failed_compare_and_swap_releases_watch() {
        let store = RedisStore::new(RedisConfig::new(redis_url()).pool_size(1))
            .await
            .unwrap();

        let client = redis::Client::open(redis_url()).unwrap();
        let mut raw = client.get_multiplexed_async_connection().await.unwrap();
        let list_key = "tagkv:test:cas:list";
        let plain_key = "tagkv:test:cas:plain";
        let _: () = raw.del(&[list_key, plain_key]).await.unwrap();
        let _: () = raw.rpush(list_key, "x").await.unwrap();

        // GET on a list fails after WATCH was sent
        assert!(
            store
                .compare_and_swap(list_key, None, b"v".to_vec(), None)
                .await
                .is_err()
        );

        // Same pooled connection: a leftover WATCH on the list would abort this EXEC
        assert!(store.delete(list_key).await.unwrap());
        let outcome = store
            .compare_and_swap(plain_key, None, b"v".to_vec(), Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(outcome, CasOutcome::Swapped);

        let _: () = raw.del(plain_key).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "needs a running Redis (REDIS_URL)"]
    async fn test_sub_second_ttl_is_kept() {
        let store = RedisStore::new(RedisConfig::new(redis_url())).await.unwrap();
        let key = "tagkv:test:ttl";

        store
            .set(key, b"v".to_vec(), Some(Duration::from_millis(1500)))
            .await
            .unwrap();
        let remaining = store
            .metadata(key)
            .await
            .unwrap()
            .and_then(|meta| meta.ttl_remaining())
            .unwrap();
        assert!(remaining > Duration::from_millis(1000));
        assert!(remaining <= Duration::from_millis(1500));

        store.delete(key).await.unwrap();
    }
}
