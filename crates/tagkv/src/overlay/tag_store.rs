//! Tag sets persisted as ordinary store keys

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tagkv_core::{CacheError, CasOutcome, KvStore, Result, Serializer};
use tracing::{debug, warn};

use super::TagUpdateMode;
use super::keys::KeyNormalizer;

/// The set of entry ids carrying each tag
///
/// Each tag is one store key holding a serialized, ordered list of ids,
/// written with a fixed lifetime regardless of the entries' own TTLs.
/// Every mutation rewrites the whole list. In
/// [`TagUpdateMode::ReadModifyWrite`] two concurrent writers to the same tag
/// can lose an update; [`TagUpdateMode::CompareAndSwap`] closes that gap on
/// stores with a conditional write.
pub struct TagStore<S, C> {
    store: Arc<S>,
    serializer: Arc<C>,
    lifetime: Duration,
    mode: TagUpdateMode,
}

impl<S, C> TagStore<S, C>
where
    S: KvStore,
    C: Serializer,
{
    pub(crate) fn new(
        store: Arc<S>,
        serializer: Arc<C>,
        lifetime: Duration,
        mode: TagUpdateMode,
    ) -> Self {
        Self {
            store,
            serializer,
            lifetime,
            mode,
        }
    }

    /// Ids currently recorded for `tag`, in insertion order
    ///
    /// A missing or unreadable tag set yields no ids.
    pub async fn ids_for_tag(&self, tag: &str) -> Result<Vec<String>> {
        let raw = self.store.get(&KeyNormalizer::tag_key(tag)).await?;
        Ok(self.decode(tag, raw.as_deref()))
    }

    /// Append `id` to the tag set unless already present
    ///
    /// Returns `true` if the tag set was written.
    pub async fn add_id(&self, tag: &str, id: &str) -> Result<bool> {
        self.update(tag, |ids| {
            if ids.iter().any(|known| known == id) {
                return false;
            }
            ids.push(id.to_string());
            true
        })
        .await
    }

    /// Remove the first occurrence of `id` from the tag set
    ///
    /// Returns `true` if the tag set was written; removing an absent id
    /// writes nothing.
    pub async fn remove_id(&self, tag: &str, id: &str) -> Result<bool> {
        self.update(tag, |ids| match ids.iter().position(|known| known == id) {
            Some(index) => {
                ids.remove(index);
                true
            }
            None => false,
        })
        .await
    }

    /// Remove every occurrence of the given ids in a single rewrite
    pub async fn remove_ids(&self, tag: &str, purge: &HashSet<&str>) -> Result<bool> {
        self.update(tag, |ids| {
            let before = ids.len();
            ids.retain(|known| !purge.contains(known.as_str()));
            ids.len() != before
        })
        .await
    }

    fn decode(&self, tag: &str, raw: Option<&[u8]>) -> Vec<String> {
        let Some(bytes) = raw.filter(|bytes| !bytes.is_empty()) else {
            return Vec::new();
        };

        match self.serializer.deserialize::<Vec<String>>(bytes) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(
                    tag = %tag,
                    serializer = self.serializer.name(),
                    error = %err,
                    "Unreadable tag set, treating as empty"
                );
                Vec::new()
            }
        }
    }

    async fn update<F>(&self, tag: &str, mut mutate: F) -> Result<bool>
    where
        F: FnMut(&mut Vec<String>) -> bool + Send,
    {
        let key = KeyNormalizer::tag_key(tag);

        let max_attempts = match self.mode {
            TagUpdateMode::ReadModifyWrite => {
                let raw = self.store.get(&key).await?;
                let mut ids = self.decode(tag, raw.as_deref());
                if !mutate(&mut ids) {
                    return Ok(false);
                }
                self.write(&key, &ids).await?;
                return Ok(true);
            }
            TagUpdateMode::CompareAndSwap { max_attempts } => max_attempts.max(1),
        };

        for attempt in 1..=max_attempts {
            let raw = self.store.get(&key).await?;
            let mut ids = self.decode(tag, raw.as_deref());
            if !mutate(&mut ids) {
                return Ok(false);
            }

            let encoded = self.serializer.serialize(&ids)?;
            match self
                .store
                .compare_and_swap(&key, raw.as_deref(), encoded, Some(self.lifetime))
                .await?
            {
                CasOutcome::Swapped => return Ok(true),
                CasOutcome::Conflict => {
                    debug!(tag = %tag, attempt, "Tag set changed concurrently, retrying");
                }
                CasOutcome::Unsupported => {
                    debug!(tag = %tag, "Store has no compare-and-swap, writing unconditionally");
                    self.write(&key, &ids).await?;
                    return Ok(true);
                }
            }
        }

        Err(CacheError::TagUpdateConflict {
            tag: tag.to_string(),
            attempts: max_attempts,
        })
    }

    async fn write(&self, key: &str, ids: &[String]) -> Result<()> {
        let encoded = self.serializer.serialize(&ids)?;
        self.store.set(key, encoded, Some(self.lifetime)).await
    }
}

impl<S, C> Clone for TagStore<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            serializer: self.serializer.clone(),
            lifetime: self.lifetime,
            mode: self.mode,
        }
    }
}
