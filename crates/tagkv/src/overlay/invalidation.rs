//! Tag matching and bulk invalidation

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use tagkv_core::{
    CacheMetrics, CacheOperation, InvalidationReport, KvStore, MatchMode, Result, Serializer,
};
use tracing::{debug, warn};

use super::TaggedCache;
use super::keys::KeyNormalizer;

/// Requested tags with duplicates dropped, first occurrence order kept
pub(crate) fn distinct_tags<T: AsRef<str>>(tags: &[T]) -> Vec<&str> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(AsRef::as_ref)
        .filter(|tag| seen.insert(*tag))
        .collect()
}

/// Ids present in every tag set
///
/// No tag sets means no match. An id listed twice in one set still counts
/// once for that tag.
fn intersect(tag_sets: &[Vec<String>]) -> Vec<String> {
    if tag_sets.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for ids in tag_sets {
        let mut seen = HashSet::new();
        for id in ids.iter().map(String::as_str) {
            if !seen.insert(id) {
                continue;
            }
            let count = counts.entry(id).or_insert(0);
            if *count == 0 {
                order.push(id);
            }
            *count += 1;
        }
    }

    order
        .into_iter()
        .filter(|id| counts[id] == tag_sets.len())
        .map(str::to_string)
        .collect()
}

/// Ids present in at least one tag set, without duplicates
fn union(tag_sets: &[Vec<String>]) -> Vec<String> {
    let mut seen = HashSet::new();
    tag_sets
        .iter()
        .flatten()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

impl<S, C, M> TaggedCache<S, C, M>
where
    S: KvStore,
    C: Serializer,
    M: CacheMetrics,
{
    /// Ids tagged with every one of `tags`
    ///
    /// An empty tag list matches nothing.
    pub async fn ids_matching_all_tags<T: AsRef<str>>(&self, tags: &[T]) -> Result<Vec<String>> {
        let tag_sets = self.load_tag_sets(&distinct_tags(tags)).await?;
        Ok(intersect(&tag_sets))
    }

    /// Ids tagged with at least one of `tags`
    pub async fn ids_matching_any_tags<T: AsRef<str>>(&self, tags: &[T]) -> Result<Vec<String>> {
        let tag_sets = self.load_tag_sets(&distinct_tags(tags)).await?;
        Ok(union(&tag_sets))
    }

    /// Remove every entry matching `tags` under `mode`
    ///
    /// Each matched entry is deleted, then all matched ids are purged from
    /// every requested tag set, whichever tags they matched on. A failed
    /// delete or tag-set rewrite is logged and recorded in the report without
    /// stopping the rest; failing to read a tag set aborts before anything is
    /// deleted.
    pub async fn invalidate<T: AsRef<str>>(
        &self,
        mode: MatchMode,
        tags: &[T],
    ) -> Result<InvalidationReport> {
        let start = Instant::now();
        let tags = distinct_tags(tags);

        let tag_sets = self.load_tag_sets(&tags).await?;
        let matched = match mode {
            MatchMode::All => intersect(&tag_sets),
            MatchMode::Any => union(&tag_sets),
        };

        let mut report = InvalidationReport::new(mode);
        for id in &matched {
            match self.remove(id.as_str()).await {
                Ok(true) => report.removed += 1,
                Ok(false) => report.missing.push(id.clone()),
                Err(err) => {
                    warn!(id = %id, error = %err, "Failed to remove tagged entry, continuing");
                    report.failed.push(id.clone());
                }
            }
        }

        if !matched.is_empty() {
            let purge: HashSet<&str> = matched.iter().map(String::as_str).collect();
            for tag in &tags {
                if let Err(err) = self.tags.remove_ids(tag, &purge).await {
                    warn!(tag = %tag, error = %err, "Failed to purge invalidated ids from tag set");
                    report.unpurged_tags.push(tag.to_string());
                }
            }
        }

        debug!(
            mode = mode.as_str(),
            tags = ?tags,
            matched = matched.len(),
            removed = report.removed,
            missing = report.missing.len(),
            failed = report.failed.len(),
            unpurged_tags = report.unpurged_tags.len(),
            "Invalidated by tag"
        );

        report.matched = matched;
        self.metrics
            .record_invalidation(mode, report.matched.len(), report.removed);
        self.metrics
            .record_latency(CacheOperation::Invalidate, start.elapsed());
        Ok(report)
    }

    async fn load_tag_sets(&self, tags: &[&str]) -> Result<Vec<Vec<String>>> {
        let start = Instant::now();
        let mut tag_sets = Vec::with_capacity(tags.len());
        for tag in tags {
            KeyNormalizer::check_tag(tag)?;
            tag_sets.push(self.tags.ids_for_tag(tag).await?);
        }
        self.metrics
            .record_latency(CacheOperation::TagRead, start.elapsed());
        Ok(tag_sets)
    }
}
