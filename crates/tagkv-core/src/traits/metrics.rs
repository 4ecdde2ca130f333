//! Metrics trait for cache observability

use std::time::Duration;

use crate::MatchMode;

/// Cache operation for latency tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    Load,
    Save,
    Remove,
    Touch,
    TagRead,
    TagWrite,
    Invalidate,
    Clean,
}

impl CacheOperation {
    /// Get operation as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOperation::Load => "load",
            CacheOperation::Save => "save",
            CacheOperation::Remove => "remove",
            CacheOperation::Touch => "touch",
            CacheOperation::TagRead => "tag_read",
            CacheOperation::TagWrite => "tag_write",
            CacheOperation::Invalidate => "invalidate",
            CacheOperation::Clean => "clean",
        }
    }
}

/// Trait for cache metrics/observability
///
/// Implement this to integrate with your metrics system (Prometheus, StatsD, etc.)
pub trait CacheMetrics: Send + Sync + 'static {
    /// Record a load that found its entry
    fn record_hit(&self, id: &str);

    /// Record a load that found nothing
    fn record_miss(&self, id: &str);

    /// Record operation latency
    fn record_latency(&self, operation: CacheOperation, duration: Duration);

    /// Record the outcome of a tag-based invalidation
    fn record_invalidation(&self, mode: MatchMode, matched: usize, removed: u64);
}

/// No-op metrics implementation (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl CacheMetrics for NoopMetrics {
    #[inline]
    fn record_hit(&self, _id: &str) {}

    #[inline]
    fn record_miss(&self, _id: &str) {}

    #[inline]
    fn record_latency(&self, _operation: CacheOperation, _duration: Duration) {}

    #[inline]
    fn record_invalidation(&self, _mode: MatchMode, _matched: usize, _removed: u64) {}
}

/// Metrics adapter using the `metrics` crate
///
/// Integrates with Prometheus, StatsD, and other exporters via the `metrics` ecosystem.
///
/// # Example
/// ```ignore
/// use tagkv_core::MetricsCrateAdapter;
///
/// let metrics = MetricsCrateAdapter::new("tagkv");
/// // Emits: tagkv_hits_total, tagkv_invalidated_total, etc.
/// ```
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsCrateAdapter {
    prefix: String,
}

#[cfg(feature = "metrics")]
impl MetricsCrateAdapter {
    /// Create a new adapter with the given metric name prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn metric_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }
}

#[cfg(feature = "metrics")]
impl CacheMetrics for MetricsCrateAdapter {
    fn record_hit(&self, _id: &str) {
        metrics::counter!(self.metric_name("hits_total")).increment(1);
    }

    fn record_miss(&self, _id: &str) {
        metrics::counter!(self.metric_name("misses_total")).increment(1);
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        metrics::histogram!(
            self.metric_name("operation_duration_seconds"),
            "operation" => operation.as_str()
        )
        .record(duration.as_secs_f64());
    }

    fn record_invalidation(&self, mode: MatchMode, matched: usize, removed: u64) {
        metrics::counter!(self.metric_name("invalidations_total"), "mode" => mode.as_str())
            .increment(1);
        metrics::counter!(self.metric_name("matched_total"), "mode" => mode.as_str())
            .increment(matched as u64);
        metrics::counter!(self.metric_name("invalidated_total"), "mode" => mode.as_str())
            .increment(removed);
    }
}
