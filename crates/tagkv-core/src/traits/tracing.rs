use crate::{CacheMetrics, CacheOperation, MatchMode};
use std::time::Duration;
use tracing::debug;

/// Metrics adapter that logs events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    /// Service name/prefix (optional)
    service_name: Option<String>,
}

impl TracingMetrics {
    /// Create new tracing metrics adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with service name prefix
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl CacheMetrics for TracingMetrics {
    fn record_hit(&self, id: &str) {
        debug!(
            target: "tagkv",
            event = "hit",
            id = %id,
            service = ?self.service_name,
            "Cache Hit"
        );
    }

    fn record_miss(&self, id: &str) {
        debug!(
            target: "tagkv",
            event = "miss",
            id = %id,
            service = ?self.service_name,
            "Cache Miss"
        );
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        tracing::trace!(
            target: "tagkv",
            event = "latency",
            operation = operation.as_str(),
            duration_ms = duration.as_millis(),
            service = ?self.service_name,
            "Cache Operation Latency"
        );
    }

    fn record_invalidation(&self, mode: MatchMode, matched: usize, removed: u64) {
        debug!(
            target: "tagkv",
            event = "invalidation",
            mode = mode.as_str(),
            matched = matched,
            removed = removed,
            service = ?self.service_name,
            "Tag Invalidation"
        );
    }
}
