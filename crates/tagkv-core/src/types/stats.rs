//! Store statistics

/// Operation counters kept by a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Reads that found a live value
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Successful writes, conditional ones included
    pub writes: u64,
    /// Deletes of existing keys
    pub deletes: u64,
    /// Conditional writes rejected because the value changed
    pub conflicts: u64,
    /// Current number of keys
    pub size: usize,
}

impl StoreStats {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total reads (hits + misses)
    pub fn total_reads(&self) -> u64 {
        self.hits + self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = StoreStats::default();
        assert_eq!(stats.writes, 0);
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_hit_ratio() {
        let stats = StoreStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        assert!((stats.hit_ratio() - 0.8).abs() < f64::EPSILON);
        assert_eq!(stats.total_reads(), 100);
    }
}
