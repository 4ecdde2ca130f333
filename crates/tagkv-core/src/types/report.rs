//! Invalidation report type

use super::modes::MatchMode;

/// Outcome of a tag-based invalidation
///
/// Invalidation is best-effort: a failed removal does not stop the
/// remaining ids from being processed, it is recorded in `failed`. A tag set
/// that could not be rewritten afterwards is recorded in `unpurged_tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Mode the match set was computed with
    pub mode: MatchMode,
    /// Ids selected by the requested tags
    pub matched: Vec<String>,
    /// Number of entries actually deleted
    pub removed: u64,
    /// Matched ids whose entry was already gone (dangling references)
    pub missing: Vec<String>,
    /// Matched ids whose removal failed
    pub failed: Vec<String>,
    /// Requested tags still listing matched ids because their rewrite failed
    pub unpurged_tags: Vec<String>,
}

impl InvalidationReport {
    /// Create an empty report
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            matched: Vec::new(),
            removed: 0,
            missing: Vec::new(),
            failed: Vec::new(),
            unpurged_tags: Vec::new(),
        }
    }

    /// Check if any removal or tag-set purge failed
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty() || !self.unpurged_tags.is_empty()
    }

    /// Check if nothing matched
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = InvalidationReport::new(MatchMode::All);
        assert!(report.is_empty());
        assert!(!report.is_partial());
        assert_eq!(report.removed, 0);
    }

    #[test]
    fn test_partial_report() {
        let mut report = InvalidationReport::new(MatchMode::Any);
        report.matched = vec!["a".into(), "b".into()];
        report.removed = 1;
        report.failed.push("b".into());

        assert!(!report.is_empty());
        assert!(report.is_partial());
    }

    #[test]
    fn test_unpurged_tag_makes_report_partial() {
        let mut report = InvalidationReport::new(MatchMode::Any);
        report.matched = vec!["a".into()];
        report.removed = 1;
        assert!(!report.is_partial());

        report.unpurged_tags.push("users".into());
        assert!(report.is_partial());
    }
}
