//! Matching, cleaning and conditional-write modes

/// How a set of tags selects entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Entries tagged with every requested tag (intersection)
    All,
    /// Entries tagged with at least one requested tag (union)
    Any,
}

impl MatchMode {
    /// Get mode as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::All => "all",
            MatchMode::Any => "any",
        }
    }
}

/// Bulk clean handled natively by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCleanMode {
    /// Remove every key
    All,
    /// Remove only keys past their lifetime
    Expired,
}

/// Bulk clean requested from the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanMode {
    /// Remove every key, tag sets included
    All,
    /// Remove only entries past their lifetime
    Expired,
    /// Remove entries tagged with every one of these tags
    MatchingAllTags(Vec<String>),
    /// Remove entries tagged with at least one of these tags
    MatchingAnyTag(Vec<String>),
}

/// Result of a conditional write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The expected value matched and the new value was written
    Swapped,
    /// The current value differed; nothing was written
    Conflict,
    /// The store has no conditional write
    Unsupported,
}
