//! Store capability report

/// Features a store (or the overlay on top of it) supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Entries can be saved with tags and invalidated by tag
    pub tags: bool,
    /// All known tags can be enumerated
    pub tag_listing: bool,
    /// Values past their lifetime can still be read until purged
    pub expired_read: bool,
    /// Expired keys are purged without an explicit clean
    pub automatic_cleaning: bool,
    /// Values can be stored without expiration
    pub infinite_lifetime: bool,
    /// `compare_and_swap` is implemented
    pub compare_and_swap: bool,
}
