//! Core types for cache operations

mod capabilities;
mod metadata;
mod modes;
mod options;
mod report;
mod stats;

pub use capabilities::Capabilities;
pub use metadata::EntryMetadata;
pub use modes::{CasOutcome, CleanMode, MatchMode, StoreCleanMode};
pub use options::{SaveOptions, SaveOpts};
pub use report::InvalidationReport;
pub use stats::StoreStats;
