//! Entry metadata type

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// What a store knows about a live key, without its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Size of the stored value in bytes
    pub size: usize,
    /// When the key expires (`None` = never)
    pub expires_at: Option<SystemTime>,
    /// When the value was last written, if the store tracks it
    pub modified_at: Option<SystemTime>,
}

impl EntryMetadata {
    /// Create metadata for a value of `size` bytes with no expiry
    pub fn new(size: usize) -> Self {
        Self {
            size,
            expires_at: None,
            modified_at: None,
        }
    }

    /// Check if the key has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => SystemTime::now() >= at,
            None => false,
        }
    }

    /// Get remaining TTL (`None` = no expiry)
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.duration_since(SystemTime::now()).unwrap_or_default())
    }
}
