//! Save options and builder

use std::time::Duration;

/// Options for saving one entry
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Explicit lifetime; `None` uses the overlay's default TTL
    pub ttl: Option<Duration>,
    /// Store without expiration, overriding `ttl` and the default
    pub persistent: bool,
    /// Tags to associate with the entry
    pub tags: Vec<String>,
}

/// Builder for SaveOptions with fluent API
#[derive(Debug, Clone, Default)]
pub struct SaveOpts(SaveOptions);

impl SaveOpts {
    /// Create new options builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set TTL
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.0.ttl = Some(duration);
        self
    }

    /// Set TTL in seconds
    pub fn ttl_secs(self, seconds: u64) -> Self {
        self.ttl(Duration::from_secs(seconds))
    }

    /// Set TTL in minutes
    pub fn ttl_mins(self, minutes: u64) -> Self {
        self.ttl(Duration::from_secs(minutes * 60))
    }

    /// Never expire
    pub fn persistent(mut self) -> Self {
        self.0.persistent = true;
        self
    }

    /// Add multiple tags
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add a single tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.0.tags.push(tag.into());
        self
    }

    /// Build the options
    pub fn build(self) -> SaveOptions {
        self.0
    }
}

impl From<SaveOpts> for SaveOptions {
    fn from(opts: SaveOpts) -> Self {
        opts.0
    }
}

impl From<Duration> for SaveOptions {
    fn from(ttl: Duration) -> Self {
        SaveOptions {
            ttl: Some(ttl),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let opts = SaveOpts::new().build();
        assert!(opts.ttl.is_none());
        assert!(!opts.persistent);
        assert!(opts.tags.is_empty());
    }

    #[test]
    fn test_builder_fluent() {
        let opts = SaveOpts::new()
            .ttl_mins(2)
            .tags(["tag1", "tag2"])
            .tag("tag3")
            .build();

        assert_eq!(opts.ttl, Some(Duration::from_secs(120)));
        assert_eq!(opts.tags, vec!["tag1", "tag2", "tag3"]);
    }

    #[test]
    fn test_from_duration() {
        let opts: SaveOptions = Duration::from_secs(300).into();
        assert_eq!(opts.ttl, Some(Duration::from_secs(300)));
        assert!(opts.tags.is_empty());
    }
}
