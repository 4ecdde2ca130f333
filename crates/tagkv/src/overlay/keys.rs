//! Physical key formatting for entries and tag sets

use tagkv_core::{CacheError, Result};

/// Marker every tag-set key starts with
pub const TAG_KEY_PREFIX: &str = "tag___";

/// Maps logical entry ids and tag names onto physical store keys
///
/// Entry keys are `prefix + id`. Tag-set keys are `tag___ + tag` and skip the
/// prefix. Entry keys that would start with the tag marker are rejected, so
/// the two kinds of key never collide.
#[derive(Debug, Clone, Default)]
pub struct KeyNormalizer {
    prefix: String,
}

impl KeyNormalizer {
    /// Create a normalizer for the given namespace prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The configured namespace prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Physical key of an entry
    pub fn entry_key(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Physical key of a tag set
    pub fn tag_key(tag: &str) -> String {
        format!("{}{}", TAG_KEY_PREFIX, tag)
    }

    /// Physical key of an entry, after checking the id is usable
    pub fn checked_entry_key(&self, id: &str) -> Result<String> {
        check_name(id)?;
        let key = self.entry_key(id);
        if key.starts_with(TAG_KEY_PREFIX) {
            return Err(CacheError::InvalidKey(format!(
                "entry key {:?} uses the reserved {:?} prefix",
                key, TAG_KEY_PREFIX
            )));
        }
        Ok(key)
    }

    /// Check a tag name is usable
    pub fn check_tag(tag: &str) -> Result<()> {
        check_name(tag)
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CacheError::InvalidKey("empty name".to_string()));
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CacheError::InvalidKey(format!(
            "{:?} contains whitespace or control characters",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key_uses_prefix() {
        let keys = KeyNormalizer::new("app_");
        assert_eq!(keys.entry_key("user:1"), "app_user:1");
        assert_eq!(keys.checked_entry_key("user:1").unwrap(), "app_user:1");
    }

    #[test]
    fn test_tag_key_skips_prefix() {
        assert_eq!(KeyNormalizer::tag_key("users"), "tag___users");
    }

    #[test]
    fn test_reserved_prefix_rejected() {
        let keys = KeyNormalizer::default();
        assert!(matches!(
            keys.checked_entry_key("tag___users"),
            Err(CacheError::InvalidKey(_))
        ));

        // A prefix keeps such ids out of the tag keyspace
        let keys = KeyNormalizer::new("app_");
        assert!(keys.checked_entry_key("tag___users").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        let keys = KeyNormalizer::default();
        assert!(keys.checked_entry_key("").is_err());
        assert!(keys.checked_entry_key("has space").is_err());
        assert!(KeyNormalizer::check_tag("line\nbreak").is_err());
        assert!(KeyNormalizer::check_tag("users").is_ok());
    }
}
