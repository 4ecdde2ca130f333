//! Cache key trait and implementations

use std::fmt::Display;

/// Trait for types that can be used as entry identifiers
///
/// Implement this trait to use custom types as entry ids.
pub trait CacheKey: Send + Sync {
    /// Generate the logical entry id
    fn cache_key(&self) -> String;
}

impl CacheKey for String {
    fn cache_key(&self) -> String {
        self.clone()
    }
}

impl CacheKey for &str {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl CacheKey for &String {
    fn cache_key(&self) -> String {
        (*self).clone()
    }
}

// Tuple implementations for composite ids

impl<T1: Display + Send + Sync, T2: Display + Send + Sync> CacheKey for (T1, T2) {
    fn cache_key(&self) -> String {
        format!("{}:{}", self.0, self.1)
    }
}

impl<T1: Display + Send + Sync, T2: Display + Send + Sync, T3: Display + Send + Sync> CacheKey
    for (T1, T2, T3)
{
    fn cache_key(&self) -> String {
        format!("{}:{}:{}", self.0, self.1, self.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_key() {
        let key = "report_42".to_string();
        assert_eq!(key.cache_key(), "report_42");
        assert_eq!((&key).cache_key(), "report_42");
    }

    #[test]
    fn test_tuple_keys() {
        assert_eq!(("user", 123).cache_key(), "user:123");
        assert_eq!(("org", 1, "user").cache_key(), "org:1:user");
    }
}
