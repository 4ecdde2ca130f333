//! Error types for cache operations

use thiserror::Error;

/// Main error type for all cache operations
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// The underlying store call failed outright
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Entry id or tag name is not usable as a store key
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Compare-and-swap retries on a tag set were exhausted
    #[error("tag set update conflict for tag {tag} after {attempts} attempts")]
    TagUpdateConflict { tag: String, attempts: u32 },
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::StoreUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "store unavailable: connection refused");

        let err = CacheError::InvalidKey("tag___x".to_string());
        assert_eq!(err.to_string(), "invalid key: tag___x");

        let err = CacheError::TagUpdateConflict {
            tag: "users".to_string(),
            attempts: 8,
        };
        assert_eq!(
            err.to_string(),
            "tag set update conflict for tag users after 8 attempts"
        );
    }

    #[test]
    fn test_error_clone() {
        let err = CacheError::Deserialization("eof".to_string());
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
