//! tagkv-core: Core traits and types for the tagkv library
//!
//! This crate provides the store contract, serialization, metrics and key
//! types shared by the tagkv stores and the tagging overlay.

mod error;
mod traits;
mod types;

pub use error::{CacheError, Result};
pub use traits::*;
pub use types::*;
