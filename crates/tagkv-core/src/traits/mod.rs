//! Core traits for cache operations

mod key;
mod metrics;
mod serializer;
mod store;

#[cfg(feature = "tracing")]
mod tracing;

pub use key::CacheKey;
pub use metrics::{CacheMetrics, CacheOperation, NoopMetrics};
pub use serializer::{JsonSerializer, Serializer};
pub use store::KvStore;

#[cfg(feature = "metrics")]
pub use metrics::MetricsCrateAdapter;

#[cfg(feature = "tracing")]
pub use self::tracing::TracingMetrics;

#[cfg(feature = "msgpack")]
pub use serializer::MsgPackSerializer;

#[cfg(feature = "bincode")]
pub use serializer::BincodeSerializer;
