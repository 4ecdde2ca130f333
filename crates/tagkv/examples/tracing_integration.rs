use tagkv::TracingMetrics;
use tagkv::prelude::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // TRACE shows latency records, DEBUG the hit/miss and invalidation summaries
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    println!("🔍 Initialized tracing...");

    let store = MemoryStore::new(MemoryConfig::default());
    let metrics = TracingMetrics::new().with_service_name("example-service");

    let cache = TaggedCache::with_serializer_and_metrics(
        store,
        JsonSerializer,
        metrics,
        TaggedCacheConfig::default(),
    );

    println!("\n⚡ Saving tagged value...");
    cache
        .save("user:1", b"Alice".to_vec(), SaveOpts::new().ttl_secs(60).tag("users"))
        .await?;

    println!("\n⚡ Loading value (Hit)...");
    let hit = cache.load("user:1", false).await?;
    println!("   Got: {:?}", hit.as_deref().map(String::from_utf8_lossy));

    println!("\n⚡ Loading missing value (Miss)...");
    let miss = cache.load("user:99", false).await?;
    println!("   Got: {:?}", miss);

    println!("\n⚡ Invalidating by tag...");
    cache.invalidate(MatchMode::Any, &["users"]).await?;

    println!("\n⚡ Listing tags (unsupported, logs a warning)...");
    let _ = cache.list_tags();

    println!("\n✅ Check your console output for structured logs!");

    Ok(())
}
