//! Basic example demonstrating tagkv with the memory store

use std::time::Duration;
use tagkv::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== tagkv Basic Example ===\n");

    let store = MemoryStore::new(MemoryConfig::default());
    let cache = TaggedCache::with_config(store, TaggedCacheConfig::with_prefix("app_"));

    // Three entries sharing two tags
    println!("Saving entries...");
    cache
        .save(
            "user:1",
            b"alice".to_vec(),
            SaveOpts::new().ttl_secs(300).tag("users"),
        )
        .await?;
    cache
        .save(
            "team:1",
            b"platform".to_vec(),
            SaveOpts::new().ttl_secs(300).tag("teams"),
        )
        .await?;
    cache
        .save(
            "membership:1:1",
            b"alice@platform".to_vec(),
            SaveOpts::new().ttl_secs(300).tags(["users", "teams"]),
        )
        .await?;

    match cache.load("user:1", false).await? {
        Some(payload) => println!("✅ Loaded user:1 = {}", String::from_utf8_lossy(&payload)),
        None => println!("❌ user:1 missing"),
    }

    if let Some(meta) = cache.metadata("user:1").await? {
        println!("   {} bytes, TTL remaining: {:?}", meta.size, meta.ttl_remaining());
    }

    cache.touch("user:1", Duration::from_secs(600)).await?;

    println!("\nTagged with users AND teams:");
    println!("   {:?}", cache.ids_matching_all_tags(&["users", "teams"]).await?);
    println!("Tagged with users OR teams:");
    println!("   {:?}", cache.ids_matching_any_tags(&["users", "teams"]).await?);

    // Drop only what carries both tags
    println!("\nInvalidating entries tagged users AND teams...");
    let report = cache.invalidate(MatchMode::All, &["users", "teams"]).await?;
    println!(
        "   matched {:?}, removed {}",
        report.matched, report.removed
    );

    for id in ["user:1", "team:1", "membership:1:1"] {
        let state = if cache.exists(id).await?.is_some() {
            "present"
        } else {
            "gone"
        };
        println!("   {}: {}", id, state);
    }

    println!("\nCapabilities: {:?}", cache.capabilities());

    Ok(())
}
