use tagkv::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    println!("Connecting to Redis at {}", redis_url);

    let config = RedisConfig::new(redis_url).pool_size(5).prefix("example");

    match RedisStore::new(config).await {
        Ok(store) => {
            // Redis supports WATCH/MULTI, so tag updates can be conditional
            let cache = TaggedCache::with_config(
                store,
                TaggedCacheConfig::with_prefix("app_").compare_and_swap(16),
            );

            cache
                .save(
                    "hello",
                    b"world".to_vec(),
                    SaveOpts::new().ttl_mins(5).tag("greetings"),
                )
                .await?;

            match cache.load("hello", false).await? {
                Some(payload) => println!("Hit: {}", String::from_utf8_lossy(&payload)),
                None => println!("Miss"),
            }

            println!(
                "Tagged greetings: {:?}",
                cache.ids_matching_any_tags(&["greetings"]).await?
            );

            let report = cache.invalidate(MatchMode::Any, &["greetings"]).await?;
            println!("Invalidated {} entries", report.removed);

            if cache.load("hello", false).await?.is_none() {
                println!("Key successfully invalidated");
            }
        }
        Err(e) => {
            println!("Skipping Redis example: {}", e);
        }
    }

    Ok(())
}
