//! Benchmarks for tagkv throughput and operations

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tagkv::{MatchMode, MemoryConfig, MemoryStore, SaveOptions, SaveOpts, TaggedCache};
use tokio::runtime::Runtime;

fn create_cache() -> TaggedCache<MemoryStore> {
    TaggedCache::new(MemoryStore::new(MemoryConfig::default()))
}

fn bench_save(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    let mut group = c.benchmark_group("save");
    group.throughput(Throughput::Elements(1));

    group.bench_function("untagged", |b| {
        b.iter(|| {
            rt.block_on(async {
                cache
                    .save(black_box("key"), vec![0u8; 64], SaveOptions::default())
                    .await
                    .unwrap();
            });
        });
    });

    // Re-saving an id already in its tags reads each tag set but writes none
    group.bench_function("two_tags", |b| {
        b.iter(|| {
            rt.block_on(async {
                cache
                    .save(
                        black_box("key"),
                        vec![0u8; 64],
                        SaveOpts::new().tags(["users", "teams"]),
                    )
                    .await
                    .unwrap();
            });
        });
    });

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    rt.block_on(async {
        cache
            .save("key", vec![0u8; 64], SaveOpts::new().ttl_secs(3600))
            .await
            .unwrap();
    });

    let mut group = c.benchmark_group("load");
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit", |b| {
        b.iter(|| {
            rt.block_on(async {
                let _ = black_box(cache.load(black_box("key"), false).await.unwrap());
            });
        });
    });

    group.bench_function("miss", |b| {
        b.iter(|| {
            rt.block_on(async {
                let _ = black_box(cache.load(black_box("missing"), false).await.unwrap());
            });
        });
    });

    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = create_cache();

    // Every id gets "even" or "odd"; one in ten also gets "tenth"
    rt.block_on(async {
        for n in 0..1_000 {
            let parity = if n % 2 == 0 { "even" } else { "odd" };
            let mut opts = SaveOpts::new().tag(parity);
            if n % 10 == 0 {
                opts = opts.tag("tenth");
            }
            cache
                .save(format!("item:{}", n), vec![0u8; 16], opts)
                .await
                .unwrap();
        }
    });

    let mut group = c.benchmark_group("matching");

    group.bench_function("all_of_two", |b| {
        b.iter(|| {
            rt.block_on(async {
                let _ = black_box(
                    cache
                        .ids_matching_all_tags(black_box(&["even", "tenth"]))
                        .await
                        .unwrap(),
                );
            });
        });
    });

    group.bench_function("any_of_two", |b| {
        b.iter(|| {
            rt.block_on(async {
                let _ = black_box(
                    cache
                        .ids_matching_any_tags(black_box(&["even", "odd"]))
                        .await
                        .unwrap(),
                );
            });
        });
    });

    group.finish();
}

fn bench_invalidate(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("invalidate");

    for size in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("any_{}", size), |b| {
            b.iter_batched(
                || {
                    let cache = create_cache();
                    rt.block_on(async {
                        for n in 0..size {
                            cache
                                .save(format!("item:{}", n), vec![0u8; 16], SaveOpts::new().tag("bulk"))
                                .await
                                .unwrap();
                        }
                    });
                    cache
                },
                |cache| {
                    rt.block_on(async {
                        cache.invalidate(MatchMode::Any, &["bulk"]).await.unwrap();
                    });
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_save,
    bench_load,
    bench_matching,
    bench_invalidate
);
criterion_main!(benches);
