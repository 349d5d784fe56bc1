//! Benchmarks for LfuCache.
//!
//! Run with: `cargo bench --bench lfu`

use std::hint::black_box;
use std::time::Instant;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use freqcache::policy::lfu::LfuCache;
use freqcache::traits::{CoreCache, LfuCacheTrait, MutableCache};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CAPACITY: usize = 16_384;
const OPS: u64 = 100_000;

fn filled(capacity: usize) -> LfuCache<u64, u64> {
    let mut cache = LfuCache::new(capacity);
    for i in 0..capacity as u64 {
        cache.add(i, i);
    }
    cache
}

// ============================================================================
// Insert + Get benchmarks (mixed operations)
// ============================================================================

fn bench_lfu_insert_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_policy");
    group.throughput(Throughput::Elements(1024 * 2));

    group.bench_function("insert_get", |b| {
        b.iter_batched(
            || filled(1024),
            |mut cache| {
                for i in 0..1024u64 {
                    cache.add(black_box(i + 10_000), i);
                    let _ = black_box(cache.get(&black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Eviction churn benchmarks (continuous eviction pressure)
// ============================================================================

fn bench_lfu_eviction_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_policy");
    group.throughput(Throughput::Elements(4096));

    group.bench_function("eviction_churn", |b| {
        b.iter_batched(
            || filled(1024),
            |mut cache| {
                for i in 0..4096u64 {
                    cache.add(black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });

    // Hot half of the keys is touched first so the heap is deep when churn begins.
    group.bench_function("eviction_churn_skewed", |b| {
        b.iter_batched(
            || {
                let mut cache = filled(1024);
                for round in 0..4 {
                    for i in 0..512u64 {
                        let _ = cache.get(&(i * 2 + round % 2));
                    }
                }
                cache
            },
            |mut cache| {
                for i in 0..4096u64 {
                    cache.add(black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Get hit benchmarks (pure read performance)
// ============================================================================

fn bench_lfu_get_hit_ns(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_get_hit_ns");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("sequential", |b| {
        b.iter_custom(|iters| {
            let mut cache = filled(CAPACITY);
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS {
                    let key = i % (CAPACITY as u64);
                    let _ = black_box(cache.get(&key));
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("random", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        let keys: Vec<u64> = (0..OPS)
            .map(|_| rng.random_range(0..CAPACITY as u64))
            .collect();
        b.iter_custom(|iters| {
            let mut cache = filled(CAPACITY);
            let start = Instant::now();
            for _ in 0..iters {
                for key in &keys {
                    let _ = black_box(cache.get(key));
                }
            }
            start.elapsed()
        })
    });

    group.finish();
}

// ============================================================================
// Delete / pop benchmarks (arbitrary heap removal)
// ============================================================================

fn bench_lfu_delete_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_remove");
    group.throughput(Throughput::Elements(CAPACITY as u64));

    group.bench_function("delete_all", |b| {
        b.iter_batched(
            || filled(CAPACITY),
            |mut cache| {
                for i in 0..CAPACITY as u64 {
                    let _ = black_box(cache.delete(&i));
                }
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("pop_lfu_all", |b| {
        b.iter_batched(
            || filled(CAPACITY),
            |mut cache| {
                while let Some(entry) = cache.pop_lfu() {
                    black_box(entry);
                }
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lfu_insert_get,
    bench_lfu_eviction_churn,
    bench_lfu_get_hit_ns,
    bench_lfu_delete_pop
);
criterion_main!(benches);
