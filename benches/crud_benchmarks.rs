use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeSet;
use two_three_tree::TwoThreeSet;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_insert_ordered");

    group.bench_function(BenchmarkId::new("TwoThreeSet", N), |b| {
        b.iter(|| {
            let mut set = TwoThreeSet::new();
            for key in ordered_keys(N) {
                set.insert(key);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for key in ordered_keys(N) {
                set.insert(key);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_insert_random");
    let keys = random_keys(N);

    group.bench_function(BenchmarkId::new("TwoThreeSet", N), |b| {
        b.iter(|| {
            let mut set = TwoThreeSet::new();
            for &key in &keys {
                set.insert(key);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &key in &keys {
                set.insert(key);
            }
            set
        });
    });

    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_contains");
    let keys = random_keys(N);
    let tt_set: TwoThreeSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    group.bench_function(BenchmarkId::new("TwoThreeSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for key in &keys {
                if tt_set.contains(key) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for key in &keys {
                if bt_set.contains(key) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_remove");
    let keys = random_keys(N);
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    group.bench_function(BenchmarkId::new("TwoThreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<TwoThreeSet<i64>>(),
            |mut set| {
                for key in &keys {
                    set.remove(key);
                }
                set
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || bt_set.clone(),
            |mut set| {
                for key in &keys {
                    set.remove(key);
                }
                set
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_iterate");
    let keys = random_keys(N);
    let tt_set: TwoThreeSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    group.bench_function(BenchmarkId::new("TwoThreeSet", N), |b| {
        b.iter(|| tt_set.iter().copied().sum::<i64>());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| bt_set.iter().copied().sum::<i64>());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_ordered,
    bench_insert_random,
    bench_contains,
    bench_remove,
    bench_iterate
);
criterion_main!(benches);
