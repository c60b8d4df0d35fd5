use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use osavl_tree::AvlTree;
use std::collections::BTreeMap;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn key_sets() -> [(&'static str, Vec<i64>); 3] {
    let reversed = ordered_keys(N).into_iter().rev().collect();
    [("ordered", ordered_keys(N)), ("reverse", reversed), ("random", random_keys(N))]
}

// ─── CRUD Benchmarks ────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    for (name, keys) in key_sets() {
        let mut group = c.benchmark_group(format!("insert_{name}"));

        group.bench_function(BenchmarkId::new("AvlTree", N), |b| {
            b.iter(|| {
                let mut tree = AvlTree::new();
                for &k in &keys {
                    tree.insert(k, k);
                }
                tree
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });

        group.finish();
    }
}

fn bench_get(c: &mut Criterion) {
    for (name, keys) in key_sets() {
        let tree: AvlTree<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

        let mut group = c.benchmark_group(format!("get_{name}"));

        group.bench_function(BenchmarkId::new("AvlTree", N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for &k in &keys {
                    if let Some(&v) = tree.get(&k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for &k in &keys {
                    if let Some(&v) = map.get(&k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });

        group.finish();
    }
}

fn bench_remove(c: &mut Criterion) {
    for (name, keys) in key_sets() {
        let mut group = c.benchmark_group(format!("remove_{name}"));

        group.bench_function(BenchmarkId::new("AvlTree", N), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<AvlTree<i64, i64>>(),
                |mut tree| {
                    for &k in &keys {
                        tree.remove(&k);
                    }
                    tree
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>(),
                |mut map| {
                    for &k in &keys {
                        map.remove(&k);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });

        group.finish();
    }
}

// ─── Order-Statistic Benchmarks ─────────────────────────────────────────────

fn bench_select(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: AvlTree<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let len = tree.len();

    let mut group = c.benchmark_group("select");

    group.bench_function(BenchmarkId::new("AvlTree", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for rank in (1..=len).step_by(97) {
                if let Some((&k, _)) = tree.select(rank) {
                    sum = sum.wrapping_add(k);
                }
            }
            sum
        });
    });

    // BTreeMap has no rank index, so it pays a linear scan.
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for rank in (1..=len).step_by(97) {
                if let Some((&k, _)) = map.iter().nth(rank - 1) {
                    sum = sum.wrapping_add(k);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: AvlTree<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    c.bench_function("rank/AvlTree", |b| {
        b.iter(|| {
            let mut sum = 0usize;
            for k in keys.iter().step_by(97) {
                sum += tree.rank(k).unwrap_or(0);
            }
            sum
        });
    });
}

// ─── Iteration Benchmarks ───────────────────────────────────────────────────

fn bench_iter(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree: AvlTree<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("iter");

    group.bench_function(BenchmarkId::new("AvlTree", N), |b| {
        b.iter(|| tree.iter().fold(0i64, |acc, (_, &v)| acc.wrapping_add(v)));
    });

    group.bench_function(BenchmarkId::new("AvlTree/preorder", N), |b| {
        b.iter(|| tree.preorder().fold(0i64, |acc, (_, &v)| acc.wrapping_add(v)));
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| map.iter().fold(0i64, |acc, (_, &v)| acc.wrapping_add(v)));
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(crud_benches, bench_insert, bench_get, bench_remove,);

criterion_group!(order_statistic_benches, bench_select, bench_rank,);

criterion_group!(iter_benches, bench_iter,);

criterion_main!(crud_benches, order_statistic_benches, iter_benches,);
