use codspeed_criterion_compat::{criterion_group, criterion_main, BenchmarkId, Criterion};
use explain_uf::{MergeStrategy, UnionFind};

const STRATEGIES: [MergeStrategy; 2] = [MergeStrategy::RootAttachment, MergeStrategy::PathReversal];

// Pairs that build a long chain and then tie it into a few loose ends,
// so that explanations have to decompose repeatedly.
fn pairs(n: i64) -> Vec<(i64, i64)> {
    let mut pairs: Vec<(i64, i64)> = (0..n).map(|i| (i, i + 1)).collect();
    pairs.extend((0..n / 4).map(|i| (n + 1 + i, (i * 7) % n)));
    pairs
}

fn build(strategy: MergeStrategy, pairs: &[(i64, i64)]) -> UnionFind {
    let mut uf = UnionFind::with_strategy(strategy);
    for &(p, q) in pairs {
        uf.merge(p, q);
    }
    uf
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let pairs = pairs(500);
    let mut group = c.benchmark_group("union-find");
    for strategy in STRATEGIES {
        group.bench_with_input(BenchmarkId::new("merge", strategy), &pairs, |b, pairs| {
            b.iter(|| build(strategy, pairs))
        });

        let uf = build(strategy, &pairs);
        group.bench_with_input(BenchmarkId::new("explain", strategy), &uf, |b, uf| {
            b.iter(|| uf.clone().explain(0, 500).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
