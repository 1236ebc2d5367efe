//! Criterion benchmarks for the static build.
//! Focus sizes: grid in {2, 3, 4, 6} (one obstacle per cell).
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p gapnav

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gapnav::cfg::BuildCfg;
use gapnav::scene::{random_scene, SceneCfg};
use gapnav::visgraph::VisGraph;

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &grid in &[2usize, 3, 4, 6] {
        let cfg = SceneCfg {
            grid,
            ..SceneCfg::default()
        };
        let polys = random_scene(&cfg, 41);
        group.bench_with_input(BenchmarkId::new("inline", grid), &polys, |b, polys| {
            b.iter(|| VisGraph::build(polys, &BuildCfg::default()).unwrap())
        });
        let pooled = BuildCfg {
            workers: 4,
            batch_size: 8,
        };
        group.bench_with_input(BenchmarkId::new("pool4", grid), &polys, |b, polys| {
            b.iter(|| VisGraph::build(polys, &pooled).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
