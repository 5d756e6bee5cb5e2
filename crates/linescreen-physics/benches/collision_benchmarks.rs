//! Detection benchmarks: quadtree pipeline vs the brute-force reference.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use linescreen_core::config::IndexConfig;
use linescreen_physics::{
    detect_events_brute, query_events, query_events_parallel, EventSink, Line, Point,
    SpatialIndex, Vector,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_lines(count: u32, seed: u64) -> Vec<Line> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let x = rng.gen_range(0.0..1.0);
            let y = rng.gen_range(0.0..1.0);
            let dx = rng.gen_range(-0.03..0.03);
            let dy = rng.gen_range(-0.03..0.03);
            let vx = rng.gen_range(-0.2..0.2);
            let vy = rng.gen_range(-0.2..0.2);
            Line::new(
                i,
                Point::new(x, y),
                Point::new(x + dx, y + dy),
                Vector::new(vx, vy),
            )
        })
        .collect()
}

fn bench_detection(c: &mut Criterion) {
    let dt = 0.05;
    let config = IndexConfig::default();
    let mut group = c.benchmark_group("detection");

    for &n in &[64u32, 256, 1024] {
        let lines = random_lines(n, 0xbeef);

        group.bench_with_input(BenchmarkId::new("quadtree", n), &lines, |b, lines| {
            b.iter(|| {
                let index = SpatialIndex::build(lines, dt, &config).unwrap();
                let mut sink = EventSink::new();
                query_events(&index, dt, &mut sink).unwrap();
                sink.collisions()
            })
        });

        group.bench_with_input(
            BenchmarkId::new("quadtree_parallel", n),
            &lines,
            |b, lines| {
                b.iter(|| {
                    let index = SpatialIndex::build(lines, dt, &config).unwrap();
                    query_events_parallel(&index, dt).unwrap().collisions()
                })
            },
        );

        group.bench_with_input(BenchmarkId::new("brute", n), &lines, |b, lines| {
            b.iter(|| {
                let mut sink = EventSink::new();
                detect_events_brute(lines, dt, &mut sink);
                sink.collisions()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detection);
criterion_main!(benches);
