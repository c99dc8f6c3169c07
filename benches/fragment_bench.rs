use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crease_graph::prelude::*;

/// Random segment soup with a fixed seed so runs are comparable.
fn random_segments(count: usize, seed: u64) -> GraphDocument {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut coords = Vec::with_capacity(count * 2);
    let mut edges = Vec::with_capacity(count);
    for _ in 0..count {
        let a = coords.len();
        coords.push(vec![rng.r#gen::<f64>(), rng.r#gen::<f64>()]);
        coords.push(vec![rng.r#gen::<f64>(), rng.r#gen::<f64>()]);
        edges.push([a, a + 1]);
    }
    GraphDocument::from_seed(coords, edges, vec![])
}

fn bench_fragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragment");
    for &count in &[50usize, 100, 200, 400] {
        let document = random_segments(count, 42);
        group.bench_with_input(BenchmarkId::from_parameter(count), &document, |b, document| {
            b.iter_batched(
                || document.to_graph().unwrap(),
                |mut graph| graph.fragment(EPSILON).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    for &count in &[50usize, 100, 200] {
        let document = random_segments(count, 7);
        group.bench_with_input(BenchmarkId::from_parameter(count), &document, |b, document| {
            b.iter_batched(
                || document.to_graph().unwrap(),
                |mut graph| graph.rebuild(EPSILON).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fragment, bench_rebuild);
criterion_main!(benches);
