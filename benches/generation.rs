//! Benchmarks for CPU-side galaxy generation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use stargen::params::Map;
use stargen::prelude::*;

fn spiral(count: u32) -> SpiralParameters {
    let mut params = SpiralParameters::default();
    params.set_count(count).unwrap();
    params
}

fn advanced(count: u32) -> AdvancedParameters {
    let mut params = AdvancedParameters::default();
    params.set_count(count).unwrap();
    params
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [10_000, 100_000, 300_000] {
        group.bench_with_input(BenchmarkId::new("spiral", count), &count, |b, &count| {
            let params = spiral(count);
            let mut rng = SmallRng::seed_from_u64(1);
            b.iter(|| black_box(params.generate(&mut rng)))
        });

        group.bench_with_input(BenchmarkId::new("advanced", count), &count, |b, &count| {
            let params = advanced(count);
            let mut rng = SmallRng::seed_from_u64(1);
            b.iter(|| black_box(params.generate(&mut rng)))
        });
    }

    group.finish();
}

fn bench_sampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler");
    let mut rng = SmallRng::seed_from_u64(7);

    group.bench_function("log_normal_distance", |b| {
        b.iter(|| black_box(stargen::sampler::sample_log_normal_distance(&mut rng, 1.0, 0.5)))
    });

    group.bench_function("half_gaussian", |b| {
        b.iter(|| black_box(stargen::sampler::sample_half_gaussian(&mut rng, 1.0)))
    });

    group.finish();
}

fn bench_apply_partial(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_partial");

    let update: Map<String, stargen::params::Value> = serde_json::json!({
        "count": 5000,
        "branches": 6,
        "randomnessPower": 2.5,
        "insideColor": "#ffffff",
        "unknownKey": true,
    })
    .as_object()
    .cloned()
    .unwrap();

    group.bench_function("spiral", |b| {
        let mut params = SpiralParameters::default();
        b.iter(|| black_box(params.apply_partial(&update).unwrap()))
    });

    group.finish();
}

fn bench_switch(c: &mut Criterion) {
    c.bench_function("universe_switch_10k", |b| {
        let mut universe = Universe::new(Scene::new());
        let a = universe.add_galaxy(Galaxy::new(spiral(10_000)).with_seed(1));
        let z = universe.add_galaxy(Galaxy::new(advanced(10_000)).with_seed(2));
        b.iter(|| {
            universe.set_active(a).unwrap();
            universe.set_active(z).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_sampler,
    bench_apply_partial,
    bench_switch,
);
criterion_main!(benches);
