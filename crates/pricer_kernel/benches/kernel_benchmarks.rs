//! Criterion benchmarks for pricer_kernel path simulation.
//!
//! Benchmarks cover:
//! - Normal draw throughput
//! - Short-rate path generation (100, 500, 2000 paths on a 5Y weekly grid)
//! - Mean path reduction

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::market_data::curves::FlatCurve;
use pricer_core::types::Date;
use pricer_kernel::mc::{ShortRatePathGenerator, SimulationConfig};
use pricer_kernel::rng::{NormalSource, PricerRng};
use pricer_models::models::rates::{HullWhiteModel, HullWhiteParams};
use pricer_models::schedules::SimulationGrid;

fn five_year_weekly_grid() -> SimulationGrid {
    SimulationGrid::new(
        Date::from_ymd(2018, 12, 14).unwrap(),
        Date::from_ymd(2023, 12, 14).unwrap(),
        "1W".parse().unwrap(),
    )
    .unwrap()
}

/// Benchmark RNG generation (foundation for MC simulations).
fn bench_rng_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rng_generation");

    for n_samples in [1_000, 10_000, 100_000] {
        group.bench_with_input(
            BenchmarkId::new("fill_normal", n_samples),
            &n_samples,
            |b, &n| {
                let mut rng = PricerRng::from_seed(42);
                let mut buffer = vec![0.0; n];
                b.iter(|| {
                    rng.fill_normal(&mut buffer);
                    black_box(buffer[n - 1])
                });
            },
        );
    }

    group.finish();
}

/// Benchmark Hull-White path generation.
fn bench_path_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("hw_path_generation");
    let curve = FlatCurve::new(0.03);
    let model = HullWhiteModel::new(HullWhiteParams::new(0.1421842834, 0.0081355969).unwrap(), &curve);
    let grid = five_year_weekly_grid();

    for n_paths in [100, 500, 2_000] {
        let config = SimulationConfig::builder()
            .n_paths(n_paths)
            .seed(42)
            .build()
            .unwrap();
        let generator = ShortRatePathGenerator::new(model, &grid, config);

        group.bench_with_input(BenchmarkId::from_parameter(n_paths), &generator, |b, g| {
            b.iter(|| g.generate())
        });
    }

    group.finish();
}

fn bench_mean_path(c: &mut Criterion) {
    let curve = FlatCurve::new(0.03);
    let model = HullWhiteModel::new(HullWhiteParams::new(0.1421842834, 0.0081355969).unwrap(), &curve);
    let grid = five_year_weekly_grid();
    let config = SimulationConfig::builder().n_paths(500).seed(7).build().unwrap();
    let (paths, _) = ShortRatePathGenerator::new(model, &grid, config)
        .generate()
        .unwrap();

    c.bench_function("mean_path_500x262", |b| b.iter(|| black_box(&paths).mean_path()));
}

criterion_group!(
    benches,
    bench_rng_generation,
    bench_path_generation,
    bench_mean_path
);
criterion_main!(benches);
