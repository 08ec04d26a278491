//! Criterion benchmarks for leak-rate fitting and bounded sampling.
//!
//! Everything is generated in memory so runs are deterministic.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ldar_core::dist::{fit_dist, DistFamily, FittedDistribution};
use ldar_core::leak::LeakSampler;
use ldar_core::units::UnitConversion;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn synthetic_rates(n: usize) -> Vec<f64> {
    let dist = FittedDistribution::new(DistFamily::LogNormal, vec![1.2], 0.0, 0.5)
        .expect("valid lognorm");
    let mut rng = StdRng::seed_from_u64(42);
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

fn bench_sampling(c: &mut Criterion) {
    let dist = FittedDistribution::new(DistFamily::LogNormal, vec![1.8], 0.0, (-2.0f64).exp())
        .expect("valid lognorm");

    let mut group = c.benchmark_group("leak_sampler");
    for (name, max_size, units) in [
        ("unbounded", None, None),
        ("bounded", Some(1.0), None),
        ("bounded_kg_per_hour", Some(1.0), Some(UnitConversion::new("kilogram", "hour"))),
    ] {
        let sampler = LeakSampler::new(&dist)
            .with_max_size(max_size)
            .with_conversion(units);
        group.bench_function(BenchmarkId::new("sample", name), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                let value = sampler.sample(&mut rng).expect("sample");
                black_box(value);
            })
        });
    }
    group.finish();
}

fn bench_fitting(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_dist");
    for n in [100usize, 10_000] {
        let rates = synthetic_rates(n);
        for family in [DistFamily::LogNormal, DistFamily::Gamma, DistFamily::WeibullMin] {
            group.bench_with_input(
                BenchmarkId::new(family.name(), n),
                &rates,
                |b, rates| {
                    b.iter(|| {
                        let fitted = fit_dist(Some(black_box(rates)), family, 0.0, None, None)
                            .expect("fit should converge");
                        black_box(fitted.scale());
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_sampling, bench_fitting);
criterion_main!(benches);
