//! Benchmarks for the ETS fitting recursion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tseval::ets::{fit_ets, EtsSpec, EtsState, SmoothingParams};

fn generate_seasonal(n: usize, period: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            100.0
                + 0.1 * i as f64
                + 10.0 * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin()
        })
        .collect()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ets_fit");

    for size in [128, 512, 2048, 8192].iter() {
        let y = generate_seasonal(*size, 12);

        group.bench_with_input(BenchmarkId::new("ANN", size), size, |b, _| {
            let init = EtsState::level(y[0]);
            let params = SmoothingParams::level_only(0.3);
            b.iter(|| fit_ets(black_box(&y), &init, &EtsSpec::ann(), &params, 1))
        });

        group.bench_with_input(BenchmarkId::new("AAA_m12", size), size, |b, _| {
            let init = EtsState::level(y[0])
                .with_trend(0.1)
                .with_seasonal(vec![0.0; 12]);
            let params = SmoothingParams::new(0.3, 0.1, 0.1, 1.0);
            b.iter(|| fit_ets(black_box(&y), &init, &EtsSpec::aaa(12), &params, 10))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fit);
criterion_main!(benches);
