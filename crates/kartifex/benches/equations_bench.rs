//! Criterion benchmarks for the closed-form polynomial solvers.
//! Coefficients are drawn once per batch so the solvers see a mix of one- and
//! three-root cubics.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use kartifex::equations::{solve_cubic, solve_quadratic};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn coefficients(n: usize, seed: u64) -> Vec<[f64; 4]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| [(); 4].map(|_| rng.gen_range(-10.0..10.0)))
        .collect()
}

fn bench_equations(c: &mut Criterion) {
    let mut group = c.benchmark_group("equations");
    group.bench_function("solve_quadratic_x256", |b| {
        b.iter_batched(
            || coefficients(256, 11),
            |cs| {
                for [a, b, c, _] in cs {
                    let _ = solve_quadratic(a, b, c);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("solve_cubic_x256", |b| {
        b.iter_batched(
            || coefficients(256, 12),
            |cs| {
                for [a, b, c, d] in cs {
                    let _ = solve_cubic(a, b, c, d);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_equations);
criterion_main!(benches);
