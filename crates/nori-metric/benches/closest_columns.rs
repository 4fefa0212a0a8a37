//! Benchmarks for closest-column search: built-in fast path vs. an
//! equivalent caller-supplied distance function.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nori_metric::{closest_columns, squared_dist_norm2, Matrix};

const DIMS: usize = 128;

fn generate_matrix(cols: usize) -> Matrix {
    let data: Vec<f64> = (0..cols * DIMS)
        .map(|i| ((i * 7919) % 1000) as f64 * 0.01)
        .collect();
    Matrix::new(DIMS, cols, data).expect("valid matrix shape")
}

fn bench_closest_columns(c: &mut Criterion) {
    let query: Vec<f64> = (0..DIMS).map(|i| (i % 10) as f64).collect();
    let external = |a: &[f64], b: &[f64]| squared_dist_norm2(a, b).unwrap_or(f64::INFINITY);

    for k in [1, 10, 100] {
        let mut group = c.benchmark_group(format!("closest_columns_k{}", k));

        for cols in [1_000, 10_000].iter() {
            let matrix = generate_matrix(*cols);

            group.bench_with_input(BenchmarkId::new("builtin", cols), cols, |bencher, _| {
                bencher.iter(|| {
                    closest_columns(
                        black_box(&matrix),
                        black_box(&query),
                        k,
                        None,
                        "squared_dist_norm2",
                    )
                })
            });

            group.bench_with_input(BenchmarkId::new("external", cols), cols, |bencher, _| {
                bencher.iter(|| {
                    closest_columns(
                        black_box(&matrix),
                        black_box(&query),
                        k,
                        Some(&external),
                        "bench.squared_l2",
                    )
                })
            });
        }

        group.finish();
    }
}

criterion_group!(benches, bench_closest_columns);
criterion_main!(benches);
