//! Benchmarks for simd-batch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use simd_batch::memory::{aligned_from_slice, AlignedVec};
use simd_batch::prelude::*;

fn generate_f32(n: usize, seed: u64) -> AlignedVec<f32> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let data: Vec<f32> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    aligned_from_slice(&data)
}

fn generate_i32(n: usize, seed: u64) -> AlignedVec<i32> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let data: Vec<i32> = (0..n).map(|_| rng.gen_range(1..1000)).collect();
    aligned_from_slice(&data)
}

fn benchmark_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");

    let a = Batch::<f32, 8>::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    let b = Batch::<f32, 8>::splat(0.5);
    group.bench_function("f32x8_add", |bench| bench.iter(|| black_box(a) + black_box(b)));
    group.bench_function("f32x8_mul", |bench| bench.iter(|| black_box(a) * black_box(b)));
    group.bench_function("f32x8_fma", |bench| {
        bench.iter(|| fma(black_box(a), black_box(b), black_box(a)))
    });
    group.bench_function("f32x8_div", |bench| bench.iter(|| black_box(a) / black_box(b)));
    group.bench_function("f32x8_sqrt", |bench| bench.iter(|| sqrt(black_box(a))));

    let x = Batch::<i32, 8>::new([10, 20, 30, 40, 50, 60, 70, 80]);
    let y = Batch::<i32, 8>::new([3, 7, 11, 13, 17, 19, 23, 29]);
    group.bench_function("i32x8_mul", |bench| bench.iter(|| black_box(x) * black_box(y)));
    group.bench_function("i32x8_div", |bench| bench.iter(|| black_box(x) / black_box(y)));

    group.finish();
}

fn benchmark_reductions(c: &mut Criterion) {
    let mut group = c.benchmark_group("reductions");

    let a = Batch::<f32, 4>::new([1.0, 2.0, 3.0, 4.0]);
    group.bench_function("f32x4_hadd", |bench| bench.iter(|| hadd(black_box(a))));
    group.bench_function("f32x4_haddp", |bench| {
        bench.iter(|| haddp(black_box([a, a + 1.0, a + 2.0, a + 3.0])))
    });

    let w = Batch::<f32, 16>::splat(0.25);
    group.bench_function("f32x16_hadd", |bench| bench.iter(|| hadd(black_box(w))));

    group.finish();
}

fn benchmark_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");

    let a = Batch::<i32, 8>::new([0, 1, 2, 3, 4, 5, 6, 7]);
    let b = Batch::<i32, 8>::splat(4);
    group.bench_function("i32x8_compare_select", |bench| {
        bench.iter(|| {
            let (a, b) = (black_box(a), black_box(b));
            select(a.simd_lt(b), a, b)
        })
    });
    group.bench_function("i32x8_bitmask", |bench| {
        bench.iter(|| black_box(a).simd_gt(black_box(b)).to_bitmask())
    });

    group.finish();
}

fn benchmark_slices(c: &mut Criterion) {
    let mut group = c.benchmark_group("slices");

    for &n in &[1_000, 10_000, 100_003] {
        let data = generate_f32(n, 42);

        group.bench_with_input(BenchmarkId::new("sum_f32x8", n), &n, |bench, _| {
            bench.iter(|| black_box(sum::<f32, 8>(&data)))
        });

        group.bench_with_input(BenchmarkId::new("sum_f32x8_misaligned", n), &n, |bench, _| {
            bench.iter(|| black_box(sum::<f32, 8>(&data[1..])))
        });

        let mut out = vec![0.0f32; n];
        group.bench_with_input(BenchmarkId::new("transform_f32x8", n), &n, |bench, _| {
            bench.iter(|| {
                transform::<f32, f32, _, 8>(&data, &mut out, |v| v.fma(v, Batch::splat(1.0)))
                    .unwrap();
                black_box(out[0])
            })
        });

        let ints = generate_i32(n, 7);
        let mut quotients = vec![0i32; n];
        group.bench_with_input(BenchmarkId::new("divide_i32x8", n), &n, |bench, _| {
            bench.iter(|| {
                transform::<i32, i32, _, 8>(&ints, &mut quotients, |v| Batch::splat(1_000_000) / v)
                    .unwrap();
                black_box(quotients[0])
            })
        });
    }

    group.finish();
}

fn benchmark_casts(c: &mut Criterion) {
    let mut group = c.benchmark_group("casts");

    let f = Batch::<f32, 8>::new([1.5, -2.5, 3.9, 1e10, -1e10, 0.0, f32::NAN, 7.0]);
    group.bench_function("f32x8_to_int", |bench| bench.iter(|| to_int(black_box(f))));
    group.bench_function("f32x8_batch_cast_i32", |bench| {
        bench.iter(|| batch_cast::<f32, i32, 8>(black_box(f)))
    });
    let i = Batch::<i32, 8>::splat(123_456);
    group.bench_function("i32x8_to_float", |bench| bench.iter(|| to_float(black_box(i))));

    group.finish();
}

criterion_group!(
    benches,
    benchmark_arithmetic,
    benchmark_reductions,
    benchmark_select,
    benchmark_slices,
    benchmark_casts,
);

criterion_main!(benches);
