//! Append throughput and query cost of the aggregation pyramid

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lodstream_core::{AvgPyramid, MinMaxPyramid, SegmentedPool};

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");
    const N: usize = 100_000;
    group.throughput(Throughput::Elements(N as u64));

    group.bench_function("pool_f32", |b| {
        b.iter(|| {
            let mut pool = SegmentedPool::new();
            for i in 0..N {
                pool.append(black_box(i as f32));
            }
            pool
        })
    });

    group.bench_function("minmax_f32", |b| {
        b.iter(|| {
            let mut pyramid = MinMaxPyramid::<f32>::new();
            for i in 0..N {
                pyramid.append(black_box(i as f32));
            }
            pyramid
        })
    });

    group.bench_function("minmax_i16", |b| {
        b.iter(|| {
            let mut pyramid = MinMaxPyramid::<i16>::new();
            for i in 0..N {
                pyramid.append(black_box(i as i16));
            }
            pyramid
        })
    });

    group.bench_function("avg_f32", |b| {
        b.iter(|| {
            let mut pyramid = AvgPyramid::<f32>::new();
            for i in 0..N {
                pyramid.append(black_box(i as f32));
            }
            pyramid
        })
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_range");
    let mut pyramid = MinMaxPyramid::<f32>::new();
    for i in 0..4_000_000u32 {
        pyramid.append((i % 1000) as f32);
    }

    for &span in &[1_000.0f64, 100_000.0, 4_000_000.0] {
        group.bench_with_input(BenchmarkId::new("span", span as u64), &span, |b, &span| {
            b.iter(|| {
                let range = pyramid.resolve_range(black_box(0.0), black_box(span), 1920.0);
                range.entries().fold(0.0f32, |acc, e| acc + e.maxval)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append, bench_resolve);
criterion_main!(benches);
