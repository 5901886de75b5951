use criterion::{criterion_group, criterion_main, Criterion, BenchmarkId, Throughput};
use threadwork::{
    map::map_parallel,
    pool::{map_parallel_with, Config as PoolConfig},
    reduce::reduce1_parallel,
};
use std::hint::black_box;

fn busy(x: &u64) -> u64 {
    (0..64).fold(*x, |acc, i| acc.wrapping_mul(6364136223846793005).wrapping_add(i))
}

// Benchmark 1: пул против потока на элемент
fn bench_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("map");

    for size in [100u64, 1000] {
        group.throughput(Throughput::Elements(size));
        let items: Vec<u64> = (0..size).collect();

        group.bench_with_input(BenchmarkId::new("pool_cpu_bound", size), &items, |b, items| {
            let config = PoolConfig::cpu_bound();
            b.iter(|| black_box(map_parallel_with(&config, busy, items).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("thread_per_item", size), &items, |b, items| {
            b.iter(|| {
                let owned = items.clone();
                black_box(map_parallel(|x: u64| busy(&x), owned).unwrap())
            });
        });

        group.bench_with_input(BenchmarkId::new("sequential", size), &items, |b, items| {
            b.iter(|| black_box(items.iter().map(busy).collect::<Vec<_>>()));
        });
    }

    group.finish();
}

// Benchmark 2: попарная свёртка
fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");

    for size in [16u64, 128] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("reduce1_parallel", size), &size, |b, &size| {
            b.iter(|| black_box(reduce1_parallel(|a: u64, b: u64| a ^ busy(&b), (0..size).collect()).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_map, bench_reduce);
criterion_main!(benches);
