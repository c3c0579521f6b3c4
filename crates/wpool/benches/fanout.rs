use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use wpool::WorkerPool;

fn fanout_to_n(n: u32) {
    let values: Vec<u32> = (0..n).collect();
    let pool = WorkerPool::new(
        |v: u32| -> Result<u32, String> { Ok(v + 1) },
        values,
        n as usize,
        Duration::from_secs(10),
    );
    pool.start();
    let successes = pool.block_until_target_successes().unwrap();
    black_box(successes);
    pool.join().unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("fanout_100_cheap_workers", |b| {
        b.iter(|| fanout_to_n(black_box(100)))
    });
    c.bench_function("fanout_1000_cheap_workers", |b| {
        b.iter(|| fanout_to_n(black_box(1000)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
