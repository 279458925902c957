//! Event stream benchmarks.

use atomlog_testkit::prelude::{user_created, TestStream, Tick};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Benchmark appends to in-memory streams by page size.
fn bench_memory_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_append");

    for page_size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(page_size),
            page_size,
            |b, &page_size| {
                let stream = TestStream::memory(page_size);
                let mut n = 0;
                b.iter(|| {
                    n += 1;
                    let id = stream.append(black_box(Tick { n })).unwrap();
                    black_box(id);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark appends to file streams.
fn bench_file_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_append");
    group.sample_size(20);

    for page_size in [10, 100].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(page_size),
            page_size,
            |b, &page_size| {
                let stream = TestStream::file(page_size);
                b.iter(|| {
                    let id = stream.append(black_box(user_created("bench"))).unwrap();
                    black_box(id);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark full replays in both directions.
fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    group.sample_size(20);

    for count in [100u64, 1000].iter() {
        let stream = TestStream::memory(50);
        for n in 0..*count {
            stream.append(Tick { n }).unwrap();
        }

        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::new("forward", count), &stream, |b, stream| {
            b.iter(|| {
                let events = stream.forward().iter().count();
                black_box(events);
            });
        });
        group.bench_with_input(BenchmarkId::new("backward", count), &stream, |b, stream| {
            b.iter(|| {
                let events = stream.backward().iter().count();
                black_box(events);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_memory_append, bench_file_append, bench_replay);

criterion_main!(benches);
