//! Heap benchmarks.
//!
//! Compares the bulk insertion strategies against each other and against
//! repeated single insertion, and measures draining from both ends.

use cow_collections::collections::{BulkInsertStrategy, Heap};
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const SIZES: [usize; 3] = [100, 1000, 10000];

/// Deterministic pseudo-random input so that runs are comparable.
fn generate_elements(size: usize) -> Vec<u64> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        })
        .collect()
}

/// Returns the appropriate BatchSize based on input size.
fn batch_size_for(size: usize) -> BatchSize {
    if size < 1000 {
        BatchSize::SmallInput
    } else {
        BatchSize::LargeInput
    }
}

fn benchmark_bulk_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("heap_bulk_insert");
    let strategies = [
        ("heuristic", BulkInsertStrategy::default()),
        ("always_heapify", BulkInsertStrategy::AlwaysHeapify),
        ("always_bubble_up", BulkInsertStrategy::AlwaysBubbleUp),
    ];

    for size in SIZES {
        let base: Heap<u64> = generate_elements(size).into();
        let batch = generate_elements(size / 2);

        for (name, strategy) in strategies {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |bencher, &size| {
                bencher.iter_batched(
                    || (base.clone(), batch.clone()),
                    |(mut heap, batch)| {
                        heap.insert_all_with(batch, strategy);
                        black_box(heap)
                    },
                    batch_size_for(size),
                );
            });
        }
    }

    group.finish();
}

fn benchmark_construction(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("heap_construction");

    for size in SIZES {
        let elements = generate_elements(size);

        group.bench_with_input(BenchmarkId::new("from_vec", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || elements.clone(),
                |elements| black_box(Heap::from(elements)),
                batch_size_for(size),
            );
        });

        group.bench_with_input(BenchmarkId::new("insert_each", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || elements.clone(),
                |elements| {
                    let mut heap = Heap::new();
                    for element in elements {
                        heap.insert(element);
                    }
                    black_box(heap)
                },
                batch_size_for(size),
            );
        });
    }

    group.finish();
}

fn benchmark_drain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("heap_drain");

    for size in SIZES {
        let heap: Heap<u64> = generate_elements(size).into();

        group.bench_with_input(BenchmarkId::new("remove_min", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || heap.clone(),
                |mut heap| {
                    while let Some(element) = heap.remove_min() {
                        black_box(element);
                    }
                },
                batch_size_for(size),
            );
        });

        group.bench_with_input(BenchmarkId::new("remove_max", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || heap.clone(),
                |mut heap| {
                    while let Some(element) = heap.remove_max() {
                        black_box(element);
                    }
                },
                batch_size_for(size),
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_bulk_insert,
    benchmark_construction,
    benchmark_drain
);
criterion_main!(benches);
