//! Benchmarks for the in-memory connector and envelope codec.
//!
//! Benchmarks cover:
//! - Queue operations (queue/pull round-trips)
//! - Duplicate detection overhead
//! - Envelope encode/decode

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::hint::black_box;

use quesadilla::core::{JsonCodec, TaskCodec, TaskConnector, TaskEnvelope, TaskId};
use quesadilla::infra::InMemoryConnector;
use quesadilla::util::now_ms;

use rand::Rng;
use tokio::runtime::Runtime;

// ============================================================================
// Helper Functions
// ============================================================================

fn build_task(n: u64) -> TaskEnvelope {
    let mut rng = rand::rng();
    TaskEnvelope::new(
        TaskId::generate(),
        "bench",
        "jobs",
        format!("task-{n}"),
        serde_json::json!({
            "n": n,
            "jitter": rng.random::<u64>(),
            "queued_at_ms": u64::try_from(now_ms()).unwrap_or(u64::MAX),
        }),
    )
}

fn filled_connector(count: u64) -> InMemoryConnector<JsonCodec> {
    let connector = InMemoryConnector::new(JsonCodec);
    for n in 0..count {
        connector.queue_sync(build_task(n)).unwrap();
    }
    connector
}

// ============================================================================
// Queue Operations
// ============================================================================

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("connector_queue");
    group.throughput(Throughput::Elements(1));

    group.bench_function("queue_sync", |b| {
        b.iter_batched(
            || (InMemoryConnector::new(JsonCodec), build_task(0)),
            |(connector, task)| connector.queue_sync(black_box(task)).unwrap(),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("duplicate_rejection", |b| {
        b.iter_batched(
            || {
                let connector = InMemoryConnector::new(JsonCodec);
                let task = build_task(0);
                connector.queue_sync(task.clone()).unwrap();
                (connector, task)
            },
            |(connector, task)| {
                let _ = black_box(connector.queue_sync(task));
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_pull(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("connector_pull");
    group.throughput(Throughput::Elements(64));

    group.bench_function("pull_64_of_256", |b| {
        b.iter_batched(
            || filled_connector(256),
            |connector| {
                rt.block_on(async {
                    for _ in 0..64 {
                        black_box(connector.pull("bench", "jobs").await.unwrap());
                    }
                });
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// Codec
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = JsonCodec;
    let task = build_task(7).start();
    let encoded = codec.encode(&task).unwrap();

    group.bench_function("encode", |b| {
        b.iter(|| codec.encode(black_box(&task)).unwrap());
    });
    group.bench_function("decode", |b| {
        b.iter(|| codec.decode(black_box(&encoded)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_queue, bench_pull, bench_codec);
criterion_main!(benches);
