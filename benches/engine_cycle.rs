//! Benchmarks for one engine cycle per host frame
//!
//! The engine runs load, variant corrections, the cabin state machine and
//! derived fields for every frame, so this bounds the host cadence.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use datalink::engine::{Engine, EngineCollaborators};
use datalink::providers::Discard;
use datalink::test_utils::{HostBlockBuilder, shared_canonical_schema};
use std::hint::black_box;

fn engine() -> Engine {
    Engine::new(
        shared_canonical_schema(),
        EngineCollaborators {
            writer: Box::new(Discard),
            bridge: Box::new(Discard),
            buttons: Box::new(Discard),
        },
        5.0,
    )
}

fn bench_on_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_on_frame");

    for (name, title) in [("generic", "Cessna 172 Skyhawk"), ("a310", "Airbus A310-300")] {
        let ground = HostBlockBuilder::new().title(title).build();
        let cruise = HostBlockBuilder::new().title(title).airborne(35_000.0, 0.0).build();
        group.throughput(Throughput::Bytes(ground.len() as u64));

        group.bench_function(name, |b| {
            let mut engine = engine();
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let block = if flip { &ground } else { &cruise };
                black_box(engine.on_frame(black_box(block)).is_ok())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_on_frame);
criterion_main!(benches);
