// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use canopy_contest::{Candidate, ContestTracker, GatekeeperDecision};
use canopy_inspect::ManualMinute;
use canopy_pointer::{
    ContenderId, DeviceId, GestureResponse, PointerId, SamplePhase, StreamId, TouchSample, Viewport,
};
use canopy_touch_source::Delivery;
use kurbo::{Affine, Point, Rect};

fn sample(phase: SamplePhase, time: u64) -> TouchSample {
    TouchSample {
        device: DeviceId(1),
        pointer: PointerId(1),
        phase,
        position: Point::new((time % 100) as f64, (time % 100) as f64),
        viewport: Viewport {
            transform: Affine::IDENTITY,
            extents: Rect::new(0.0, 0.0, 1000.0, 1000.0),
        },
        time,
    }
}

fn candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| Candidate {
            contender: ContenderId(i as u64),
            view_bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
        })
        .collect()
}

/// A tracker with `n` registered contenders, each with a parked watch.
fn tracker_with_contenders(n: usize) -> ContestTracker<ManualMinute> {
    let mut tracker = ContestTracker::new(ManualMinute::new(0));
    for i in 0..n {
        tracker.register_contender(ContenderId(i as u64));
        let _ = tracker.watch(ContenderId(i as u64), &[]);
    }
    tracker
}

/// Drive one full stream: inject, deliver, claim, acknowledge the win.
fn run_stream(tracker: &mut ContestTracker<ManualMinute>, id: StreamId, changes: u64, fan: usize) {
    let cands = candidates(fan);
    let mut time = id.0 * 1000;
    tracker.inject(id, sample(SamplePhase::Add, time), &cands);
    for _ in 0..changes {
        time += 1;
        tracker.inject(id, sample(SamplePhase::Change, time), &cands);
    }
    time += 1;
    tracker.inject(id, sample(SamplePhase::Remove, time), &cands);

    // The first contender claims; everyone else passes and drains.
    for i in 0..fan {
        let contender = ContenderId(i as u64);
        let Some(batch) = tracker.take_delivery(contender) else {
            continue;
        };
        let vote = if i == 0 {
            GestureResponse::Yes
        } else {
            GestureResponse::No
        };
        // Samples owe a vote, results owe an empty slot; the first event is
        // always this stream's `Add`.
        let mut responses: Vec<Option<GestureResponse>> = batch
            .iter()
            .map(|e| e.is_sample().then_some(GestureResponse::Maybe))
            .collect();
        responses[0] = Some(vote);
        // The reply delivers the contest result; acknowledge it so the next
        // watch parks again.
        if let Ok(Delivery::Batch(events)) = tracker.watch(contender, &responses) {
            let acks: Vec<Option<GestureResponse>> = events
                .iter()
                .map(|e| e.is_sample().then_some(GestureResponse::Maybe))
                .collect();
            let _ = tracker.watch(contender, &acks);
            black_box(events.len());
        }
    }
}

fn bench_single_contender(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_contender");
    for &changes in &[8u64, 32, 120] {
        group.throughput(Throughput::Elements(changes + 2));
        group.bench_function(format!("stream_changes_{changes}"), |b| {
            b.iter_batched(
                || tracker_with_contenders(1),
                |mut tracker| {
                    run_stream(&mut tracker, StreamId(1), changes, 1);
                    black_box(tracker.inspector().report().sum.injected_events);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    for &fan in &[2usize, 4, 16] {
        group.throughput(Throughput::Elements(34 * fan as u64));
        group.bench_function(format!("contenders_{fan}"), |b| {
            b.iter_batched(
                || tracker_with_contenders(fan),
                |mut tracker| {
                    run_stream(&mut tracker, StreamId(1), 32, fan);
                    black_box(tracker.inspector().report().sum.injected_events);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_many_streams(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_streams");
    for &streams in &[16u64, 64] {
        group.throughput(Throughput::Elements(streams * 10));
        group.bench_function(format!("sequential_{streams}"), |b| {
            b.iter_batched(
                || tracker_with_contenders(4),
                |mut tracker| {
                    for s in 1..=streams {
                        run_stream(&mut tracker, StreamId(s), 8, 4);
                    }
                    black_box(tracker.inspector().report().sum.won_streams);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_gatekeeper_reject_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("gatekeeper");
    let buffered = 64u64;
    group.throughput(Throughput::Elements(buffered + 1));
    group.bench_function("reject_replays_buffer", |b| {
        b.iter_batched(
            || {
                let mut tracker = tracker_with_contenders(1);
                tracker.register_gatekeeper();
                tracker
            },
            |mut tracker| {
                let cands = candidates(1);
                tracker.inject(StreamId(1), sample(SamplePhase::Add, 1), &cands);
                for t in 2..=buffered {
                    tracker.inject(StreamId(1), sample(SamplePhase::Change, t), &cands);
                }
                black_box(tracker.drain_gatekeeper_events().len());
                tracker.gatekeeper_decide(StreamId(1), GatekeeperDecision::Reject);
                let batch = tracker.take_delivery(ContenderId(0));
                black_box(batch.map(|b| b.len()));
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_single_contender,
    bench_fan_out,
    bench_many_streams,
    bench_gatekeeper_reject_replay,
);
criterion_main!(benches);
