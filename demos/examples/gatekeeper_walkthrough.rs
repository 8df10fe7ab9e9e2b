// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gatekeeper walkthrough.
//!
//! An accessibility gatekeeper gets first refusal on every new stream. It
//! consumes one swipe (the ordinary contender never sees it) and rejects a
//! tap, whose buffered samples then replay to the ordinary contender.
//!
//! Run:
//! - `cargo run -p canopy_demos --example gatekeeper_walkthrough`

use canopy_contest::{Candidate, ContestTracker, GatekeeperDecision, GatekeeperEvent};
use canopy_inspect::ManualMinute;
use canopy_pointer::{
    ContenderId, DeviceId, GestureResponse, PointerId, SamplePhase, StreamId, TouchSample, Viewport,
};
use canopy_touch_source::Delivery;
use kurbo::{Affine, Point, Rect};

const APP: ContenderId = ContenderId(1);

fn sample(phase: SamplePhase, position: Point, time: u64) -> TouchSample {
    TouchSample {
        device: DeviceId(1),
        pointer: PointerId(1),
        phase,
        position,
        viewport: Viewport {
            transform: Affine::IDENTITY,
            extents: Rect::new(0.0, 0.0, 800.0, 600.0),
        },
        time,
    }
}

fn show_gatekeeper(events: &[GatekeeperEvent]) {
    for event in events {
        match event {
            GatekeeperEvent::Sample {
                stream,
                phase,
                ndc,
                local,
                time,
            } => println!(
                "  gatekeeper <- {stream:?} {phase:?} ndc=({:.2}, {:.2}) local=({:.0}, {:.0}) t={time}",
                ndc.x, ndc.y, local.x, local.y
            ),
            GatekeeperEvent::TopmostChanged { stream, topmost } => {
                println!("  gatekeeper <- {stream:?} topmost changed to {topmost:?}");
            }
        }
    }
}

fn main() {
    let mut tracker = ContestTracker::new(ManualMinute::new(0));
    tracker.register_contender(APP);
    assert!(tracker.register_gatekeeper());
    let _ = tracker.watch(APP, &[]);

    let hit = [Candidate {
        contender: APP,
        view_bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
    }];

    // First interaction: a swipe the gatekeeper recognizes as one of its
    // own gestures and consumes. The app never hears about it.
    let swipe = StreamId(1);
    tracker.inject(swipe, sample(SamplePhase::Add, Point::new(100.0, 300.0), 1_000), &hit);
    tracker.inject(swipe, sample(SamplePhase::Change, Point::new(300.0, 300.0), 2_000), &hit);
    println!("== Swipe begins, gatekeeper watches ==");
    show_gatekeeper(&tracker.drain_gatekeeper_events());

    tracker.gatekeeper_decide(swipe, GatekeeperDecision::Consume);
    tracker.inject(swipe, sample(SamplePhase::Remove, Point::new(600.0, 300.0), 3_000), &hit);
    println!("== Swipe consumed; the app saw nothing ==");
    show_gatekeeper(&tracker.drain_gatekeeper_events());
    assert!(tracker.take_delivery(APP).is_none());

    // Second interaction: a tap the gatekeeper is not interested in. The
    // buffered samples replay to the app, which claims and wins.
    let tap = StreamId(2);
    tracker.inject(tap, sample(SamplePhase::Add, Point::new(400.0, 200.0), 4_000), &hit);
    tracker.gatekeeper_decide(tap, GatekeeperDecision::Reject);
    tracker.inject(tap, sample(SamplePhase::Remove, Point::new(400.0, 200.0), 5_000), &hit);

    println!("== Tap rejected; replayed to the app ==");
    if let Some(events) = tracker.take_delivery(APP) {
        for event in &events {
            println!("  app <- {:?}", event.kind);
        }
    }
    // Both samples arrived in one batch, so the reply owes two votes.
    // Claiming on the release wins, and the result comes back at once.
    if let Ok(Delivery::Batch(events)) = tracker.watch(
        APP,
        &[Some(GestureResponse::Maybe), Some(GestureResponse::Yes)],
    ) {
        for event in &events {
            println!("  app <- {:?}", event.kind);
        }
    }
    let _ = tracker.watch(APP, &[None]);

    let report = tracker.inspector().report();
    println!("== Totals ==");
    println!("  injected: {}", report.sum.injected_events);
    println!("  won:      {}", report.sum.won_streams);
}
