// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contest basics.
//!
//! Two contenders receive the same swipe. One holds its vote, the other
//! claims the gesture; the claimant wins and the holder is told it lost and
//! stops receiving samples.
//!
//! Run:
//! - `cargo run -p canopy_demos --example contest_basics`

use canopy_contest::{Candidate, ContestTracker};
use canopy_inspect::ManualMinute;
use canopy_pointer::{
    ContenderId, DeviceId, GestureResponse, PointerId, SamplePhase, StreamId, TouchSample, Viewport,
};
use canopy_touch_source::{Delivery, TouchEvent};
use kurbo::{Affine, Point, Rect};

const SCROLLER: ContenderId = ContenderId(1);
const BUTTON: ContenderId = ContenderId(2);

fn sample(phase: SamplePhase, x: f64, time: u64) -> TouchSample {
    TouchSample {
        device: DeviceId(1),
        pointer: PointerId(1),
        phase,
        position: Point::new(x, 50.0),
        viewport: Viewport {
            transform: Affine::IDENTITY,
            extents: Rect::new(0.0, 0.0, 800.0, 600.0),
        },
        time,
    }
}

fn show(who: &str, events: &[TouchEvent]) {
    for event in events {
        println!("  {who} <- {:?}", event.kind);
    }
}

fn main() {
    let mut tracker = ContestTracker::new(ManualMinute::new(0));
    tracker.register_contender(SCROLLER);
    tracker.register_contender(BUTTON);

    // Both clients park a watch before anything happens.
    let _ = tracker.watch(SCROLLER, &[]);
    let _ = tracker.watch(BUTTON, &[]);

    // A finger lands on the button, which sits inside the scroller. The hit
    // test reports the button topmost.
    let hit = [
        Candidate {
            contender: BUTTON,
            view_bounds: Rect::new(300.0, 200.0, 500.0, 300.0),
        },
        Candidate {
            contender: SCROLLER,
            view_bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
        },
    ];
    let s = StreamId(1);
    tracker.inject(s, sample(SamplePhase::Add, 400.0, 1_000), &hit);

    println!("== Finger down ==");
    show("button  ", &tracker.take_delivery(BUTTON).unwrap());
    show("scroller", &tracker.take_delivery(SCROLLER).unwrap());

    // The finger moves; the button is unsure, the scroller recognizes a
    // drag and claims the stream. The win arrives on the scroller's next
    // watch; the button learns its loss alongside the sample it missed.
    tracker.inject(s, sample(SamplePhase::Change, 430.0, 2_000), &hit);
    println!("== Drag: scroller claims, button holds ==");
    if let Ok(Delivery::Batch(events)) = tracker.watch(SCROLLER, &[Some(GestureResponse::Yes)]) {
        show("scroller", &events);
    }
    if let Ok(Delivery::Batch(events)) = tracker.watch(SCROLLER, &[Some(GestureResponse::Yes)]) {
        show("scroller", &events);
    }
    if let Ok(Delivery::Batch(events)) = tracker.watch(BUTTON, &[Some(GestureResponse::Hold)]) {
        show("button  ", &events);
    }

    // The rest of the swipe goes to the winner only.
    tracker.inject(s, sample(SamplePhase::Change, 520.0, 3_000), &hit);
    tracker.inject(s, sample(SamplePhase::Remove, 600.0, 4_000), &hit);
    println!("== Swipe continues for the winner ==");
    if let Ok(Delivery::Batch(events)) = tracker.watch(SCROLLER, &[None]) {
        show("scroller", &events);
    }

    let report = tracker.inspector().report();
    println!("== Totals ==");
    println!("  injected: {}", report.sum.injected_events);
    println!("  won:      {}", report.sum.won_streams);
    println!("  lost:     {}", report.sum.lost_streams);
}
