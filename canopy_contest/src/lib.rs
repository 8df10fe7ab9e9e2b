// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_contest --heading-base-level=0

//! Canopy Contest: touch stream arbitration.
//!
//! ## Overview
//!
//! This crate decides which of several candidate receivers wins a continuous
//! touch interaction (a *stream*). The injection boundary feeds raw samples
//! plus hit-test candidates into a [`ContestTracker`]; the tracker routes
//! each sample to an optional privileged gatekeeper first, then fans it out
//! to the candidates' flow-controlled event channels, and scores the votes
//! coming back until exactly one winner (or none) remains.
//!
//! - One stream per interaction, created at its `Add` sample and keyed by a
//!   caller-supplied [`canopy_pointer::StreamId`].
//! - One [`canopy_touch_source::TouchSource`] channel per registered
//!   contender; replies carry [`canopy_pointer::GestureResponse`] votes.
//! - First `Yes` wins; every other live contender is told it lost. All-`No`
//!   resolves with no winner. `Hold` defers, and an absent reply defers
//!   forever — the tracker never invents a default winner.
//! - The accessibility gatekeeper gets first refusal on every stream that
//!   begins while it is registered: it may consume the stream outright or
//!   reject it, releasing the buffered samples to ordinary fan-out.
//! - Outcomes feed a [`canopy_inspect::ContestInspector`] for rolling-minute
//!   diagnostics.
//!
//! ## Concurrency model
//!
//! Everything happens on one logical dispatch sequence. Pending client
//! watches are explicit flags on the channels; after injecting or processing
//! replies, the dispatcher completes them via
//! [`ContestTracker::take_delivery`]. Arbitration is deterministic given a
//! fixed injection and reply order.
//!
//! # Example
//!
//! ```rust
//! use canopy_contest::{Candidate, ContestTracker};
//! use canopy_inspect::ManualMinute;
//! use canopy_pointer::{
//!     ContenderId, DeviceId, GestureResponse, PointerId, SamplePhase, StreamId, TouchSample,
//!     Viewport,
//! };
//! use kurbo::{Affine, Point, Rect};
//!
//! let mut tracker = ContestTracker::new(ManualMinute::new(0));
//! let a = ContenderId(1);
//! assert!(tracker.register_contender(a));
//!
//! // The client watches; nothing is owed or available yet.
//! let _ = tracker.watch(a, &[]).unwrap();
//!
//! let sample = TouchSample {
//!     device: DeviceId(1),
//!     pointer: PointerId(1),
//!     phase: SamplePhase::Add,
//!     position: Point::new(10.0, 10.0),
//!     viewport: Viewport {
//!         transform: Affine::IDENTITY,
//!         extents: Rect::new(0.0, 0.0, 100.0, 100.0),
//!     },
//!     time: 1,
//! };
//! let hit = [Candidate { contender: a, view_bounds: Rect::new(0.0, 0.0, 50.0, 50.0) }];
//! tracker.inject(StreamId(1), sample, &hit);
//!
//! // The pending watch now completes with the buffered sample.
//! let batch = tracker.take_delivery(a).unwrap();
//! assert_eq!(batch.len(), 1);
//!
//! // Claiming the stream delivers the win on the next cycle.
//! let _ = tracker.watch(a, &[Some(GestureResponse::Yes)]).unwrap();
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod gatekeeper;
pub mod stream;
pub mod tracker;

pub use gatekeeper::{GatekeeperDecision, GatekeeperEvent};
pub use stream::{Candidate, GateState, Resolution, StreamFlags};
pub use tracker::ContestTracker;
