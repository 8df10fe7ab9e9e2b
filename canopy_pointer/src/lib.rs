// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_pointer --heading-base-level=0

//! Canopy Pointer: Kurbo-native touch/pointer sample types.
//!
//! Canopy Pointer is the foundation crate for the Canopy arbitration pipeline.
//!
//! - Describes one physical contact observation as a [`TouchSample`]: device and
//!   pointer identity, a [`SamplePhase`], a position, and a by-value [`Viewport`].
//! - Identifies one continuous interaction (first contact to release) by a stable
//!   [`StreamId`], supplied by the injection boundary.
//! - Carries the arbitration vocabulary: [`GestureResponse`] votes and the
//!   one-time [`ContestResult`] notification.
//!
//! It does not perform hit testing, arbitration, or delivery. Higher layers
//! (`canopy_contest`, `canopy_touch_source`) consume these types.
//!
//! # Example
//!
//! ```rust
//! use canopy_pointer::{SamplePhase, TouchSample, Viewport, DeviceId, PointerId};
//! use kurbo::{Affine, Point, Rect};
//!
//! let viewport = Viewport {
//!     transform: Affine::IDENTITY,
//!     extents: Rect::new(0.0, 0.0, 100.0, 100.0),
//! };
//!
//! let sample = TouchSample {
//!     device: DeviceId(1),
//!     pointer: PointerId(1),
//!     phase: SamplePhase::Add,
//!     position: Point::new(50.0, 25.0),
//!     viewport,
//!     time: 1_000,
//! };
//!
//! // Normalized device coordinates map the extents onto [-1, 1]².
//! let ndc = sample.viewport.to_ndc(sample.position);
//! assert_eq!(ndc, Point::new(0.0, -0.5));
//! ```
//!
//! ## Float semantics
//!
//! Positions and viewport extents are assumed finite (no NaNs), and viewport
//! extents are assumed non-empty wherever normalized coordinates are computed.
//! Debug builds may assert.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod ids;
pub mod response;
pub mod sample;

pub use ids::{ContenderId, DeviceId, PointerId, StreamId};
pub use response::{ContestResult, GestureResponse};
pub use sample::{SamplePhase, TouchSample, Viewport};
