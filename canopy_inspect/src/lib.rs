// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_inspect --heading-base-level=0

//! Canopy Inspect: bounded rolling-minute contest diagnostics.
//!
//! Canopy Inspect records, per contender and per wall-clock minute, how many
//! events were injected and how many stream contests were won or lost. It
//! retains only the most recent [`NUM_MINUTES_OF_HISTORY`] minute buckets.
//!
//! - Buckets are created lazily on the first write in a new minute.
//! - Stale buckets are evicted lazily on the next write — never by a timer,
//!   and never by a read.
//! - Reports are pull-based and side-effect free: [`ContestInspector::report`]
//!   filters stale buckets without mutating retained history, so reads are
//!   safe to interleave with assertions in tests.
//!
//! It is generic over the contender key `K` and takes its notion of "current
//! minute" from a pluggable [`MinuteSource`], so arbitration code stays
//! deterministic and only this crate's bucketing is wall-clock-dependent.
//!
//! # Example
//!
//! ```rust
//! use canopy_inspect::{ContestInspector, ManualMinute};
//!
//! let clock = ManualMinute::new(5);
//! let mut inspector: ContestInspector<u64, _> = ContestInspector::new(clock);
//!
//! inspector.on_injected_events(7, 3);
//! inspector.on_contest_decided(7, true);
//!
//! let report = inspector.report();
//! assert_eq!(report.sum.injected_events, 3);
//! assert_eq!(report.sum.won_streams, 1);
//! assert_eq!(report.minutes.len(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The `std` feature adds the
//! [`WallClock`] minute source.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod clock;
pub mod history;
pub mod report;

pub use clock::{ManualMinute, MinuteSource};
#[cfg(feature = "std")]
pub use clock::WallClock;
pub use history::{ContenderCounters, ContestInspector, NUM_MINUTES_OF_HISTORY};
pub use report::{MinuteNode, Report, ReportNode};
