// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_touch_source --heading-base-level=0

//! Canopy Touch Source: the flow-controlled per-client event channel.
//!
//! ## Overview
//!
//! One [`TouchSource`] is bound per ordinary contender. The owning tracker
//! enqueues pointer samples and contest results onto it; the client drives the
//! watch/reply cycle:
//!
//! 1. The client calls [`TouchSource::watch`] with one response per event it
//!    was given in the previous delivery (empty on the very first call).
//! 2. The channel validates the reply against what is owed, hands the
//!    extracted votes back to the caller, and either delivers up to
//!    [`TOUCH_MAX_EVENT`] queued events or goes pending.
//! 3. A pending watch is an explicit flag, not a blocked thread; when events
//!    arrive later, the dispatcher collects the prepared batch with
//!    [`TouchSource::take_delivery`] and completes the client's call.
//!
//! ## Validity
//!
//! Any protocol violation closes the channel immediately and permanently:
//! a second watch while one is pending, a response count that does not match
//! the owed events, a vote supplied for a contest result, a missing vote for
//! a pointer sample, or an illegal [`TouchSource::update_response`]. Closure
//! is observable only on this channel; the owner treats it as an implicit
//! forfeit.
//!
//! ## Batch decoration
//!
//! Delivered batches piggyback device-identifying metadata the first time a
//! device is seen on the channel, and view parameters on the first sample of
//! a batch when they differ from the last value sent (unchanged geometry is
//! never re-sent). Event timestamps are monotonically non-decreasing.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod error;
pub mod event;
pub mod source;

pub use error::ChannelError;
pub use event::{DeviceInfo, EventKind, TouchEvent, ViewParameters};
pub use source::{Delivery, TouchSource, TOUCH_MAX_EVENT};
