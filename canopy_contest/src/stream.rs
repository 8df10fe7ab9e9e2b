// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-stream arbitration state.

use alloc::vec::Vec;
use bitflags::bitflags;
use kurbo::Rect;

use canopy_pointer::{ContenderId, TouchSample};

/// One candidate receiver from a hit test: the contender and the bounds of
/// its view (local space), topmost first in the hit-test result.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidate {
    /// The competing receiver.
    pub contender: ContenderId,
    /// Bounds of the receiving view, reported with view parameters.
    pub view_bounds: Rect,
}

bitflags! {
    /// Compact per-stream bookkeeping bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StreamFlags: u8 {
        /// The `Remove` sample was observed; later samples are dropped.
        const SAW_REMOVE = 0b0000_0001;
        /// The contender set was adopted from a non-empty hit test and is
        /// now fixed; later hit tests only re-resolve the topmost view.
        const CANDIDATES_FIXED = 0b0000_0010;
    }
}

/// How far the gatekeeper has gotten with a stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GateState {
    /// No gatekeeper was registered when the stream began; ordinary fan-out
    /// proceeds immediately.
    NotOffered,
    /// Offered to the gatekeeper; ordinary fan-out is suppressed and samples
    /// buffer until it decides.
    Undecided,
    /// The gatekeeper consumed the stream; ordinary contenders are
    /// permanently excluded and the gatekeeper keeps receiving samples.
    Consumed,
    /// The gatekeeper rejected the stream (or disconnected); buffered and
    /// future samples flow to ordinary contenders.
    Rejected,
}

/// Resolution state of a stream's contest.
///
/// The terminal "drained" state is represented by the stream leaving the
/// tracker's arena once every recipient has consumed its buffered events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Resolution {
    /// No terminal vote yet; the contest may stay here forever if no
    /// contender ever answers.
    Undecided,
    /// Decided: `Some(winner)`, or `None` when every contender forfeited.
    Resolved(Option<ContenderId>),
}

/// A live stream in the tracker's arena. Contenders reference streams by
/// [`canopy_pointer::StreamId`], never by pointer.
#[derive(Clone, Debug)]
pub(crate) struct Stream {
    /// Still-eligible contenders with their view bounds, hit-test order.
    pub(crate) contenders: Vec<Candidate>,
    /// Current topmost candidate, re-resolved per sample for coordinate
    /// reporting. The stream id never changes with it.
    pub(crate) topmost: Option<ContenderId>,
    /// Samples (with their hit-test candidates) held back while the
    /// gatekeeper is undecided, replayed on reject.
    pub(crate) buffered: Vec<(TouchSample, Vec<Candidate>)>,
    pub(crate) resolution: Resolution,
    pub(crate) gate: GateState,
    pub(crate) flags: StreamFlags,
    /// Timestamp of the latest sample; stamps contest results.
    pub(crate) last_time: u64,
}

impl Stream {
    pub(crate) fn new(gate: GateState) -> Self {
        Self {
            contenders: Vec::new(),
            topmost: None,
            buffered: Vec::new(),
            resolution: Resolution::Undecided,
            gate,
            flags: StreamFlags::empty(),
            last_time: 0,
        }
    }

    /// Whether the contender is still eligible to win this stream.
    pub(crate) fn is_live(&self, contender: ContenderId) -> bool {
        self.contenders.iter().any(|c| c.contender == contender)
    }

    /// Drop a contender from the eligible set.
    pub(crate) fn remove_contender(&mut self, contender: ContenderId) {
        self.contenders.retain(|c| c.contender != contender);
    }
}
