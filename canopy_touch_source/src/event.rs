// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delivered events and their piggybacked metadata.

use canopy_pointer::{ContestResult, DeviceId, SamplePhase, StreamId, Viewport};
use kurbo::{Point, Rect};

/// Device-identifying metadata, emitted only the first time a given device
/// is seen on a channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DeviceInfo {
    /// The device this channel is now receiving samples from.
    pub device: DeviceId,
}

/// Geometry of the delivery: the sample's viewport plus the bounds of the
/// receiving view.
///
/// Emitted only on the first sample of a batch, and only when different from
/// the last value sent on the channel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewParameters {
    /// Coordinate space the batch's positions are expressed in.
    pub viewport: Viewport,
    /// Bounds of the receiving view, in its local space.
    pub view_bounds: Rect,
}

/// Payload of a delivered event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EventKind {
    /// A pointer sample. Owes exactly one [`canopy_pointer::GestureResponse`]
    /// in the next reply.
    Sample {
        /// Interaction the sample belongs to.
        stream: StreamId,
        /// Phase within the interaction.
        phase: SamplePhase,
        /// Position in viewport coordinates.
        position: Point,
    },
    /// The one-time contest outcome for a stream. Owes an empty response.
    Result {
        /// Interaction the outcome is for.
        stream: StreamId,
        /// Won or lost.
        result: ContestResult,
    },
}

/// One event delivered on a [`crate::TouchSource`] channel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchEvent {
    /// Delivery timestamp in nanoseconds; non-decreasing per channel.
    pub time: u64,
    /// Present on the first sample from a device not seen before.
    pub device_info: Option<DeviceInfo>,
    /// Present on the first sample of a batch when geometry changed.
    pub view_parameters: Option<ViewParameters>,
    /// Sample or contest result.
    pub kind: EventKind,
}

impl TouchEvent {
    /// The stream this event belongs to.
    pub fn stream(&self) -> StreamId {
        match self.kind {
            EventKind::Sample { stream, .. } | EventKind::Result { stream, .. } => stream,
        }
    }

    /// Whether this event is a pointer sample (and thus owes a vote).
    pub fn is_sample(&self) -> bool {
        matches!(self.kind, EventKind::Sample { .. })
    }
}
