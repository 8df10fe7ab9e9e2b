// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The privileged first-refusal observer (accessibility).
//!
//! At most one gatekeeper is registered at a time, held in an explicit
//! `Option` slot on the tracker. Every stream that begins while it is
//! registered is offered to it before ordinary contenders see anything; it
//! answers per stream with [`GatekeeperDecision::Consume`] or
//! [`GatekeeperDecision::Reject`]. Disconnecting mid-stream counts as a
//! reject for every stream it had not decided, so an unreachable gatekeeper
//! can never starve input.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use kurbo::Point;

use canopy_pointer::{ContenderId, SamplePhase, StreamId, TouchSample};

/// The gatekeeper's per-stream verdict.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GatekeeperDecision {
    /// Keep the stream: ordinary contenders are permanently excluded and the
    /// gatekeeper continues to receive all further samples.
    Consume,
    /// Release the stream: buffered and future samples flow to ordinary
    /// contenders as if the gatekeeper were absent.
    Reject,
}

/// One delivery on the gatekeeper's queue.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GatekeeperEvent {
    /// A sample of an undecided or consumed stream, carrying the same point
    /// in both normalized device coordinates and the topmost receiver's
    /// local space.
    Sample {
        /// Interaction the sample belongs to.
        stream: StreamId,
        /// Phase within the interaction.
        phase: SamplePhase,
        /// Position in normalized device coordinates.
        ndc: Point,
        /// Position in the topmost receiver's local space.
        local: Point,
        /// Sample timestamp in nanoseconds.
        time: u64,
    },
    /// Re-hit-testing changed which candidate is topmost for a live,
    /// undecided stream. A coordinate-space notice, not a vote.
    TopmostChanged {
        /// The affected interaction.
        stream: StreamId,
        /// The new topmost candidate, if any.
        topmost: Option<ContenderId>,
    },
}

/// Queue state for the registered gatekeeper.
#[derive(Clone, Debug, Default)]
pub(crate) struct Gatekeeper {
    queue: VecDeque<GatekeeperEvent>,
}

impl Gatekeeper {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_sample(&mut self, stream: StreamId, sample: &TouchSample) {
        self.queue.push_back(GatekeeperEvent::Sample {
            stream,
            phase: sample.phase,
            ndc: sample.viewport.to_ndc(sample.position),
            local: sample.viewport.to_local(sample.position),
            time: sample.time,
        });
    }

    pub(crate) fn push_topmost_changed(&mut self, stream: StreamId, topmost: Option<ContenderId>) {
        self.queue
            .push_back(GatekeeperEvent::TopmostChanged { stream, topmost });
    }

    pub(crate) fn drain(&mut self) -> Vec<GatekeeperEvent> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_pointer::{DeviceId, PointerId, Viewport};
    use kurbo::{Affine, Rect};

    #[test]
    fn sample_carries_both_coordinate_spaces() {
        let mut gate = Gatekeeper::new();
        let sample = TouchSample {
            device: DeviceId(1),
            pointer: PointerId(1),
            phase: SamplePhase::Add,
            position: Point::new(50.0, 50.0),
            viewport: Viewport {
                transform: Affine::translate((5.0, 5.0)),
                extents: Rect::new(0.0, 0.0, 100.0, 100.0),
            },
            time: 77,
        };
        gate.push_sample(StreamId(1), &sample);
        let events = gate.drain();
        assert_eq!(
            events,
            [GatekeeperEvent::Sample {
                stream: StreamId(1),
                phase: SamplePhase::Add,
                ndc: Point::new(0.0, 0.0),
                local: Point::new(55.0, 55.0),
                time: 77,
            }]
        );
        assert!(gate.drain().is_empty());
    }
}
