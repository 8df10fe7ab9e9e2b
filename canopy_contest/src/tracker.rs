// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The arbitration arena: streams, channels, gatekeeper slot, inspector.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt::Debug;

use canopy_inspect::{ContestInspector, MinuteSource};
use canopy_pointer::{
    ContenderId, ContestResult, GestureResponse, SamplePhase, StreamId, TouchSample,
};
use canopy_touch_source::{ChannelError, Delivery, TouchEvent, TouchSource};

use crate::gatekeeper::{Gatekeeper, GatekeeperDecision, GatekeeperEvent};
use crate::stream::{Candidate, GateState, Resolution, Stream, StreamFlags};

/// Routes injected touch samples to candidate receivers and arbitrates their
/// gesture claims, one contest per stream.
///
/// Streams live in an arena keyed by [`StreamId`]; contenders hold ids, never
/// references, so teardown in any order is safe. At most one gatekeeper is
/// registered at a time, held in an explicit `Option` slot.
pub struct ContestTracker<M: MinuteSource> {
    streams: BTreeMap<StreamId, Stream>,
    channels: BTreeMap<ContenderId, TouchSource>,
    gatekeeper: Option<Gatekeeper>,
    inspector: ContestInspector<ContenderId, M>,
}

impl<M: MinuteSource> Debug for ContestTracker<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContestTracker")
            .field("streams", &self.streams.len())
            .field("channels", &self.channels.len())
            .field("gatekeeper", &self.gatekeeper.is_some())
            .finish_non_exhaustive()
    }
}

impl<M: MinuteSource + Default> Default for ContestTracker<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: MinuteSource> ContestTracker<M> {
    /// Create an empty tracker whose diagnostics buckets on `minutes`.
    pub fn new(minutes: M) -> Self {
        Self {
            streams: BTreeMap::new(),
            channels: BTreeMap::new(),
            gatekeeper: None,
            inspector: ContestInspector::new(minutes),
        }
    }

    /// Register a contender and open its event channel.
    ///
    /// Returns `false` if the id is already registered; the existing channel
    /// is left untouched. A contender registered mid-stream joins contests
    /// for streams that begin afterwards only.
    pub fn register_contender(&mut self, contender: ContenderId) -> bool {
        if self.channels.contains_key(&contender) {
            return false;
        }
        self.channels.insert(contender, TouchSource::new());
        true
    }

    /// Tear down a contender's channel.
    ///
    /// For every stream where it was still eligible and undecided this
    /// counts as a `No` vote: remaining contenders keep contesting, and a
    /// stream left with no contenders resolves with no winner.
    pub fn disconnect_contender(&mut self, contender: ContenderId) {
        self.handle_disconnect(contender);
    }

    /// Register the gatekeeper, taking the exclusive slot.
    ///
    /// Returns `false` while another gatekeeper holds the slot. Streams
    /// already in progress are unaffected; only streams that begin from now
    /// on are offered.
    pub fn register_gatekeeper(&mut self) -> bool {
        if self.gatekeeper.is_some() {
            return false;
        }
        self.gatekeeper = Some(Gatekeeper::new());
        true
    }

    /// Unregister the gatekeeper.
    ///
    /// Every stream it had not yet decided is treated as rejected: buffered
    /// samples replay to ordinary contenders and future samples flow
    /// directly. Consumed streams stay consumed.
    pub fn disconnect_gatekeeper(&mut self) {
        if self.gatekeeper.take().is_none() {
            return;
        }
        let undecided: Vec<StreamId> = self
            .streams
            .iter()
            .filter(|(_, stream)| stream.gate == GateState::Undecided)
            .map(|(id, _)| *id)
            .collect();
        for id in undecided {
            self.reject_stream(id);
        }
        self.evict_drained();
    }

    /// Record the gatekeeper's verdict for one stream.
    ///
    /// Ignored when no gatekeeper is registered, the stream is unknown, or
    /// the stream was already decided.
    pub fn gatekeeper_decide(&mut self, id: StreamId, decision: GatekeeperDecision) {
        if self.gatekeeper.is_none() {
            return;
        }
        let Some(stream) = self.streams.get_mut(&id) else {
            return;
        };
        if stream.gate != GateState::Undecided {
            return;
        }
        match decision {
            GatekeeperDecision::Consume => {
                stream.gate = GateState::Consumed;
                stream.buffered.clear();
            }
            GatekeeperDecision::Reject => self.reject_stream(id),
        }
        self.evict_drained();
    }

    /// Drain the gatekeeper's queued deliveries, oldest first.
    pub fn drain_gatekeeper_events(&mut self) -> Vec<GatekeeperEvent> {
        self.gatekeeper
            .as_mut()
            .map(Gatekeeper::drain)
            .unwrap_or_default()
    }

    /// Inject one sample with its hit-test candidates, topmost first.
    ///
    /// `Add` creates the stream; `Change` and `Remove` for an unknown
    /// stream, and anything after `Remove`, are dropped. The injector owns
    /// id uniqueness and per-stream timestamp order.
    pub fn inject(&mut self, id: StreamId, sample: TouchSample, candidates: &[Candidate]) {
        match sample.phase {
            SamplePhase::Add => {
                if self.streams.contains_key(&id) {
                    return;
                }
                let gate = if self.gatekeeper.is_some() {
                    GateState::Undecided
                } else {
                    GateState::NotOffered
                };
                self.streams.insert(id, Stream::new(gate));
            }
            SamplePhase::Change | SamplePhase::Remove => {
                if !self.streams.contains_key(&id) {
                    return;
                }
            }
        }

        let gate;
        let mut topmost_changed = None;
        {
            let Some(stream) = self.streams.get_mut(&id) else {
                return;
            };
            if stream.flags.contains(StreamFlags::SAW_REMOVE) {
                return;
            }
            if sample.phase == SamplePhase::Remove {
                stream.flags |= StreamFlags::SAW_REMOVE;
            }
            stream.last_time = sample.time;
            // Re-resolve the topmost view per sample. The stream id does not
            // change with it; the gatekeeper only gets a coordinate-space
            // notice, and only for streams it still observes.
            let topmost = candidates.first().map(|c| c.contender);
            if sample.phase != SamplePhase::Add
                && topmost != stream.topmost
                && stream.resolution == Resolution::Undecided
                && matches!(stream.gate, GateState::Undecided | GateState::Consumed)
            {
                topmost_changed = Some(topmost);
            }
            stream.topmost = topmost;
            gate = stream.gate;
        }

        if let (Some(topmost), Some(gatekeeper)) = (topmost_changed, self.gatekeeper.as_mut()) {
            gatekeeper.push_topmost_changed(id, topmost);
        }

        match gate {
            GateState::Undecided => {
                if let Some(gatekeeper) = self.gatekeeper.as_mut() {
                    gatekeeper.push_sample(id, &sample);
                }
                if let Some(stream) = self.streams.get_mut(&id) {
                    stream.buffered.push((sample, candidates.to_vec()));
                }
            }
            GateState::Consumed => {
                if let Some(gatekeeper) = self.gatekeeper.as_mut() {
                    gatekeeper.push_sample(id, &sample);
                }
            }
            GateState::Rejected | GateState::NotOffered => {
                self.fan_out(id, &sample, candidates);
            }
        }
        self.evict_drained();
    }

    /// Handle a contender's watch call: validate its reply, score the votes
    /// it carried, and return the next delivery (or leave the watch
    /// pending).
    ///
    /// A protocol violation closes that contender's channel only; the error
    /// is returned and the contender forfeits its undecided contests.
    pub fn watch(
        &mut self,
        contender: ContenderId,
        responses: &[Option<GestureResponse>],
    ) -> Result<Delivery, ChannelError> {
        let Some(channel) = self.channels.get_mut(&contender) else {
            return Err(ChannelError::Closed);
        };
        match channel.watch(responses) {
            Ok((votes, delivery)) => {
                for (stream, response) in votes {
                    self.apply_vote(contender, stream, response);
                }
                // Scoring the votes may have queued a result for this very
                // channel; complete the watch immediately if so.
                let delivery = match delivery {
                    Delivery::Pending => match self
                        .channels
                        .get_mut(&contender)
                        .and_then(TouchSource::take_delivery)
                    {
                        Some(batch) => Delivery::Batch(batch),
                        None => Delivery::Pending,
                    },
                    batch => batch,
                };
                self.evict_drained();
                Ok(delivery)
            }
            Err(error) => {
                self.handle_disconnect(contender);
                Err(error)
            }
        }
    }

    /// Complete a contender's pending watch once events have arrived.
    ///
    /// The dispatcher calls this after injecting samples or scoring votes;
    /// `None` means no watch is pending or nothing is queued.
    pub fn take_delivery(&mut self, contender: ContenderId) -> Option<Vec<TouchEvent>> {
        self.channels.get_mut(&contender)?.take_delivery()
    }

    /// Revise a contender's standing `Hold` for a concluded stream.
    ///
    /// The channel enforces legality; an illegal revision closes it and the
    /// contender forfeits its undecided contests. A legal revision is scored
    /// like a fresh vote.
    pub fn update_response(
        &mut self,
        contender: ContenderId,
        stream: StreamId,
        response: GestureResponse,
    ) -> Result<(), ChannelError> {
        let Some(channel) = self.channels.get_mut(&contender) else {
            return Err(ChannelError::Closed);
        };
        match channel.update_response(stream, response) {
            Ok(()) => {
                self.apply_vote(contender, stream, response);
                self.evict_drained();
                Ok(())
            }
            Err(error) => {
                if error != ChannelError::Closed {
                    self.handle_disconnect(contender);
                }
                Err(error)
            }
        }
    }

    /// The contest state of a stream, or `None` once it left the arena.
    pub fn resolution(&self, id: StreamId) -> Option<Resolution> {
        self.streams.get(&id).map(|stream| stream.resolution)
    }

    /// How far the gatekeeper has gotten with a stream.
    pub fn gate_state(&self, id: StreamId) -> Option<GateState> {
        self.streams.get(&id).map(|stream| stream.gate)
    }

    /// The rolling-minute diagnostics sink.
    pub fn inspector(&self) -> &ContestInspector<ContenderId, M> {
        &self.inspector
    }

    /// Release an undecided stream from the gatekeeper: replay its buffer
    /// through ordinary fan-out and route future samples there directly.
    fn reject_stream(&mut self, id: StreamId) {
        let Some(stream) = self.streams.get_mut(&id) else {
            return;
        };
        stream.gate = GateState::Rejected;
        let buffered = core::mem::take(&mut stream.buffered);
        for (sample, candidates) in buffered {
            self.fan_out(id, &sample, &candidates);
        }
    }

    /// Deliver one sample to the stream's eligible recipients and keep the
    /// candidate set current.
    fn fan_out(&mut self, id: StreamId, sample: &TouchSample, candidates: &[Candidate]) {
        let Some(stream) = self.streams.get_mut(&id) else {
            return;
        };
        if stream.flags.contains(StreamFlags::CANDIDATES_FIXED) {
            // The set is fixed; later hit tests only refresh view bounds for
            // contenders they still report.
            for held in &mut stream.contenders {
                if let Some(fresh) = candidates.iter().find(|c| c.contender == held.contender) {
                    held.view_bounds = fresh.view_bounds;
                }
            }
        } else {
            let live: Vec<Candidate> = candidates
                .iter()
                .filter(|c| self.channels.contains_key(&c.contender))
                .copied()
                .collect();
            if !live.is_empty() {
                stream.contenders = live;
                stream.flags |= StreamFlags::CANDIDATES_FIXED;
            }
        }
        // No retroactive delivery: recipients only see samples from the one
        // being fanned out now.
        let recipients: Vec<Candidate> = match stream.resolution {
            Resolution::Undecided => stream.contenders.clone(),
            Resolution::Resolved(Some(winner)) => stream
                .contenders
                .iter()
                .filter(|c| c.contender == winner)
                .copied()
                .collect(),
            Resolution::Resolved(None) => Vec::new(),
        };
        for candidate in recipients {
            if let Some(channel) = self.channels.get_mut(&candidate.contender) {
                channel.enqueue_sample(id, sample, candidate.view_bounds);
                self.inspector.on_injected_events(candidate.contender, 1);
            }
        }
    }

    /// Score one vote. `Maybe` and `Hold` defer; `No` forfeits; the first
    /// `Yes` wins and notifies every other live contender of its loss.
    fn apply_vote(&mut self, contender: ContenderId, id: StreamId, response: GestureResponse) {
        let Some(stream) = self.streams.get_mut(&id) else {
            return;
        };
        if stream.resolution != Resolution::Undecided || !stream.is_live(contender) {
            return;
        }
        match response {
            GestureResponse::Maybe | GestureResponse::Hold => {}
            GestureResponse::No => {
                stream.remove_contender(contender);
                if stream.contenders.is_empty() {
                    stream.resolution = Resolution::Resolved(None);
                }
                self.inspector.on_contest_decided(contender, false);
            }
            GestureResponse::Yes => {
                stream.resolution = Resolution::Resolved(Some(contender));
                let time = stream.last_time;
                let losers: Vec<ContenderId> = stream
                    .contenders
                    .iter()
                    .map(|c| c.contender)
                    .filter(|c| *c != contender)
                    .collect();
                // The winner stays eligible: it keeps receiving the stream's
                // remaining samples.
                stream.contenders.retain(|c| c.contender == contender);
                for loser in losers {
                    if let Some(channel) = self.channels.get_mut(&loser) {
                        channel.enqueue_result(id, ContestResult::Lost, time);
                    }
                    self.inspector.on_contest_decided(loser, false);
                }
                if let Some(channel) = self.channels.get_mut(&contender) {
                    channel.enqueue_result(id, ContestResult::Won, time);
                }
                self.inspector.on_contest_decided(contender, true);
            }
        }
    }

    /// Remove a contender's channel and score implicit `No` votes for every
    /// contest it had not answered.
    fn handle_disconnect(&mut self, contender: ContenderId) {
        if self.channels.remove(&contender).is_none() {
            return;
        }
        for stream in self.streams.values_mut() {
            if !stream.is_live(contender) {
                continue;
            }
            stream.remove_contender(contender);
            if stream.resolution == Resolution::Undecided {
                if stream.contenders.is_empty() {
                    stream.resolution = Resolution::Resolved(None);
                }
                self.inspector.on_contest_decided(contender, false);
            }
        }
        self.evict_drained();
    }

    /// Drop streams that are finished from every angle: the `Remove` sample
    /// arrived and either the gatekeeper consumed the stream or the contest
    /// resolved and every channel has drained its events for it.
    fn evict_drained(&mut self) {
        let channels = &self.channels;
        self.streams.retain(|id, stream| {
            if !stream.flags.contains(StreamFlags::SAW_REMOVE) {
                return true;
            }
            match (stream.gate, stream.resolution) {
                (GateState::Consumed, _) => false,
                (_, Resolution::Resolved(_)) => {
                    channels.values().any(|channel| !channel.stream_quiesced(*id))
                }
                (_, Resolution::Undecided) => true,
            }
        });
    }
}
