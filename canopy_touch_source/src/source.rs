// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channel implementation: backlog, watch/reply accounting, decoration.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;
use kurbo::Rect;

use canopy_pointer::{ContestResult, DeviceId, GestureResponse, SamplePhase, StreamId, TouchSample};

use crate::error::ChannelError;
use crate::event::{DeviceInfo, EventKind, TouchEvent, ViewParameters};

/// Maximum number of events delivered per watch call. Backlog beyond the cap
/// is held for the next call, preserving order.
pub const TOUCH_MAX_EVENT: usize = 128;

/// Outcome of a successful watch call.
#[derive(Clone, Debug, PartialEq)]
pub enum Delivery {
    /// Events are available; the call completes with this batch.
    Batch(Vec<TouchEvent>),
    /// Nothing to deliver yet. The watch stays outstanding until the
    /// dispatcher collects a batch via [`TouchSource::take_delivery`]. It is
    /// legal for a pending watch to never complete.
    Pending,
}

/// What the previous delivery owes in the next reply.
#[derive(Copy, Clone, Debug)]
enum Owed {
    /// A pointer sample: owes exactly one vote.
    Vote { stream: StreamId, is_remove: bool },
    /// A contest result: owes an empty response slot.
    Empty { stream: StreamId },
}

/// Queued, not-yet-delivered event. Decoration (device info, view-parameter
/// dedup, timestamp clamping) is applied at delivery time.
#[derive(Copy, Clone, Debug)]
struct Queued {
    time: u64,
    device: Option<DeviceId>,
    view_params: Option<ViewParameters>,
    kind: EventKind,
}

/// Per-stream reply bookkeeping, kept for `update_response` legality.
///
/// Entries that can never be legally revised again are pruned when the
/// stream's contest result is acknowledged; only a standing terminal `Hold`
/// keeps its entry alive indefinitely.
#[derive(Copy, Clone, Debug, Default)]
struct StreamLedger {
    /// Standing response: the vote for the latest delivered sample. A later
    /// response for the same stream supersedes an earlier `Hold`.
    last_response: Option<GestureResponse>,
    /// The stream's `Remove` sample was delivered and acknowledged.
    remove_acked: bool,
}

/// The flow-controlled event channel bound to one ordinary contender.
///
/// The owning tracker enqueues events; the client calls [`TouchSource::watch`]
/// and (rarely) [`TouchSource::update_response`]. All state is exclusively
/// owned here: the outstanding-watch flag, the bounded backlog, the owed
/// replies, and the per-stream ledger.
pub struct TouchSource {
    backlog: VecDeque<Queued>,
    owed: Vec<Owed>,
    watch_pending: bool,
    devices_seen: Vec<DeviceId>,
    sent_view_params: Option<ViewParameters>,
    last_time: u64,
    ledgers: BTreeMap<StreamId, StreamLedger>,
    closed: Option<ChannelError>,
}

impl core::fmt::Debug for TouchSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TouchSource")
            .field("backlog", &self.backlog.len())
            .field("owed", &self.owed.len())
            .field("watch_pending", &self.watch_pending)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Default for TouchSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchSource {
    /// Create an open channel with an empty backlog.
    pub fn new() -> Self {
        Self {
            backlog: VecDeque::new(),
            owed: Vec::new(),
            watch_pending: false,
            devices_seen: Vec::new(),
            sent_view_params: None,
            last_time: 0,
            ledgers: BTreeMap::new(),
            closed: None,
        }
    }

    /// Whether the channel has been closed by a protocol violation.
    pub fn is_closed(&self) -> bool {
        self.closed.is_some()
    }

    /// The violation that closed the channel, if any.
    pub fn close_reason(&self) -> Option<ChannelError> {
        self.closed
    }

    /// Whether a watch call is outstanding with nothing delivered yet.
    pub fn has_pending_watch(&self) -> bool {
        self.watch_pending
    }

    /// Whether nothing remains queued or owed for the given stream on this
    /// channel. A delivered-but-unacknowledged event still counts as owed,
    /// so this only turns true once the client has accounted for everything.
    pub fn stream_quiesced(&self, stream: StreamId) -> bool {
        !self.backlog.iter().any(|q| kind_stream(&q.kind) == stream)
            && !self.owed.iter().any(|o| owed_stream(o) == stream)
    }

    /// Enqueue a pointer sample for delivery, together with the bounds of
    /// the view that will receive it. Ignored on a closed channel.
    pub fn enqueue_sample(&mut self, stream: StreamId, sample: &TouchSample, view_bounds: Rect) {
        if self.closed.is_some() {
            return;
        }
        self.backlog.push_back(Queued {
            time: sample.time,
            device: Some(sample.device),
            view_params: Some(ViewParameters {
                viewport: sample.viewport,
                view_bounds,
            }),
            kind: EventKind::Sample {
                stream,
                phase: sample.phase,
                position: sample.position,
            },
        });
    }

    /// Enqueue the one-time contest result for a stream. Ignored on a closed
    /// channel.
    pub fn enqueue_result(&mut self, stream: StreamId, result: ContestResult, time: u64) {
        if self.closed.is_some() {
            return;
        }
        self.backlog.push_back(Queued {
            time,
            device: None,
            view_params: None,
            kind: EventKind::Result { stream, result },
        });
    }

    /// The watch half of the protocol.
    ///
    /// `responses` must contain exactly one entry per event of the previous
    /// delivery: `Some(vote)` for a pointer sample, `None` for a contest
    /// result. Extracted votes are returned in submission order together with
    /// either a batch of up to [`TOUCH_MAX_EVENT`] events or
    /// [`Delivery::Pending`].
    ///
    /// Any violation closes the channel and is returned as the error; no
    /// votes are extracted from an invalid reply.
    #[allow(clippy::type_complexity, reason = "votes pair ids with responses")]
    pub fn watch(
        &mut self,
        responses: &[Option<GestureResponse>],
    ) -> Result<(Vec<(StreamId, GestureResponse)>, Delivery), ChannelError> {
        if self.closed.is_some() {
            return Err(ChannelError::Closed);
        }
        if self.watch_pending {
            return Err(self.fail(ChannelError::DuplicateWatch));
        }
        if responses.len() != self.owed.len() {
            return Err(self.fail(ChannelError::ResponseCountMismatch {
                expected: self.owed.len(),
                got: responses.len(),
            }));
        }

        // Validate the full reply before recording anything from it.
        let violation = self
            .owed
            .iter()
            .zip(responses)
            .find_map(|(owed, response)| match (owed, response) {
                (Owed::Vote { .. }, Some(_)) | (Owed::Empty { .. }, None) => None,
                (Owed::Vote { .. }, None) => Some(ChannelError::MissingResponse),
                (Owed::Empty { .. }, Some(_)) => Some(ChannelError::UnexpectedResponse),
            });
        if let Some(error) = violation {
            return Err(self.fail(error));
        }

        let mut votes = Vec::new();
        for (owed, response) in self.owed.iter().zip(responses) {
            match (*owed, response) {
                (Owed::Vote { stream, is_remove }, Some(vote)) => {
                    let ledger = self.ledgers.entry(stream).or_default();
                    ledger.last_response = Some(*vote);
                    if is_remove {
                        ledger.remove_acked = true;
                    }
                    votes.push((stream, *vote));
                }
                (Owed::Empty { stream }, None) => {
                    // The result is acknowledged. Only a standing terminal
                    // hold can still be revised; any other entry can never
                    // be legally referenced again and is dropped.
                    let revisable = self.ledgers.get(&stream).is_some_and(|ledger| {
                        ledger.last_response == Some(GestureResponse::Hold)
                    });
                    if !revisable {
                        self.ledgers.remove(&stream);
                    }
                }
                _ => unreachable!(),
            }
        }
        self.owed.clear();

        if self.backlog.is_empty() {
            self.watch_pending = true;
            Ok((votes, Delivery::Pending))
        } else {
            Ok((votes, Delivery::Batch(self.deliver_batch())))
        }
    }

    /// Complete an outstanding watch once events have arrived.
    ///
    /// Returns the prepared batch when a watch is pending and the backlog is
    /// non-empty; otherwise `None`. The dispatcher calls this after routing
    /// new events and hands the batch to the waiting client.
    pub fn take_delivery(&mut self) -> Option<Vec<TouchEvent>> {
        if self.closed.is_some() || !self.watch_pending || self.backlog.is_empty() {
            return None;
        }
        self.watch_pending = false;
        Some(self.deliver_batch())
    }

    /// Revise the standing vote for an already-concluded stream.
    ///
    /// Legal only when the stream is known to this channel, its `Remove`
    /// sample was delivered and acknowledged, the standing response is
    /// `Hold`, and the revision is not itself `Hold`. Any violation closes
    /// the channel.
    pub fn update_response(
        &mut self,
        stream: StreamId,
        response: GestureResponse,
    ) -> Result<(), ChannelError> {
        if self.closed.is_some() {
            return Err(ChannelError::Closed);
        }
        if response == GestureResponse::Hold {
            return Err(self.fail(ChannelError::UpdateIsHold));
        }
        let Some(ledger) = self.ledgers.get_mut(&stream) else {
            return Err(self.fail(ChannelError::UnknownUpdateStream));
        };
        if !ledger.remove_acked {
            return Err(self.fail(ChannelError::UpdateBeforeDrain));
        }
        if ledger.last_response != Some(GestureResponse::Hold) {
            return Err(self.fail(ChannelError::UpdateWithoutHold));
        }
        ledger.last_response = Some(response);
        Ok(())
    }

    fn fail(&mut self, error: ChannelError) -> ChannelError {
        self.closed = Some(error);
        self.backlog.clear();
        self.owed.clear();
        self.watch_pending = false;
        error
    }

    /// Pop up to [`TOUCH_MAX_EVENT`] events, decorate them, and record what
    /// the batch owes.
    fn deliver_batch(&mut self) -> Vec<TouchEvent> {
        let count = self.backlog.len().min(TOUCH_MAX_EVENT);
        let mut batch = Vec::with_capacity(count);
        let mut first_sample_in_batch = true;
        for _ in 0..count {
            let q = self
                .backlog
                .pop_front()
                .unwrap_or_else(|| unreachable!("count bounded by backlog length"));
            let time = q.time.max(self.last_time);
            self.last_time = time;

            let mut device_info = None;
            let mut view_parameters = None;
            match q.kind {
                EventKind::Sample { stream, phase, .. } => {
                    if let Some(device) = q.device
                        && !self.devices_seen.contains(&device)
                    {
                        self.devices_seen.push(device);
                        device_info = Some(DeviceInfo { device });
                    }
                    if first_sample_in_batch {
                        first_sample_in_batch = false;
                        if q.view_params != self.sent_view_params {
                            self.sent_view_params = q.view_params;
                            view_parameters = q.view_params;
                        }
                    }
                    self.ledgers.entry(stream).or_default();
                    self.owed.push(Owed::Vote {
                        stream,
                        is_remove: phase == SamplePhase::Remove,
                    });
                }
                EventKind::Result { stream, .. } => {
                    self.ledgers.entry(stream).or_default();
                    self.owed.push(Owed::Empty { stream });
                }
            }

            batch.push(TouchEvent {
                time,
                device_info,
                view_parameters,
                kind: q.kind,
            });
        }
        batch
    }
}

fn kind_stream(kind: &EventKind) -> StreamId {
    match kind {
        EventKind::Sample { stream, .. } | EventKind::Result { stream, .. } => *stream,
    }
}

fn owed_stream(owed: &Owed) -> StreamId {
    match owed {
        Owed::Vote { stream, .. } | Owed::Empty { stream } => *stream,
    }
}
