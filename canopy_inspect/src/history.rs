// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bounded per-minute history and its two write operations.

use alloc::collections::BTreeMap;
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::clock::MinuteSource;
use crate::report::{MinuteNode, Report};

/// Number of one-minute buckets retained. Buckets strictly older than this
/// many minutes before the current one are evicted lazily on the next write.
pub const NUM_MINUTES_OF_HISTORY: u64 = 10;

/// The three per-contender counters kept in each minute bucket.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ContenderCounters {
    /// Pointer samples fanned out to this contender.
    pub injected_events: u64,
    /// Stream contests this contender won.
    pub won_streams: u64,
    /// Stream contests this contender lost (including forfeits).
    pub lost_streams: u64,
}

impl ContenderCounters {
    fn accumulate(&mut self, other: &Self) {
        self.injected_events += other.injected_events;
        self.won_streams += other.won_streams;
        self.lost_streams += other.lost_streams;
    }
}

#[derive(Clone, Debug)]
struct MinuteBucket<K> {
    minute: u64,
    counters: BTreeMap<K, ContenderCounters>,
}

/// Passive diagnostics sink for the arbitration pipeline.
///
/// Two write operations ([`Self::on_injected_events`] and
/// [`Self::on_contest_decided`]) and one read operation ([`Self::report`]).
/// Callers never touch the bucket map directly.
#[derive(Clone, Debug)]
pub struct ContestInspector<K: Ord + Copy, M: MinuteSource> {
    /// Buckets in ascending minute order; bounded by eviction on write.
    history: VecDeque<MinuteBucket<K>>,
    minutes: M,
}

impl<K: Ord + Copy, M: MinuteSource> ContestInspector<K, M> {
    /// Create an empty inspector drawing minutes from `minutes`.
    pub fn new(minutes: M) -> Self {
        Self {
            history: VecDeque::new(),
            minutes,
        }
    }

    /// Record `count` events injected toward `contender` this minute.
    pub fn on_injected_events(&mut self, contender: K, count: u64) {
        self.bucket_now().entry(contender).or_default().injected_events += count;
    }

    /// Record the outcome of one decided contest for `contender`.
    pub fn on_contest_decided(&mut self, contender: K, won: bool) {
        let counters = self.bucket_now().entry(contender).or_default();
        if won {
            counters.won_streams += 1;
        } else {
            counters.lost_streams += 1;
        }
    }

    /// Number of buckets currently retained (eviction is lazy, so a stale
    /// bucket stays counted here until the next write).
    pub fn retained_buckets(&self) -> usize {
        self.history.len()
    }

    /// Build the rolling-window report.
    ///
    /// Pull-based and side-effect free: stale buckets are filtered out of the
    /// report without being evicted. Only minutes that saw at least one write
    /// appear.
    pub fn report(&self) -> Report<K> {
        let now = self.minutes.now_minute();
        let mut minutes = Vec::new();
        let mut sum = ContenderCounters::default();
        for bucket in &self.history {
            if !retained(bucket.minute, now) {
                continue;
            }
            let mut contenders = Vec::with_capacity(bucket.counters.len());
            for (contender, counters) in &bucket.counters {
                sum.accumulate(counters);
                contenders.push((*contender, *counters));
            }
            minutes.push(MinuteNode {
                minute: bucket.minute,
                contenders,
            });
        }
        Report { minutes, sum }
    }

    /// Find or create the current minute's bucket, evicting stale ones.
    fn bucket_now(&mut self) -> &mut BTreeMap<K, ContenderCounters> {
        let now = self.minutes.now_minute();
        while let Some(front) = self.history.front() {
            if retained(front.minute, now) {
                break;
            }
            self.history.pop_front();
        }
        let create = self.history.back().is_none_or(|b| b.minute != now);
        if create {
            self.history.push_back(MinuteBucket {
                minute: now,
                counters: BTreeMap::new(),
            });
        }
        &mut self
            .history
            .back_mut()
            .unwrap_or_else(|| unreachable!("bucket was just ensured"))
            .counters
    }
}

/// Whether a bucket minute falls inside the rolling window ending at `now`.
fn retained(minute: u64, now: u64) -> bool {
    minute + NUM_MINUTES_OF_HISTORY > now
}
