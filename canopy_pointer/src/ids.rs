// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity newtypes for streams, devices, pointers, and contenders.

/// Identifier for one continuous touch interaction, from its `Add` sample to
/// its `Remove` sample.
///
/// Supplied by the injection boundary, which is responsible for uniqueness
/// and continuity. The id never changes over the life of the interaction,
/// even when re-hit-testing changes the topmost candidate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StreamId(pub u64);

/// Identifier for the physical input device a sample originated from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DeviceId(pub u32);

/// Identifier for one finger/stylus on a device. Together with [`DeviceId`]
/// it identifies a physical contact.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PointerId(pub u32);

/// Identifier for a candidate receiver competing to win a stream.
///
/// One event channel is bound per contender; hit-test results name contenders
/// in topmost-first order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ContenderId(pub u64);

impl core::fmt::Display for ContenderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
