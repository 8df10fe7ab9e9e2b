// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minute sources: where the inspector's bucket key comes from.

use alloc::rc::Rc;
use core::cell::Cell;

/// Supplies the current wall-clock minute number.
///
/// The inspector is generic over this seam so tests can drive bucketing
/// deterministically. Implementations are expected to be non-decreasing.
pub trait MinuteSource {
    /// The current minute number (monotone minutes since some fixed epoch).
    fn now_minute(&self) -> u64;
}

/// A manually advanced minute source for tests and demos.
///
/// Clones share the underlying minute, so a caller can keep one handle and
/// hand another to the inspector.
#[derive(Clone, Debug, Default)]
pub struct ManualMinute {
    minute: Rc<Cell<u64>>,
}

impl ManualMinute {
    /// Create a manual source at the given minute.
    pub fn new(minute: u64) -> Self {
        Self {
            minute: Rc::new(Cell::new(minute)),
        }
    }

    /// Jump to an absolute minute.
    pub fn set(&self, minute: u64) {
        self.minute.set(minute);
    }

    /// Advance by a number of minutes.
    pub fn advance(&self, minutes: u64) {
        self.minute.set(self.minute.get() + minutes);
    }
}

impl MinuteSource for ManualMinute {
    fn now_minute(&self) -> u64 {
        self.minute.get()
    }
}

/// Wall-clock minutes since the Unix epoch.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug, Default)]
pub struct WallClock;

#[cfg(feature = "std")]
impl MinuteSource for WallClock {
    fn now_minute(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() / 60)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_minute_set_and_advance() {
        let m = ManualMinute::new(10);
        assert_eq!(m.now_minute(), 10);
        m.advance(3);
        assert_eq!(m.now_minute(), 13);
        m.set(100);
        assert_eq!(m.now_minute(), 100);
    }
}
