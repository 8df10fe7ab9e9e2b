// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbitration vocabulary: per-sample votes and the final contest outcome.

/// A contender's vote for one delivered sample.
///
/// Exactly one response is owed per delivered pointer sample; contest-result
/// notifications expect an empty response instead (see the event channel
/// contract in `canopy_touch_source`).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GestureResponse {
    /// Still undecided; keep delivering samples.
    Maybe,
    /// Intentionally deferring the decision. A standing `Hold` on a stream's
    /// final sample keeps the stream undecided until revised out of band.
    Hold,
    /// Claims the win outright. At most one contender may hold `Yes` for a
    /// given stream.
    Yes,
    /// Forfeits the stream.
    No,
}

impl GestureResponse {
    /// Whether this response resolves the contender's participation
    /// (`Yes` or `No`).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Yes | Self::No)
    }
}

/// One-time notification of the final arbitration outcome for a stream,
/// delivered once to every surviving contender when the stream resolves.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ContestResult {
    /// This contender won the stream and keeps receiving its samples.
    Won,
    /// This contender lost; no further pointer samples follow for the stream.
    Lost,
}

impl ContestResult {
    /// Whether the outcome is a win.
    pub fn won(self) -> bool {
        matches!(self, Self::Won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_responses() {
        assert!(GestureResponse::Yes.is_terminal());
        assert!(GestureResponse::No.is_terminal());
        assert!(!GestureResponse::Maybe.is_terminal());
        assert!(!GestureResponse::Hold.is_terminal());
    }

    #[test]
    fn result_won() {
        assert!(ContestResult::Won.won());
        assert!(!ContestResult::Lost.won());
    }
}
