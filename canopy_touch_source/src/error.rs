// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Protocol-violation errors. Each closes the offending channel immediately.

/// Why a [`crate::TouchSource`] channel was closed (or refused an operation).
///
/// Every variant except [`ChannelError::Closed`] records a protocol
/// violation by the client; violations are not retried or recovered, and
/// closure is observable only on the offending channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChannelError {
    /// The channel was already closed by an earlier violation.
    Closed,
    /// A second watch was issued while one was still outstanding.
    DuplicateWatch,
    /// The reply's response count did not match the owed events.
    ResponseCountMismatch {
        /// Responses owed for the previous delivery.
        expected: usize,
        /// Responses actually supplied.
        got: usize,
    },
    /// A vote was supplied for a contest result, which owes an empty
    /// response.
    UnexpectedResponse,
    /// No vote was supplied for a pointer sample.
    MissingResponse,
    /// `update_response` named a stream this channel never delivered.
    UnknownUpdateStream,
    /// `update_response` arrived before the stream's final sample was
    /// delivered and acknowledged.
    UpdateBeforeDrain,
    /// `update_response` arrived for a stream whose standing response is not
    /// `Hold`.
    UpdateWithoutHold,
    /// `update_response` tried to revise a vote to `Hold`.
    UpdateIsHold,
}

impl core::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Closed => write!(f, "channel already closed"),
            Self::DuplicateWatch => write!(f, "watch issued while one was outstanding"),
            Self::ResponseCountMismatch { expected, got } => {
                write!(f, "expected {expected} responses, got {got}")
            }
            Self::UnexpectedResponse => write!(f, "non-empty response to a contest result"),
            Self::MissingResponse => write!(f, "empty response to a pointer sample"),
            Self::UnknownUpdateStream => write!(f, "update_response for unknown stream"),
            Self::UpdateBeforeDrain => write!(f, "update_response before stream drained"),
            Self::UpdateWithoutHold => write!(f, "update_response without a standing hold"),
            Self::UpdateIsHold => write!(f, "update_response may not itself be hold"),
        }
    }
}

impl core::error::Error for ChannelError {}
