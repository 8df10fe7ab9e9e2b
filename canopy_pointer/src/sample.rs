// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch samples and the viewport coordinate space they are expressed in.

use kurbo::{Affine, Point, Rect};

use crate::ids::{DeviceId, PointerId};

/// Phase of a physical contact within its interaction.
///
/// A stream carries exactly one `Add`, any number of `Change`, then exactly
/// one `Remove`, and nothing after the `Remove`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SamplePhase {
    /// First contact of the interaction.
    Add,
    /// Continued contact.
    Change,
    /// Final contact; ends the stream.
    Remove,
}

/// The coordinate space a sample's position is expressed in.
///
/// Owned by the geometry provider and copied by value into every
/// [`TouchSample`]. The `transform` maps viewport coordinates into the local
/// space of the receiving view; `extents` bound the viewport rectangle and
/// define the normalization used by [`Viewport::to_ndc`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Affine from viewport space to the receiver's local space.
    pub transform: Affine,
    /// Viewport rectangle in viewport coordinates. Assumed non-empty for
    /// normalized-coordinate computations.
    pub extents: Rect,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            extents: Rect::ZERO,
        }
    }
}

impl Viewport {
    /// Map a viewport-space position onto normalized device coordinates,
    /// with the extents spanning `[-1, 1]` on both axes.
    pub fn to_ndc(&self, p: Point) -> Point {
        let e = self.extents;
        debug_assert!(
            e.width() > 0.0 && e.height() > 0.0,
            "viewport extents must be non-empty for NDC"
        );
        Point::new(
            2.0 * (p.x - e.x0) / e.width() - 1.0,
            2.0 * (p.y - e.y0) / e.height() - 1.0,
        )
    }

    /// Map a viewport-space position into the receiver's local space.
    pub fn to_local(&self, p: Point) -> Point {
        self.transform * p
    }
}

/// One physical contact observation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchSample {
    /// Device the contact originated from.
    pub device: DeviceId,
    /// Finger/stylus on that device.
    pub pointer: PointerId,
    /// Phase within the interaction.
    pub phase: SamplePhase,
    /// Position in viewport coordinates.
    pub position: Point,
    /// Coordinate space of `position`, copied by value.
    pub viewport: Viewport,
    /// Injection timestamp in nanoseconds. Non-decreasing per stream.
    pub time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            transform: Affine::translate((10.0, 20.0)),
            extents: Rect::new(0.0, 0.0, 200.0, 100.0),
        }
    }

    #[test]
    fn ndc_center_is_origin() {
        let v = viewport();
        assert_eq!(v.to_ndc(Point::new(100.0, 50.0)), Point::new(0.0, 0.0));
    }

    #[test]
    fn ndc_corners() {
        let v = viewport();
        assert_eq!(v.to_ndc(Point::new(0.0, 0.0)), Point::new(-1.0, -1.0));
        assert_eq!(v.to_ndc(Point::new(200.0, 100.0)), Point::new(1.0, 1.0));
    }

    #[test]
    fn ndc_respects_offset_extents() {
        let v = Viewport {
            transform: Affine::IDENTITY,
            extents: Rect::new(100.0, 100.0, 300.0, 200.0),
        };
        assert_eq!(v.to_ndc(Point::new(200.0, 150.0)), Point::new(0.0, 0.0));
        assert_eq!(v.to_ndc(Point::new(100.0, 100.0)), Point::new(-1.0, -1.0));
    }

    #[test]
    fn local_applies_transform() {
        let v = viewport();
        assert_eq!(v.to_local(Point::new(1.0, 2.0)), Point::new(11.0, 22.0));
    }
}
