// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::FRAC_PI_2;

/// Discrete quarter-turn rotation applied to the displayed image.
///
/// Rotation only affects the draw orientation and the rotation-adjusted
/// bounding box used for fitting and overflow tests; the pan/zoom pivot math
/// in [`crate::ViewTransform`] deliberately ignores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// Quarter turn clockwise.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three-quarter turn clockwise.
    Deg270,
}

impl Rotation {
    /// Creates a rotation from a degree value, accepting any multiple of 90.
    ///
    /// Returns `None` for values that are not a multiple of 90 degrees.
    #[must_use]
    pub const fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Returns the rotation angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Returns the rotation angle in radians, for building draw transforms.
    #[must_use]
    pub const fn radians(self) -> f64 {
        match self {
            Self::Deg0 => 0.0,
            Self::Deg90 => FRAC_PI_2,
            Self::Deg180 => 2.0 * FRAC_PI_2,
            Self::Deg270 => 3.0 * FRAC_PI_2,
        }
    }

    /// Returns `true` if this rotation swaps the image's width and height
    /// on screen (90 or 270 degrees).
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_degrees_accepts_quarter_turns() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(90), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(180), Some(Rotation::Deg180));
        assert_eq!(Rotation::from_degrees(270), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(360), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Deg90));
    }

    #[test]
    fn from_degrees_rejects_other_angles() {
        assert_eq!(Rotation::from_degrees(45), None);
        assert_eq!(Rotation::from_degrees(91), None);
        assert_eq!(Rotation::from_degrees(359), None);
    }

    #[test]
    fn swaps_axes_only_for_sideways_rotations() {
        assert!(!Rotation::Deg0.swaps_axes());
        assert!(Rotation::Deg90.swaps_axes());
        assert!(!Rotation::Deg180.swaps_axes());
        assert!(Rotation::Deg270.swaps_axes());
    }

    #[test]
    fn radians_match_degrees() {
        for rot in [
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ] {
            let expected = f64::from(rot.degrees()).to_radians();
            assert!((rot.radians() - expected).abs() < 1e-12);
        }
    }
}
