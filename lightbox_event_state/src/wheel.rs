// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel-zoom state: event timestamps, speed tiers, and direction pulses.
//!
//! Wheel zooming interacts with the rest of the viewport through time
//! windows measured from the last wheel event:
//!
//! - Within [`INTERACT_WINDOW_MS`] the viewport counts as "interacting",
//!   which disables the downsample-cache draw path.
//! - Within [`ANIMATION_GUARD_MS`] externally observed zoom-level changes do
//!   not start an animation, because the wheel handler itself writes the
//!   realized level back to that channel.
//!
//! [`WheelState`] records the timestamps; the zoom arithmetic lives in
//! [`SpeedTier`] and [`zoom_factor`]; [`ZoomPulse`] names the transient
//! in/out feedback emitted per event.

/// Window after a wheel event during which the viewport counts as
/// interacting, in milliseconds.
pub const INTERACT_WINDOW_MS: u64 = 100;

/// Window after a wheel event during which zoom-level channel changes do
/// not trigger an animation, in milliseconds.
pub const ANIMATION_GUARD_MS: u64 = 300;

/// Lifetime of a zoom-direction pulse, in milliseconds. Rapid wheel events
/// re-arm the same window rather than stacking pulses.
pub const PULSE_DURATION_MS: u64 = 150;

/// Wheel-zoom speed, selected by the externally supplied modifier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpeedTier {
    /// Accelerated zoom.
    Fast,
    /// Fine-grained zoom.
    Slow,
    /// Unmodified zoom.
    #[default]
    Normal,
}

impl SpeedTier {
    /// Selects the tier from the two modifier booleans.
    ///
    /// At most one of the modifiers is expected to be active; the fast
    /// modifier wins if both are set. Both inactive selects [`Self::Normal`].
    #[must_use]
    pub const fn from_modifiers(fast: bool, slow: bool) -> Self {
        if fast {
            Self::Fast
        } else if slow {
            Self::Slow
        } else {
            Self::Normal
        }
    }

    /// Returns the per-delta-unit zoom speed of this tier.
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Fast => 0.003,
            Self::Slow => 0.0002,
            Self::Normal => 0.001,
        }
    }
}

/// Returns the multiplicative scale change for a wheel delta at a tier.
///
/// Negative deltas (wheel up) zoom in, positive deltas zoom out.
#[must_use]
pub fn zoom_factor(delta_y: f64, tier: SpeedTier) -> f64 {
    1.0 - delta_y * tier.factor()
}

/// Transient zoom-direction feedback emitted for each wheel event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomPulse {
    /// Zooming in (wheel up, negative delta).
    In,
    /// Zooming out (wheel down, positive delta).
    Out,
}

impl ZoomPulse {
    /// Classifies a wheel delta as an in or out pulse.
    #[must_use]
    pub fn from_delta_y(delta_y: f64) -> Self {
        if delta_y < 0.0 { Self::In } else { Self::Out }
    }
}

/// Tracks when the last wheel event happened.
#[derive(Clone, Copy, Debug, Default)]
pub struct WheelState {
    last_wheel_ms: Option<u64>,
}

impl WheelState {
    /// Records a wheel event at the given time.
    pub fn record(&mut self, now_ms: u64) {
        self.last_wheel_ms = Some(now_ms);
    }

    /// Returns the time of the last wheel event, if any.
    #[must_use]
    pub fn last_wheel_ms(&self) -> Option<u64> {
        self.last_wheel_ms
    }

    /// Returns `true` if a wheel event happened within `window_ms` before
    /// `now_ms`.
    #[must_use]
    pub fn within(&self, now_ms: u64, window_ms: u64) -> bool {
        match self.last_wheel_ms {
            Some(last) => now_ms.saturating_sub(last) < window_ms,
            None => false,
        }
    }

    /// Forgets the recorded event (used on detach).
    pub fn clear(&mut self) {
        self.last_wheel_ms = None;
    }
}
