// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-use linear zoom interpolation on a millisecond clock.
//!
//! A [`ZoomAnimation`] carries the display scale from its starting value to
//! a target over a fixed duration. The owning controller drives it once per
//! frame, applies [`ZoomAnimation::scale_at`] around the surface center, and
//! drops the animation when [`ZoomAnimation::is_finished`] reports true. The
//! final step returns the target exactly, so no floating-point drift
//! survives the animation.

/// Duration of a zoom animation, in milliseconds.
pub const ZOOM_ANIMATION_MS: u64 = 150;

/// An in-flight zoom animation.
///
/// The controller keeps at most one of these at a time; a request arriving
/// while one is in flight is dropped (single-flight).
#[derive(Clone, Copy, Debug)]
pub struct ZoomAnimation {
    start_scale: f64,
    target_scale: f64,
    started_ms: u64,
    duration_ms: u64,
}

impl ZoomAnimation {
    /// Starts an animation from `start_scale` to `target_scale` at `now_ms`,
    /// running for [`ZOOM_ANIMATION_MS`].
    #[must_use]
    pub const fn new(start_scale: f64, target_scale: f64, now_ms: u64) -> Self {
        Self {
            start_scale,
            target_scale,
            started_ms: now_ms,
            duration_ms: ZOOM_ANIMATION_MS,
        }
    }

    /// Returns the scale this animation is heading toward.
    #[must_use]
    pub const fn target_scale(&self) -> f64 {
        self.target_scale
    }

    /// Returns the animation progress in `[0, 1]` at the given time.
    #[must_use]
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms) as f64;
        (elapsed / self.duration_ms as f64).min(1.0)
    }

    /// Returns the interpolated scale at the given time.
    ///
    /// At full progress this returns `target_scale` exactly.
    #[must_use]
    pub fn scale_at(&self, now_ms: u64) -> f64 {
        let progress = self.progress(now_ms);
        if progress >= 1.0 {
            self.target_scale
        } else {
            self.start_scale + (self.target_scale - self.start_scale) * progress
        }
    }

    /// Returns `true` once the animation has reached its target.
    #[must_use]
    pub fn is_finished(&self, now_ms: u64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
