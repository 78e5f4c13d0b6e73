// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Millisecond clocks for viewport timing.
//!
//! Every time window in the viewport (interaction windows, zoom animations,
//! debounce deadlines) is expressed in `u64` milliseconds from an arbitrary
//! fixed origin. The viewport never schedules wakeups itself; it samples the
//! clock when the host delivers input or drives a frame.

/// Source of monotonic milliseconds.
///
/// Implementations must be non-decreasing. Tests substitute a manually
/// stepped clock to exercise the viewport's time windows deterministically.
pub trait Clock {
    /// Returns the number of milliseconds since the clock's origin.
    fn now_ms(&self) -> u64;
}

/// [`Clock`] backed by [`std::time::Instant`], measuring from its creation.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Creates a clock whose origin is the moment of creation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a, "clock went backwards: {a} then {b}");
    }
}
