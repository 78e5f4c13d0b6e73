// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deadline timer that re-arms on activity and fires once when it stops.
//!
//! The viewport uses this twice: the edge-indicator visibility flag stays up
//! while interaction keeps re-arming a 100 ms deadline, and zoom-direction
//! pulses expire 150 ms after the latest wheel event. In both cases repeated
//! activity replaces the pending deadline instead of stacking timers.

/// A single re-armable deadline on a millisecond clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct Debounce {
    deadline_ms: Option<u64>,
}

impl Debounce {
    /// Arms (or re-arms) the deadline `delay_ms` after `now_ms`.
    ///
    /// Any previously pending deadline is discarded.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(delay_ms));
    }

    /// Returns `true` while a deadline is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Fires the deadline if it has passed.
    ///
    /// Returns `true` exactly once per armed deadline, on the first call at
    /// or after the deadline; the timer disarms itself when it fires.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Discards any pending deadline without firing it.
    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }
}
