// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lightbox Event State: interaction state machines for the image viewport.
//!
//! This crate provides small, focused state machines for the stateful parts
//! of viewport interaction. Each module handles one pattern:
//!
//! - [`drag`]: Track a pointer drag as a grab vector so the image follows
//!   the pointer exactly.
//! - [`wheel`]: Track wheel-zoom state: last-event timestamps, the speed
//!   tier selected by modifier keys, and transient zoom-direction pulses.
//! - [`animation`]: A single-use linear zoom interpolation over a
//!   millisecond clock.
//! - [`debounce`]: A deadline timer that re-arms on repeated activity and
//!   fires once when the activity stops.
//!
//! ## Design Philosophy
//!
//! Each state machine is:
//!
//! - **Minimal and focused**: one interaction pattern per type.
//! - **Host-driven**: time is an explicit `u64` millisecond value supplied
//!   by the caller's monotonic clock; nothing here schedules callbacks.
//! - **Integration-friendly**: the owning controller decides what a drag
//!   offset or an expired deadline means; these types only compute it.
//!
//! ## Usage Patterns
//!
//! ### Drag tracking
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use lightbox_event_state::drag::DragState;
//!
//! let mut drag = DragState::default();
//!
//! // Pointer down at (120, 80) while the image offset is (100, 50).
//! drag.start(Point::new(120.0, 80.0), Vec2::new(100.0, 50.0));
//!
//! // Pointer moves; the new offset keeps the grabbed image point under it.
//! let offset = drag.offset_for(Point::new(130.0, 95.0)).unwrap();
//! assert_eq!(offset, Vec2::new(110.0, 65.0));
//! ```
//!
//! ### Wheel state and debounce
//!
//! ```rust
//! use lightbox_event_state::debounce::Debounce;
//! use lightbox_event_state::wheel::{SpeedTier, WheelState, INTERACT_WINDOW_MS};
//!
//! let mut wheel = WheelState::default();
//! wheel.record(1_000);
//! assert!(wheel.within(1_050, INTERACT_WINDOW_MS));
//! assert!(!wheel.within(1_200, INTERACT_WINDOW_MS));
//!
//! let mut timer = Debounce::default();
//! timer.arm(1_000, 100);
//! timer.arm(1_060, 100); // re-arm, the earlier deadline is discarded
//! assert!(!timer.fire(1_100));
//! assert!(timer.fire(1_160));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod animation;
pub mod debounce;
pub mod drag;
pub mod wheel;
