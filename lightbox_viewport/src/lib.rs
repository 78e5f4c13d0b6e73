// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lightbox Viewport: the interactive image viewport controller.
//!
//! This crate ties the Lightbox building blocks together into one
//! host-driven controller. A [`Viewport`] owns a rendering backend
//! (`lightbox_imaging::ViewportBackend`), holds the transform state
//! (`lightbox_transform::ViewTransform`), and runs the interaction state
//! machines (`lightbox_event_state`). It focuses on:
//! - Drag panning and wheel zooming anchored at the cursor.
//! - Animated zooms toward externally requested zoom levels.
//! - Resize reconciliation (refit-and-center or preserve-and-rescale).
//! - A per-frame render pass with a progressive downsample quality path.
//! - Edge-overflow and indicator-visibility feedback for overlay UI.
//!
//! It does **not** decode images, schedule frames, or translate raw window
//! events. Callers are expected to:
//! - Exchange state through [`ViewportChannels`] (zoom level, image handle,
//!   rotation, and policy flags in; realized zoom, overflow flags, indicator
//!   visibility, and zoom pulses out).
//! - Forward pointer and wheel input in surface-pixel coordinates.
//! - Call [`Viewport::render_frame`] from their own frame scheduler.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Size};
//! use lightbox_imaging::{Affine, ImageData, ImageSampler, ViewportBackend};
//! use lightbox_viewport::{MonotonicClock, Viewport, ViewportChannels, ViewportConfig};
//!
//! struct NullBackend;
//!
//! impl ViewportBackend for NullBackend {
//!     fn clear(&mut self) {}
//!     fn draw_image(&mut self, _: &ImageData, _: Affine, _: ImageSampler) {}
//! }
//!
//! // The host decoded a 2x2 image and already published it.
//! let channels = ViewportChannels::new();
//! channels
//!     .image
//!     .set(Some(ImageData::from_rgba8(2, 2, vec![0_u8; 16].into())));
//!
//! let viewport = Viewport::attach(
//!     NullBackend,
//!     Size::new(400.0, 300.0),
//!     channels.clone(),
//!     ViewportConfig::default(),
//!     Rc::new(MonotonicClock::new()),
//! );
//! // Attaching fitted and centered the image and published the reset level.
//! assert_eq!(channels.zoom_level.get(), 1.0);
//!
//! viewport.pointer_down(Point::new(120.0, 80.0));
//! viewport.pointer_move(Point::new(130.0, 95.0));
//! viewport.pointer_up();
//! viewport.render_frame();
//! ```
//!
//! ## Design notes
//!
//! - The `zoom_level` channel is bidirectional: wheel zooms and completed
//!   animations write the realized level back, and a short guard window plus
//!   [`ZOOM_SCALE_EPSILON`] keep that write-back from re-triggering an
//!   animation.
//! - All timing comes from an injected [`Clock`]; nothing here sleeps or
//!   schedules callbacks, which keeps the controller deterministic in tests.
//! - Channel writes produced while handling an event are flushed after the
//!   handler finishes, so subscribers may call straight back into the
//!   viewport.
//!
//! This crate is `no_std` (with `alloc`); the `std` feature adds the
//! [`Instant`](std::time::Instant)-backed [`MonotonicClock`].

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod clock;
mod controller;
mod signal;

pub use clock::Clock;
#[cfg(feature = "std")]
pub use clock::MonotonicClock;
pub use controller::{
    INDICATOR_DEBOUNCE_MS, Viewport, ViewportChannels, ViewportConfig, ViewportDebugInfo,
    ZOOM_SCALE_EPSILON,
};
pub use signal::{Signal, Subscription};
