// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lightbox Transform: viewport transform state for a single-image viewport.
//!
//! This crate provides the headless transform model used by the Lightbox
//! viewport: the pan/zoom/rotation state of one decoded image shown on one
//! rendering surface, expressed in device pixels. It focuses on:
//! - Fit-to-surface computation against the rotation-adjusted image size.
//! - Coordinate conversion between world (image-local) and surface space.
//! - Anchored rescaling (the point under the cursor stays put while zooming).
//! - Edge-overflow derivation for overlay indicators.
//!
//! It does **not** own an image, a surface, or any event handling. Callers
//! are expected to:
//! - Hold a [`ViewTransform`] per attached surface and mutate it from their
//!   input and frame handlers.
//! - Feed the decoded image's natural size into the fit/overflow helpers.
//! - Derive their draw transform via [`ViewTransform::draw_transform`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use lightbox_transform::{Rotation, ViewTransform};
//!
//! // A 400x300 surface showing an 800x600 image.
//! let mut view = ViewTransform::new(Size::new(400.0, 300.0));
//! assert!(view.fit_to_surface(Size::new(800.0, 600.0)));
//! assert_eq!(view.display_scale(), 0.5);
//!
//! // Zoom in around the surface center; the anchored world point is stable.
//! let anchor = Point::new(200.0, 150.0);
//! let before = view.world_from_screen(anchor);
//! view.set_scale_about(anchor, view.display_scale() * 2.0);
//! let after = view.world_from_screen(anchor);
//! assert!((before - after).hypot() < 1e-9);
//! ```
//!
//! ## Design notes
//!
//! - The scale is uniform; rotation is restricted to quarter turns and only
//!   affects the draw orientation and the fitted bounding box, never the
//!   pan/zoom pivot math.
//! - The display scale is clamped to `[0.1, 10.0]` times the fitted base
//!   scale in every mutation path.
//! - Degenerate geometry (zero-sized surface or image) makes the fit and
//!   overflow operations early-return instead of dividing by zero.
//!
//! This crate is `no_std`.

#![no_std]

mod rotation;
mod transform;

pub use rotation::Rotation;
pub use transform::{EdgeOverflow, MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR, ViewTransform};
