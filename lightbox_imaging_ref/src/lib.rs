// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lightbox Imaging Reference Backend.
//!
//! This crate provides a small, stateful implementation of
//! [`ViewportBackend`] for **draw recording and inspection**.
//!
//! It is intentionally *not* a reference renderer:
//! - It does **not** rasterize to pixels.
//! - It does **not** establish "golden" rendering behavior across backends.
//! - It is intended primarily for tests and debugging that want to assert
//!   on what the viewport drew in a frame: which image (by dimensions and
//!   pixel identity), under which transform, at which sampling quality.

#![no_std]

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use lightbox_imaging::{Affine, ImageData, ImageSampler, ViewportBackend};

/// Event recorded by the reference backend.
#[derive(Clone, Debug)]
pub enum Event {
    /// The surface was cleared.
    Clear,
    /// An image draw.
    Draw {
        /// Width of the drawn image in pixels.
        width: u32,
        /// Height of the drawn image in pixels.
        height: u32,
        /// Shared pixel buffer of the drawn image, for identity checks.
        pixels: Arc<[u8]>,
        /// Transform the image was drawn under.
        transform: Affine,
        /// Sampler the draw requested.
        sampler: ImageSampler,
    },
}

/// Recording implementation of [`ViewportBackend`].
///
/// Events accumulate in order; [`RefBackend::frames`] splits them back into
/// per-frame groups (each frame starts with a [`Event::Clear`]).
#[derive(Default, Debug)]
pub struct RefBackend {
    events: Vec<Event>,
}

impl RefBackend {
    /// Creates an empty backend.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Returns the recorded events in application order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the draws of the most recent frame (events after the last
    /// clear).
    #[must_use]
    pub fn last_frame_draws(&self) -> Vec<&Event> {
        let start = self
            .events
            .iter()
            .rposition(|event| matches!(event, Event::Clear))
            .map_or(0, |idx| idx + 1);
        self.events[start..].iter().collect()
    }

    /// Returns the number of clears recorded so far.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::Clear))
            .count()
    }

    /// Clears all recorded events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl ViewportBackend for RefBackend {
    fn clear(&mut self) {
        self.events.push(Event::Clear);
    }

    fn draw_image(&mut self, image: &ImageData, transform: Affine, sampler: ImageSampler) {
        self.events.push(Event::Draw {
            width: image.width(),
            height: image.height(),
            pixels: image.pixels().clone(),
            transform,
            sampler,
        });
    }
}
