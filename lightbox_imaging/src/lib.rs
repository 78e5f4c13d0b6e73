// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lightbox Imaging: decoded image handles and the viewport backend trait.
//!
//! This crate defines the small imaging vocabulary shared between the
//! Lightbox viewport controller and concrete renderers:
//!
//! - [`ImageData`]: a cheaply clonable handle to a decoded RGBA bitmap plus
//!   its natural dimensions. The viewport never mutates or frees the pixel
//!   data; lifecycle belongs to whoever decoded it.
//! - [`ViewportBackend`]: the trait a rendering surface implements. The
//!   viewport only ever clears the surface and draws one image under an
//!   affine transform, so the trait stays that small.
//! - [`MipCache`]: the progressive box-filter downsample cache used for the
//!   low-scale quality path, invalidated by an explicit generation counter.
//!
//! # Position in the stack
//!
//! The viewport controller (`lightbox_viewport`) sits above this crate and
//! decides *what* to draw each frame; backends (a CPU rasterizer, a GPU
//! canvas, the recording backend in `lightbox_imaging_ref`) sit below it and
//! decide *how*. Pixel-format and sampler vocabulary comes from `peniko` so
//! backends can map draws directly onto their native paint types.
//!
//! # Cache validity
//!
//! A cache entry records the generation counter and the display scale it was
//! built for. The generation changes whenever geometry changes structurally
//! (new image, rotation, resize); the scale comparison only answers "is this
//! close enough to reuse", with [`SCALE_REUSE_EPSILON`] as the tolerance.
//!
//! This crate is `no_std` (with `alloc`).

#![no_std]

extern crate alloc;

use alloc::sync::Arc;

use kurbo::Size;
pub use peniko::{ImageAlphaType, ImageFormat, ImageQuality, ImageSampler};

mod mip;

pub use mip::{MipCache, MipError, SCALE_REUSE_EPSILON};

/// Affine transform type used when drawing into a backend.
pub type Affine = kurbo::Affine;

/// Handle to a decoded bitmap.
///
/// The pixel buffer is shared and immutable; cloning a handle clones the
/// `Arc`, not the pixels. A handle whose buffer does not match its declared
/// dimensions (for example because decoding failed upstream) simply reports
/// [`ImageData::is_drawable`] as `false` and is treated as "no image" by the
/// viewport.
#[derive(Clone, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    format: ImageFormat,
    alpha_type: ImageAlphaType,
    pixels: Arc<[u8]>,
}

impl ImageData {
    /// Bytes per RGBA pixel.
    const BYTES_PER_PIXEL: usize = 4;

    /// Creates a handle over tightly packed, row-major RGBA8 pixels.
    #[must_use]
    pub fn from_rgba8(width: u32, height: u32, pixels: Arc<[u8]>) -> Self {
        Self {
            width,
            height,
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
            pixels,
        }
    }

    /// Returns the natural width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the natural height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the natural dimensions as a [`Size`].
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Returns the pixel format.
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the alpha encoding of the pixels.
    #[must_use]
    pub fn alpha_type(&self) -> ImageAlphaType {
        self.alpha_type
    }

    /// Returns the shared pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &Arc<[u8]> {
        &self.pixels
    }

    /// Returns `true` if this handle can actually be drawn: non-zero
    /// dimensions and a pixel buffer of the declared size.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(Self::BYTES_PER_PIXEL));
        self.width > 0 && self.height > 0 && expected == Some(self.pixels.len())
    }
}

/// Rendering surface interface used by the viewport.
///
/// The viewport owns the surface's pixel output for as long as it is
/// attached: it clears and draws once per frame and nothing else writes to
/// the surface. Backends are free to implement drawing however they like
/// (CPU compositing, GPU quads, canvas calls); `sampler` carries the
/// requested filtering quality.
pub trait ViewportBackend {
    /// Clears the whole surface.
    fn clear(&mut self);

    /// Draws `image` with its top-left corner at the local origin, mapped
    /// through `transform`.
    fn draw_image(&mut self, image: &ImageData, transform: Affine, sampler: ImageSampler);
}
