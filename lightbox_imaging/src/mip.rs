// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Progressive box-filter downsample cache.
//!
//! Minifying a large image in one step shimmers: a naive sampler only reads
//! a few of the source pixels that land in each destination pixel. The cache
//! instead halves a working copy with a 2×2 box filter until one more
//! halving would undershoot the target on-screen width, then keeps the
//! result for as long as it stays valid. Full-resolution pixel traffic is
//! thereby bounded to cache rebuilds, not every frame.

use alloc::vec::Vec;
use core::fmt;

use crate::ImageData;

/// Tolerance within which a cached scale counts as "close enough to reuse".
///
/// This only answers scale proximity; structural changes (new image,
/// rotation, resize) are signalled through the generation counter instead.
pub const SCALE_REUSE_EPSILON: f64 = 0.01;

/// Error produced while building a downsample cache entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MipError {
    /// The source image has zero dimensions or a mismatched pixel buffer.
    DegenerateSource,
    /// An intermediate buffer could not be allocated. Callers should fall
    /// back to drawing the full-resolution image for the frame.
    AllocationFailed,
}

impl fmt::Display for MipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateSource => write!(f, "source image is not drawable"),
            Self::AllocationFailed => write!(f, "downsample buffer allocation failed"),
        }
    }
}

impl core::error::Error for MipError {}

/// One cached downsample result.
#[derive(Clone, Debug)]
struct MipEntry {
    image: ImageData,
    built_scale: f64,
    generation: u64,
}

/// Cache of the most recent progressive downsample of the current image.
///
/// The cache holds at most one entry. An entry is valid while the caller's
/// generation counter still matches the one it was built under and the
/// display scale is within [`SCALE_REUSE_EPSILON`] of the build scale.
#[derive(Clone, Debug, Default)]
pub struct MipCache {
    entry: Option<MipEntry>,
}

impl MipCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the cached image if it is still valid for the given scale
    /// and generation.
    #[must_use]
    pub fn lookup(&self, scale: f64, generation: u64) -> Option<&ImageData> {
        self.entry.as_ref().and_then(|entry| {
            let close = (entry.built_scale - scale).abs() < SCALE_REUSE_EPSILON;
            (entry.generation == generation && close).then_some(&entry.image)
        })
    }

    /// Returns `true` if the cache holds an entry (valid or not).
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.entry.is_some()
    }

    /// Drops the cached entry.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Builds (and stores) a downsample of `source` for the given display
    /// scale, tagged with the caller's current generation.
    ///
    /// The working copy is halved until one more halving would undershoot
    /// the target on-screen width, so the cached image is at most one
    /// halving step above the size it will be drawn at. When the target is
    /// already more than half the source width, no halving happens and the
    /// entry shares the source pixels without copying.
    pub fn build(
        &mut self,
        source: &ImageData,
        scale: f64,
        generation: u64,
    ) -> Result<&ImageData, MipError> {
        if !source.is_drawable() || scale <= 0.0 {
            return Err(MipError::DegenerateSource);
        }

        let target_width = f64::from(source.width()) * scale;
        let mut working = source.clone();
        while f64::from(working.width()) * 0.5 > target_width && working.width() > 1 {
            working = downsample_half(&working)?;
        }

        let entry = self.entry.insert(MipEntry {
            image: working,
            built_scale: scale,
            generation,
        });
        Ok(&entry.image)
    }
}

/// Halves an image with a 2×2 box filter.
///
/// Odd trailing rows/columns are handled by clamping the sample window to
/// the image bounds. Output dimensions never drop below one pixel.
fn downsample_half(source: &ImageData) -> Result<ImageData, MipError> {
    let width = source.width() as usize;
    let height = source.height() as usize;
    let out_width = (width / 2).max(1);
    let out_height = (height / 2).max(1);

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(out_width * out_height * 4)
        .map_err(|_| MipError::AllocationFailed)?;

    let src = source.pixels();
    for oy in 0..out_height {
        let y0 = (oy * 2).min(height - 1);
        let y1 = (oy * 2 + 1).min(height - 1);
        for ox in 0..out_width {
            let x0 = (ox * 2).min(width - 1);
            let x1 = (ox * 2 + 1).min(width - 1);
            for channel in 0..4 {
                let sum = u32::from(src[(y0 * width + x0) * 4 + channel])
                    + u32::from(src[(y0 * width + x1) * 4 + channel])
                    + u32::from(src[(y1 * width + x0) * 4 + channel])
                    + u32::from(src[(y1 * width + x1) * 4 + channel]);
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "the rounded average of four u8 values fits in u8"
                )]
                pixels.push(((sum + 2) / 4) as u8);
            }
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "halved dimensions are no larger than the u32 source dimensions"
    )]
    Ok(ImageData::from_rgba8(
        out_width as u32,
        out_height as u32,
        pixels.into(),
    ))
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> ImageData {
        ImageData::from_rgba8(
            width,
            height,
            vec![value; (width * height * 4) as usize].into(),
        )
    }

    #[test]
    fn halving_averages_blocks() {
        // 2x2 image with four distinct gray levels; the single output pixel
        // is their rounded mean.
        #[rustfmt::skip]
        let pixels: Vec<u8> = [
            [10_u8, 10, 10, 255], [20, 20, 20, 255],
            [30, 30, 30, 255], [40, 40, 40, 255],
        ]
        .concat();
        let source = ImageData::from_rgba8(2, 2, pixels.into());

        let half = downsample_half(&source).unwrap();
        assert_eq!(half.width(), 1);
        assert_eq!(half.height(), 1);
        assert_eq!(&half.pixels()[..], &[25, 25, 25, 255]);
    }

    #[test]
    fn halving_clamps_odd_edges() {
        // 3x1 image: the second output sample window is clamped to the last
        // column and row.
        #[rustfmt::skip]
        let pixels: Vec<u8> = [
            [0_u8, 0, 0, 255], [100, 0, 0, 255], [200, 0, 0, 255],
        ]
        .concat();
        let source = ImageData::from_rgba8(3, 1, pixels.into());

        let half = downsample_half(&source).unwrap();
        assert_eq!(half.width(), 1);
        assert_eq!(half.height(), 1);
        // All four clamped samples are the first two pixels: (0 + 100) * 2 / 4.
        assert_eq!(half.pixels()[0], 50);
    }

    #[test]
    fn build_halves_until_within_one_step_of_target() {
        let source = solid(100, 60, 128);
        let mut cache = MipCache::new();

        // Target width 20: 100 -> 50 -> 25, and 25 * 0.5 <= 20 stops there.
        let built = cache.build(&source, 0.2, 1).unwrap();
        assert_eq!(built.width(), 25);
        assert_eq!(built.height(), 15);
    }

    #[test]
    fn build_without_halving_shares_source_pixels() {
        let source = solid(100, 60, 7);
        let mut cache = MipCache::new();

        // Target width 60 is above half the source width: no halving.
        let built = cache.build(&source, 0.6, 1).unwrap();
        assert_eq!(built.width(), 100);
        assert!(Arc::ptr_eq(built.pixels(), source.pixels()));
    }

    #[test]
    fn lookup_honors_generation_and_epsilon() {
        let source = solid(64, 64, 9);
        let mut cache = MipCache::new();
        cache.build(&source, 0.3, 5).unwrap();

        assert!(cache.lookup(0.3, 5).is_some());
        // Within epsilon: reusable.
        assert!(cache.lookup(0.305, 5).is_some());
        // Outside epsilon: stale scale.
        assert!(cache.lookup(0.35, 5).is_none());
        // Generation moved on: structurally stale even at the exact scale.
        assert!(cache.lookup(0.3, 6).is_none());
    }

    #[test]
    fn invalidate_empties_the_cache() {
        let source = solid(16, 16, 1);
        let mut cache = MipCache::new();
        cache.build(&source, 0.4, 1).unwrap();
        assert!(cache.is_populated());

        cache.invalidate();
        assert!(!cache.is_populated());
        assert!(cache.lookup(0.4, 1).is_none());
    }

    #[test]
    fn degenerate_sources_are_rejected() {
        let mut cache = MipCache::new();

        let empty = ImageData::from_rgba8(0, 0, vec![].into());
        assert!(matches!(
            cache.build(&empty, 0.5, 1),
            Err(MipError::DegenerateSource)
        ));

        let source = solid(8, 8, 3);
        assert!(matches!(
            cache.build(&source, 0.0, 1),
            Err(MipError::DegenerateSource)
        ));
        assert!(!cache.is_populated());
    }

    #[test]
    fn rebuild_replaces_the_entry() {
        let source = solid(100, 100, 2);
        let mut cache = MipCache::new();

        cache.build(&source, 0.2, 1).unwrap();
        let rebuilt = cache.build(&source, 0.45, 2).unwrap();
        assert_eq!(rebuilt.width(), 50);

        assert!(cache.lookup(0.2, 1).is_none());
        assert!(cache.lookup(0.45, 2).is_some());
    }
}
