// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Size, Vec2};

use crate::Rotation;

/// Lower bound on `display_scale` as a multiple of the fitted base scale.
pub const MIN_ZOOM_FACTOR: f64 = 0.1;

/// Upper bound on `display_scale` as a multiple of the fitted base scale.
pub const MAX_ZOOM_FACTOR: f64 = 10.0;

/// Pan/zoom/rotation state of one image on one rendering surface.
///
/// `ViewTransform` tracks the scale at which the (rotation-adjusted) image
/// exactly fits the surface (`base_scale`), the current effective scale
/// (`display_scale`), and the translation `offset` in surface pixels at which
/// the image's own center is drawn. It can be used to:
/// - Fit and center the image whenever it loads, rotates, or the surface
///   asks for a refit.
/// - Convert points between surface and world (image-local) coordinates.
/// - Rescale around an anchor point so that the anchored world point stays
///   under the same surface pixel.
/// - Derive the affine draw transform and the per-side overflow flags.
///
/// The world↔surface mapping ignores rotation: rotation only affects the
/// draw orientation (via [`ViewTransform::draw_transform`]) and the bounding
/// box used by [`ViewTransform::fit_to_surface`] and
/// [`ViewTransform::edge_overflow`].
#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
    base_scale: f64,
    display_scale: f64,
    offset: Vec2,
    rotation: Rotation,
    surface: Size,
}

impl ViewTransform {
    /// Creates a transform for a surface of the given pixel size.
    ///
    /// Both scales start at `1.0` and the offset at zero; callers are
    /// expected to call [`ViewTransform::fit_to_surface`] once an image is
    /// available.
    #[must_use]
    pub const fn new(surface: Size) -> Self {
        Self {
            base_scale: 1.0,
            display_scale: 1.0,
            offset: Vec2::ZERO,
            rotation: Rotation::Deg0,
            surface,
        }
    }

    /// Returns the scale at which the rotation-adjusted image exactly fits
    /// the surface.
    #[must_use]
    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    /// Returns the current effective scale.
    #[must_use]
    pub fn display_scale(&self) -> f64 {
        self.display_scale
    }

    /// Returns the translation at which the image center is drawn, in
    /// surface pixels.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Sets the translation directly (used while dragging).
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Returns the current rotation.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Sets the rotation without refitting.
    ///
    /// Callers that hold an image should follow this with
    /// [`ViewTransform::fit_to_surface`] so the rotated bounding box fits
    /// again.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Returns the current surface size in pixels.
    #[must_use]
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Sets the surface size without adjusting scale or offset.
    ///
    /// Resize reconciliation (refit vs. offset rescaling) is a policy of the
    /// owning controller, not of this value type.
    pub fn set_surface(&mut self, surface: Size) {
        self.surface = surface;
    }

    /// Returns the current zoom level relative to the fitted scale
    /// (`1.0` means exactly fitted).
    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.display_scale / self.base_scale
    }

    /// Returns the display scale implied by a zoom level.
    #[must_use]
    pub fn scale_for_level(&self, level: f64) -> f64 {
        self.base_scale * level
    }

    /// Clamps a prospective display scale into the allowed zoom range.
    #[must_use]
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(
            MIN_ZOOM_FACTOR * self.base_scale,
            MAX_ZOOM_FACTOR * self.base_scale,
        )
    }

    /// Returns the image dimensions as they appear on screen before scaling:
    /// width and height swap when the rotation is sideways.
    #[must_use]
    pub fn rotated_dimensions(&self, natural: Size) -> Size {
        if self.rotation.swaps_axes() {
            Size::new(natural.height, natural.width)
        } else {
            natural
        }
    }

    /// Fits and centers the image on the surface.
    ///
    /// The base scale binds on whichever axis constrains the rotation-adjusted
    /// image: width when the image is wider than the surface aspect, height
    /// otherwise. The display scale snaps to the base scale and the offset
    /// recenters. Calling this twice with no intervening input yields
    /// identical state.
    ///
    /// Returns `false` without mutating anything when the surface or the
    /// image has a zero-sized axis.
    pub fn fit_to_surface(&mut self, natural: Size) -> bool {
        if self.surface.width <= 0.0 || self.surface.height <= 0.0 {
            return false;
        }
        let rotated = self.rotated_dimensions(natural);
        if rotated.width <= 0.0 || rotated.height <= 0.0 {
            return false;
        }

        let surface_aspect = self.surface.width / self.surface.height;
        let image_aspect = rotated.width / rotated.height;
        self.base_scale = if image_aspect > surface_aspect {
            self.surface.width / rotated.width
        } else {
            self.surface.height / rotated.height
        };
        self.display_scale = self.base_scale;
        self.offset = Vec2::new(self.surface.width / 2.0, self.surface.height / 2.0);
        true
    }

    /// Converts a surface-space point into world (image-local) coordinates.
    #[must_use]
    pub fn world_from_screen(&self, pt: Point) -> Point {
        Point::new(
            (pt.x - self.offset.x) / self.display_scale,
            (pt.y - self.offset.y) / self.display_scale,
        )
    }

    /// Converts a world-space point into surface coordinates.
    #[must_use]
    pub fn screen_from_world(&self, pt: Point) -> Point {
        Point::new(
            pt.x * self.display_scale + self.offset.x,
            pt.y * self.display_scale + self.offset.y,
        )
    }

    /// Rescales around an anchor point in surface coordinates.
    ///
    /// The new scale is clamped into the allowed zoom range and the offset
    /// is recomputed so the world point currently under `anchor` remains
    /// under it. This is the shared zoom primitive for both wheel zooming
    /// (anchor = cursor) and animated zooming (anchor = surface center).
    pub fn set_scale_about(&mut self, anchor: Point, scale: f64) {
        let clamped = self.clamp_scale(scale);
        let world = self.world_from_screen(anchor);
        self.display_scale = clamped;
        self.offset = Vec2::new(
            anchor.x - world.x * clamped,
            anchor.y - world.y * clamped,
        );
    }

    /// Returns the affine transform that draws the image with the current
    /// pan, rotation, and scale, pivoting on the image's own center.
    ///
    /// Draw order is translate, then rotate, then scale, then a final
    /// translation of `(-natural.width / 2, -natural.height / 2)` so the
    /// image is centered on its local origin.
    #[must_use]
    pub fn draw_transform(&self, natural: Size) -> Affine {
        let rotate = if self.rotation == Rotation::Deg0 {
            Affine::IDENTITY
        } else {
            Affine::rotate(self.rotation.radians())
        };
        Affine::translate(self.offset)
            * rotate
            * Affine::scale(self.display_scale)
            * Affine::translate(Vec2::new(-natural.width / 2.0, -natural.height / 2.0))
    }

    /// Computes which sides of the transformed image lie outside the
    /// visible surface.
    ///
    /// The rotation-adjusted image size is scaled by the display scale and
    /// centered on the offset; each side overflows when its bound falls
    /// outside `[0, surface.width]` / `[0, surface.height]`. A zero-sized
    /// image reports no overflow.
    #[must_use]
    pub fn edge_overflow(&self, natural: Size) -> EdgeOverflow {
        let rotated = self.rotated_dimensions(natural);
        if rotated.width <= 0.0 || rotated.height <= 0.0 {
            return EdgeOverflow::NONE;
        }
        let half_width = rotated.width * self.display_scale / 2.0;
        let half_height = rotated.height * self.display_scale / 2.0;
        EdgeOverflow {
            left: self.offset.x - half_width < 0.0,
            right: self.offset.x + half_width > self.surface.width,
            top: self.offset.y - half_height < 0.0,
            bottom: self.offset.y + half_height > self.surface.height,
        }
    }
}

/// Per-side flags marking where the transformed image exceeds the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EdgeOverflow {
    /// The image's top edge lies above the surface.
    pub top: bool,
    /// The image's bottom edge lies below the surface.
    pub bottom: bool,
    /// The image's left edge lies left of the surface.
    pub left: bool,
    /// The image's right edge lies right of the surface.
    pub right: bool,
}

impl EdgeOverflow {
    /// No overflow on any side.
    pub const NONE: Self = Self {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    /// Returns `true` if any side overflows.
    #[must_use]
    pub const fn any(self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size, Vec2};

    use super::{EdgeOverflow, ViewTransform};
    use crate::Rotation;

    #[test]
    fn fit_matching_aspect_halves_scale_and_centers() {
        let mut view = ViewTransform::new(Size::new(400.0, 300.0));
        assert!(view.fit_to_surface(Size::new(800.0, 600.0)));

        assert_eq!(view.base_scale(), 0.5);
        assert_eq!(view.display_scale(), 0.5);
        assert_eq!(view.offset(), Vec2::new(200.0, 150.0));
        assert_eq!(view.zoom_level(), 1.0);
    }

    #[test]
    fn fit_binds_on_the_constraining_axis() {
        // Wide image in a squarish surface: width binds.
        let mut view = ViewTransform::new(Size::new(100.0, 100.0));
        assert!(view.fit_to_surface(Size::new(400.0, 100.0)));
        assert_eq!(view.base_scale(), 0.25);

        // Tall image: height binds.
        let mut view = ViewTransform::new(Size::new(100.0, 100.0));
        assert!(view.fit_to_surface(Size::new(100.0, 400.0)));
        assert_eq!(view.base_scale(), 0.25);
    }

    #[test]
    fn fit_is_idempotent() {
        let mut view = ViewTransform::new(Size::new(417.0, 263.0));
        let natural = Size::new(1021.0, 769.0);
        assert!(view.fit_to_surface(natural));
        let first = view;
        assert!(view.fit_to_surface(natural));

        assert_eq!(view.base_scale(), first.base_scale());
        assert_eq!(view.display_scale(), first.display_scale());
        assert_eq!(view.offset(), first.offset());
    }

    #[test]
    fn fit_refuses_degenerate_geometry() {
        let mut view = ViewTransform::new(Size::new(0.0, 300.0));
        assert!(!view.fit_to_surface(Size::new(800.0, 600.0)));

        let mut view = ViewTransform::new(Size::new(400.0, 300.0));
        let before = view;
        assert!(!view.fit_to_surface(Size::new(0.0, 600.0)));
        assert_eq!(view.base_scale(), before.base_scale());
        assert_eq!(view.offset(), before.offset());
    }

    #[test]
    fn rotated_dimensions_swap_iff_sideways() {
        let mut view = ViewTransform::new(Size::new(400.0, 300.0));
        let natural = Size::new(800.0, 600.0);

        for (rot, expected) in [
            (Rotation::Deg0, natural),
            (Rotation::Deg90, Size::new(600.0, 800.0)),
            (Rotation::Deg180, natural),
            (Rotation::Deg270, Size::new(600.0, 800.0)),
        ] {
            view.set_rotation(rot);
            assert_eq!(view.rotated_dimensions(natural), expected);
        }
    }

    #[test]
    fn rotating_a_landscape_image_refits_smaller() {
        let natural = Size::new(800.0, 600.0);
        let mut view = ViewTransform::new(Size::new(400.0, 300.0));
        assert!(view.fit_to_surface(natural));
        let upright = view.base_scale();

        view.set_rotation(Rotation::Deg90);
        assert!(view.fit_to_surface(natural));
        // The rotated 600x800 bounding box is height-bound in a landscape
        // surface and must fit at a smaller scale.
        assert_eq!(view.base_scale(), 300.0 / 800.0);
        assert!(view.base_scale() < upright);
    }

    #[test]
    fn world_screen_round_trip() {
        let mut view = ViewTransform::new(Size::new(400.0, 300.0));
        assert!(view.fit_to_surface(Size::new(800.0, 600.0)));
        view.set_scale_about(Point::new(37.0, 251.0), 1.3);

        for pt in [
            Point::new(0.0, 0.0),
            Point::new(200.0, 150.0),
            Point::new(-13.5, 404.25),
        ] {
            let back = view.screen_from_world(view.world_from_screen(pt));
            assert!((back - pt).hypot() < 1e-9);
        }
    }

    #[test]
    fn set_scale_about_keeps_anchor_fixed() {
        let mut view = ViewTransform::new(Size::new(400.0, 300.0));
        assert!(view.fit_to_surface(Size::new(800.0, 600.0)));

        let anchor = Point::new(123.0, 45.0);
        let before = view.world_from_screen(anchor);
        view.set_scale_about(anchor, view.display_scale() * 1.7);
        let after = view.world_from_screen(anchor);

        assert!((before - after).hypot() < 1e-9);
    }

    #[test]
    fn set_scale_about_clamps_to_zoom_range() {
        let mut view = ViewTransform::new(Size::new(400.0, 300.0));
        assert!(view.fit_to_surface(Size::new(800.0, 600.0)));
        let base = view.base_scale();

        let anchor = Point::new(200.0, 150.0);
        view.set_scale_about(anchor, base * 1000.0);
        assert_eq!(view.display_scale(), base * 10.0);

        view.set_scale_about(anchor, 0.0);
        assert_eq!(view.display_scale(), base * 0.1);
    }

    #[test]
    fn overflow_is_clear_at_fit_and_full_at_double_scale() {
        let natural = Size::new(200.0, 100.0);
        let mut view = ViewTransform::new(Size::new(200.0, 100.0));
        assert!(view.fit_to_surface(natural));
        assert_eq!(view.edge_overflow(natural), EdgeOverflow::NONE);
        assert!(!view.edge_overflow(natural).any());

        view.set_scale_about(Point::new(100.0, 50.0), view.base_scale() * 2.0);
        let overflow = view.edge_overflow(natural);
        assert!(overflow.left && overflow.right && overflow.top && overflow.bottom);
        assert!(overflow.any());
    }

    #[test]
    fn overflow_respects_rotation() {
        // A 400x100 image in a 200x200 surface: fitted it fills the width.
        // Rotated sideways it fills the height instead.
        let natural = Size::new(400.0, 100.0);
        let mut view = ViewTransform::new(Size::new(200.0, 200.0));
        assert!(view.fit_to_surface(natural));
        view.set_scale_about(Point::new(100.0, 100.0), view.base_scale() * 1.5);

        let upright = view.edge_overflow(natural);
        assert!(upright.left && upright.right);
        assert!(!upright.top && !upright.bottom);

        view.set_rotation(Rotation::Deg90);
        assert!(view.fit_to_surface(natural));
        view.set_scale_about(Point::new(100.0, 100.0), view.base_scale() * 1.5);
        let sideways = view.edge_overflow(natural);
        assert!(sideways.top && sideways.bottom);
        assert!(!sideways.left && !sideways.right);
    }

    #[test]
    fn overflow_of_zero_sized_image_is_none() {
        let view = ViewTransform::new(Size::new(200.0, 200.0));
        assert_eq!(view.edge_overflow(Size::ZERO), EdgeOverflow::NONE);
    }

    #[test]
    fn draw_transform_centers_the_image() {
        let natural = Size::new(800.0, 600.0);
        let mut view = ViewTransform::new(Size::new(400.0, 300.0));
        assert!(view.fit_to_surface(natural));

        // The image center maps to the offset.
        let center = view.draw_transform(natural) * Point::new(400.0, 300.0);
        assert!((center - Point::new(200.0, 150.0)).hypot() < 1e-9);

        // The top-left corner lands at offset - scaled half extents.
        let corner = view.draw_transform(natural) * Point::new(0.0, 0.0);
        assert!((corner - Point::new(0.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn draw_transform_rotates_about_the_image_center() {
        let natural = Size::new(800.0, 600.0);
        let mut view = ViewTransform::new(Size::new(400.0, 300.0));
        assert!(view.fit_to_surface(natural));
        view.set_rotation(Rotation::Deg90);
        assert!(view.fit_to_surface(natural));

        // The image center still maps to the offset under rotation.
        let center = view.draw_transform(natural) * Point::new(400.0, 300.0);
        assert!((center - Point::new(200.0, 150.0)).hypot() < 1e-9);

        // The image's local +x axis now points down the screen.
        let tip = view.draw_transform(natural) * Point::new(800.0, 300.0);
        assert!(tip.y > center.y + 1.0);
        assert!((tip.x - center.x).abs() < 1e-9);
    }
}
