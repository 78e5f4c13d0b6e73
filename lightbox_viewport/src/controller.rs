// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::mem;

use kurbo::{Affine, Point, Size, Vec2};
use tracing::{debug, warn};

use lightbox_event_state::animation::ZoomAnimation;
use lightbox_event_state::debounce::Debounce;
use lightbox_event_state::drag::DragState;
use lightbox_event_state::wheel::{
    ANIMATION_GUARD_MS, INTERACT_WINDOW_MS, PULSE_DURATION_MS, SpeedTier, WheelState, ZoomPulse,
    zoom_factor,
};
use lightbox_imaging::{ImageData, ImageQuality, ImageSampler, MipCache, ViewportBackend};
use lightbox_transform::{
    EdgeOverflow, MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR, Rotation, ViewTransform,
};

use crate::clock::Clock;
use crate::signal::Signal;

/// Delay after the last interaction before edge indicators hide, in
/// milliseconds. Ongoing interaction keeps re-arming the deadline.
pub const INDICATOR_DEBOUNCE_MS: u64 = 100;

/// Display-scale difference below which an observed zoom-level change is
/// treated as noise and does not start an animation. This absorbs the
/// viewport's own realized levels written back to the channel.
pub const ZOOM_SCALE_EPSILON: f64 = 0.001;

/// Static configuration of a [`Viewport`], fixed at attach time.
#[derive(Clone, Copy, Debug)]
pub struct ViewportConfig {
    /// Whether interaction drives the `indicators_visible` channel at all.
    pub edge_indicators_enabled: bool,
    /// Display scale below which calm frames draw from the downsample cache.
    pub low_scale_threshold: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            edge_indicators_enabled: true,
            low_scale_threshold: 0.75,
        }
    }
}

/// The signal channels a [`Viewport`] is wired to.
///
/// The host writes the first group; the viewport writes the second. The
/// `zoom_level` channel is deliberately bidirectional: hosts set it to
/// request an animated zoom, and the viewport writes the realized level back
/// after wheel zooms and completed animations. [`ZOOM_SCALE_EPSILON`] and the
/// post-wheel guard window keep those write-backs from re-triggering
/// animations.
///
/// Cloning shares all channels; see [`Signal`].
#[derive(Clone, Debug)]
pub struct ViewportChannels {
    /// Requested zoom level relative to the fitted scale; also receives the
    /// realized level back from the viewport.
    pub zoom_level: Signal<f64>,
    /// The decoded image to show, or `None` to clear the viewport.
    pub image: Signal<Option<ImageData>>,
    /// Quarter-turn rotation of the image.
    pub rotation: Signal<Rotation>,
    /// Resize policy: `true` refits on surface resize, `false` preserves the
    /// view and rescales the offset proportionally.
    pub refit_on_resize: Signal<bool>,
    /// Whether the accelerated wheel-zoom modifier is held.
    pub fast_zoom: Signal<bool>,
    /// Whether the fine-grained wheel-zoom modifier is held.
    pub slow_zoom: Signal<bool>,
    /// Outbound: which sides of the image currently extend past the surface.
    pub edge_overflow: Signal<EdgeOverflow>,
    /// Outbound: whether edge indicators should be shown right now.
    pub indicators_visible: Signal<bool>,
    /// Outbound: transient zoom-direction feedback, cleared after
    /// [`PULSE_DURATION_MS`] of wheel silence.
    pub zoom_pulse: Signal<Option<ZoomPulse>>,
    /// Outbound: bumped once each time an image has been fitted and centered
    /// (on load, rotation, and refitting resizes).
    pub image_settled: Signal<u64>,
}

impl ViewportChannels {
    /// Creates a fresh set of channels with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zoom_level: Signal::new(1.0),
            image: Signal::new(None),
            rotation: Signal::new(Rotation::Deg0),
            refit_on_resize: Signal::new(false),
            fast_zoom: Signal::new(false),
            slow_zoom: Signal::new(false),
            edge_overflow: Signal::new(EdgeOverflow::NONE),
            indicators_visible: Signal::new(false),
            zoom_pulse: Signal::new(None),
            image_settled: Signal::new(0),
        }
    }
}

impl Default for ViewportChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes queued while the viewport state is borrowed, flushed to the
/// channels afterwards so subscribers can call back into the viewport.
enum Outbound {
    ZoomLevel(f64),
    EdgeOverflow(EdgeOverflow),
    IndicatorsVisible(bool),
    ZoomPulse(Option<ZoomPulse>),
    ImageSettled,
}

/// An in-flight zoom animation plus the level to republish on completion.
#[derive(Clone, Copy, Debug)]
struct Flight {
    animation: ZoomAnimation,
    target_level: f64,
}

struct Core<B> {
    backend: B,
    transform: ViewTransform,
    image: Option<ImageData>,
    drag: DragState,
    wheel: WheelState,
    animation: Option<Flight>,
    mip: MipCache,
    generation: u64,
    indicator_timer: Debounce,
    pulse_timer: Debounce,
    refit_on_resize: bool,
    fast_zoom: bool,
    slow_zoom: bool,
    config: ViewportConfig,
    clock: Rc<dyn Clock>,
    attached: bool,
    outbox: Vec<Outbound>,
}

impl<B: ViewportBackend> Core<B> {
    fn push(&mut self, out: Outbound) {
        self.outbox.push(out);
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.mip.invalidate();
    }

    /// Fits and centers the current image, publishing the reset level, the
    /// fresh overflow flags, and a settle notification.
    fn refit(&mut self) {
        let Some(natural) = self.image.as_ref().map(ImageData::size) else {
            return;
        };
        if self.transform.fit_to_surface(natural) {
            let overflow = self.transform.edge_overflow(natural);
            self.push(Outbound::ZoomLevel(1.0));
            self.push(Outbound::EdgeOverflow(overflow));
            self.push(Outbound::ImageSettled);
        }
    }

    fn sync_image(&mut self, image: Option<ImageData>) {
        if !self.attached {
            return;
        }
        self.drag.end();
        self.animation = None;
        self.bump_generation();
        match image {
            Some(image) if image.is_drawable() => {
                self.image = Some(image);
                self.refit();
            }
            Some(image) => {
                warn!(
                    width = image.width(),
                    height = image.height(),
                    buffer_len = image.pixels().len(),
                    "ignoring image whose buffer does not match its dimensions"
                );
                self.image = None;
                self.push(Outbound::EdgeOverflow(EdgeOverflow::NONE));
            }
            None => {
                self.image = None;
                self.push(Outbound::EdgeOverflow(EdgeOverflow::NONE));
            }
        }
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        if !self.attached || self.transform.rotation() == rotation {
            return;
        }
        self.transform.set_rotation(rotation);
        self.animation = None;
        self.bump_generation();
        self.refit();
    }

    /// Reacts to an externally observed zoom-level change by starting an
    /// animated zoom toward it, anchored at the surface center.
    ///
    /// Changes whose implied display scale is within [`ZOOM_SCALE_EPSILON`]
    /// of the current one, changes arriving within [`ANIMATION_GUARD_MS`] of
    /// a wheel event (the viewport's own write-back), and changes while a
    /// drag or another animation is active are all ignored.
    fn zoom_level_requested(&mut self, level: f64) {
        if !self.attached || self.image.is_none() {
            return;
        }
        let level = level.clamp(MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR);
        let target = self.transform.scale_for_level(level);
        if (target - self.transform.display_scale()).abs() <= ZOOM_SCALE_EPSILON {
            return;
        }
        let now = self.clock.now_ms();
        if self.wheel.within(now, ANIMATION_GUARD_MS)
            || self.drag.is_dragging()
            || self.animation.is_some()
        {
            return;
        }
        self.animation = Some(Flight {
            animation: ZoomAnimation::new(self.transform.display_scale(), target, now),
            target_level: level,
        });
    }

    fn pointer_down(&mut self, position: Point) {
        if !self.attached || self.image.is_none() {
            return;
        }
        self.animation = None;
        self.drag.start(position, self.transform.offset());
    }

    fn pointer_move(&mut self, position: Point) {
        if let Some(offset) = self.drag.offset_for(position) {
            self.transform.set_offset(offset);
        }
    }

    fn pointer_up(&mut self) {
        self.drag.end();
    }

    fn wheel(&mut self, position: Point, delta_y: f64) {
        if !self.attached || self.image.is_none() {
            return;
        }
        let now = self.clock.now_ms();
        self.animation = None;
        self.wheel.record(now);
        self.push(Outbound::ZoomPulse(Some(ZoomPulse::from_delta_y(delta_y))));
        self.pulse_timer.arm(now, PULSE_DURATION_MS);

        let tier = SpeedTier::from_modifiers(self.fast_zoom, self.slow_zoom);
        let scale = self.transform.display_scale() * zoom_factor(delta_y, tier);
        self.transform.set_scale_about(position, scale);
        self.push(Outbound::ZoomLevel(self.transform.zoom_level()));
    }

    fn surface_resized(&mut self, surface: Size) {
        if !self.attached || surface == self.transform.surface() {
            return;
        }
        let old = self.transform.surface();
        self.transform.set_surface(surface);
        self.animation = None;
        self.bump_generation();
        if self.image.is_some() {
            if self.refit_on_resize || old.width <= 0.0 || old.height <= 0.0 {
                self.refit();
            } else {
                // Preserve the view: keep the scale and move the offset by
                // the same proportion as the surface grew or shrank.
                let offset = self.transform.offset();
                self.transform.set_offset(Vec2::new(
                    offset.x * (surface.width / old.width),
                    offset.y * (surface.height / old.height),
                ));
            }
        }
        // Resizing blanks the surface; repaint without waiting for the host.
        self.render_frame();
    }

    fn render_frame(&mut self) {
        if !self.attached {
            return;
        }
        let now = self.clock.now_ms();

        if self.pulse_timer.fire(now) {
            self.push(Outbound::ZoomPulse(None));
        }

        let animating = self.animation.is_some();
        if let Some(flight) = self.animation {
            let surface = self.transform.surface();
            let center = Point::new(surface.width / 2.0, surface.height / 2.0);
            self.transform
                .set_scale_about(center, flight.animation.scale_at(now));
            if flight.animation.is_finished(now) {
                self.animation = None;
                self.push(Outbound::ZoomLevel(flight.target_level));
            }
        }

        let interacting = animating
            || self.drag.is_dragging()
            || self.wheel.within(now, INTERACT_WINDOW_MS);

        if self.config.edge_indicators_enabled {
            if interacting {
                self.push(Outbound::IndicatorsVisible(true));
                self.indicator_timer.arm(now, INDICATOR_DEBOUNCE_MS);
            }
            if self.indicator_timer.fire(now) {
                self.push(Outbound::IndicatorsVisible(false));
            }
        }

        self.backend.clear();
        let mut overflow = EdgeOverflow::NONE;
        if let Some(image) = &self.image {
            let natural = image.size();
            let transform = self.transform.draw_transform(natural);
            let sampler = ImageSampler {
                quality: ImageQuality::High,
                ..ImageSampler::default()
            };
            let scale = self.transform.display_scale();

            if scale < self.config.low_scale_threshold && !interacting {
                if self.mip.lookup(scale, self.generation).is_none() {
                    if let Err(err) = self.mip.build(image, scale, self.generation) {
                        warn!(%err, "downsample failed, drawing at full resolution");
                    }
                }
                match self.mip.lookup(scale, self.generation) {
                    Some(cached) => {
                        // The cached image is smaller; scale it back up to
                        // the natural footprint before the view transform.
                        let restore = Affine::scale_non_uniform(
                            natural.width / f64::from(cached.width()),
                            natural.height / f64::from(cached.height()),
                        );
                        self.backend.draw_image(cached, transform * restore, sampler);
                    }
                    None => self.backend.draw_image(image, transform, sampler),
                }
            } else {
                if interacting {
                    // The scale is in motion; whatever was cached is stale.
                    self.mip.invalidate();
                }
                self.backend.draw_image(image, transform, sampler);
            }
            overflow = self.transform.edge_overflow(natural);
        }
        self.push(Outbound::EdgeOverflow(overflow));
    }

    fn detach(&mut self) {
        self.attached = false;
        self.drag.end();
        self.wheel.clear();
        self.animation = None;
        self.mip.invalidate();
        self.indicator_timer.cancel();
        self.pulse_timer.cancel();
    }
}

/// Runs `f` against the core (if it is still alive and attached), then
/// flushes the queued channel writes.
fn dispatch<B>(
    core: &Weak<RefCell<Core<B>>>,
    channels: &ViewportChannels,
    f: impl FnOnce(&mut Core<B>),
) {
    if let Some(core) = core.upgrade() {
        {
            let mut core = core.borrow_mut();
            if !core.attached {
                return;
            }
            f(&mut core);
        }
        flush(&core, channels);
    }
}

/// Delivers queued outbound writes to the channels.
///
/// Writes are delivered outside the core borrow, so a subscriber reacting to
/// one may call back into the viewport; anything it queues in turn is picked
/// up by the next loop iteration.
fn flush<B>(core: &Rc<RefCell<Core<B>>>, channels: &ViewportChannels) {
    loop {
        let batch = mem::take(&mut core.borrow_mut().outbox);
        if batch.is_empty() {
            return;
        }
        for out in batch {
            match out {
                Outbound::ZoomLevel(level) => channels.zoom_level.set(level),
                Outbound::EdgeOverflow(overflow) => channels.edge_overflow.set(overflow),
                Outbound::IndicatorsVisible(visible) => channels.indicators_visible.set(visible),
                Outbound::ZoomPulse(pulse) => channels.zoom_pulse.set(pulse),
                Outbound::ImageSettled => {
                    let settled = channels.image_settled.get().wrapping_add(1);
                    channels.image_settled.set(settled);
                }
            }
        }
    }
}

/// The viewport controller: one image, one surface, one set of channels.
///
/// A `Viewport` owns its [`ViewportBackend`] and subscribes to the inbound
/// [`ViewportChannels`] on attach. The host forwards pointer and wheel input,
/// reports surface resizes, and calls [`Viewport::render_frame`] from its own
/// frame scheduler; the viewport publishes derived state (realized zoom,
/// edge overflow, indicator visibility, zoom pulses) back through the
/// channels.
///
/// Dropping the viewport detaches it.
pub struct Viewport<B: ViewportBackend> {
    core: Rc<RefCell<Core<B>>>,
    channels: ViewportChannels,
    unsubscribers: Vec<Box<dyn FnOnce()>>,
}

impl<B: ViewportBackend> fmt::Debug for Viewport<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("attached", &self.core.borrow().attached)
            .finish_non_exhaustive()
    }
}

impl<B: ViewportBackend + 'static> Viewport<B> {
    /// Attaches a viewport to a backend and a set of channels.
    ///
    /// The channels' current image and rotation are adopted immediately: if
    /// a drawable image is already present it is fitted, centered, and
    /// published before this returns. `surface` is the current surface size
    /// in pixels; pass [`Size::ZERO`] if unknown and report the real size via
    /// [`Viewport::surface_resized`] once it is.
    pub fn attach(
        backend: B,
        surface: Size,
        channels: ViewportChannels,
        config: ViewportConfig,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let core = Rc::new(RefCell::new(Core {
            backend,
            transform: ViewTransform::new(surface),
            image: None,
            drag: DragState::default(),
            wheel: WheelState::default(),
            animation: None,
            mip: MipCache::new(),
            generation: 0,
            indicator_timer: Debounce::default(),
            pulse_timer: Debounce::default(),
            refit_on_resize: channels.refit_on_resize.get(),
            fast_zoom: channels.fast_zoom.get(),
            slow_zoom: channels.slow_zoom.get(),
            config,
            clock,
            attached: true,
            outbox: Vec::new(),
        }));

        let mut viewport = Self {
            core,
            channels,
            unsubscribers: Vec::new(),
        };
        viewport.wire_channels();

        let rotation = viewport.channels.rotation.get();
        let image = viewport.channels.image.get();
        viewport.with_core(|core| {
            core.transform.set_rotation(rotation);
            core.sync_image(image);
        });
        debug!(
            width = surface.width,
            height = surface.height,
            "viewport attached"
        );
        viewport
    }

    fn wire_channels(&mut self) {
        let zoom_level = self.channels.zoom_level.clone();
        self.wire(&zoom_level, |core, level| core.zoom_level_requested(*level));

        let image = self.channels.image.clone();
        self.wire(&image, |core, image| core.sync_image(image.clone()));

        let rotation = self.channels.rotation.clone();
        self.wire(&rotation, |core, rotation| core.set_rotation(*rotation));

        let refit = self.channels.refit_on_resize.clone();
        self.wire(&refit, |core, refit| core.refit_on_resize = *refit);

        let fast = self.channels.fast_zoom.clone();
        self.wire(&fast, |core, fast| core.fast_zoom = *fast);

        let slow = self.channels.slow_zoom.clone();
        self.wire(&slow, |core, slow| core.slow_zoom = *slow);
    }

    /// Subscribes `handler` to `signal`, routed through the core with a
    /// deferred flush, and records the unsubscriber for detach.
    fn wire<T: Clone + 'static>(
        &mut self,
        signal: &Signal<T>,
        handler: impl Fn(&mut Core<B>, &T) + 'static,
    ) {
        let weak = Rc::downgrade(&self.core);
        let channels = self.channels.clone();
        let sub = signal.subscribe(move |value| {
            dispatch(&weak, &channels, |core| handler(core, value));
        });
        let signal = signal.clone();
        self.unsubscribers.push(Box::new(move || signal.unsubscribe(sub)));
    }

    fn with_core<R>(&self, f: impl FnOnce(&mut Core<B>) -> R) -> R {
        let result = f(&mut self.core.borrow_mut());
        flush(&self.core, &self.channels);
        result
    }

    /// Begins a drag at `position` (surface pixels), cancelling any running
    /// zoom animation. A no-op without an image.
    pub fn pointer_down(&self, position: Point) {
        self.with_core(|core| core.pointer_down(position));
    }

    /// Pans the image so the grabbed point stays under the pointer. A no-op
    /// when no drag is active.
    pub fn pointer_move(&self, position: Point) {
        self.with_core(|core| core.pointer_move(position));
    }

    /// Ends the current drag. Hosts should forward both pointer-up and
    /// pointer-leave here.
    pub fn pointer_up(&self) {
        self.with_core(Core::pointer_up);
    }

    /// Applies a wheel-zoom step anchored at `position` (surface pixels).
    ///
    /// The realized zoom level is written back to the `zoom_level` channel
    /// and a direction pulse is published. A no-op without an image.
    pub fn wheel(&self, position: Point, delta_y: f64) {
        self.with_core(|core| core.wheel(position, delta_y));
    }

    /// Reconciles the viewport with a new surface size and repaints.
    ///
    /// Depending on the `refit_on_resize` channel the image is either
    /// refitted and recentered or kept at its scale with the offset rescaled
    /// proportionally. Without an image only the size is recorded.
    pub fn surface_resized(&self, surface: Size) {
        self.with_core(|core| core.surface_resized(surface));
    }

    /// Renders one frame: steps the zoom animation, updates indicator and
    /// pulse timers, clears the backend, draws the image (from the
    /// downsample cache on calm low-scale frames), and publishes the edge
    /// overflow.
    ///
    /// The host's frame scheduler decides when this runs; the viewport never
    /// schedules frames itself.
    pub fn render_frame(&self) {
        self.with_core(Core::render_frame);
    }

    /// Gives the host access to the backend, e.g. to present the rendered
    /// frame.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(&mut self.core.borrow_mut().backend)
    }

    /// Returns `true` until [`Viewport::detach`] (or drop).
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.core.borrow().attached
    }

    /// Unsubscribes from all channels and resets interaction state.
    ///
    /// After this every input and frame call is a no-op. Detaching twice is
    /// harmless.
    pub fn detach(&mut self) {
        for unsubscribe in self.unsubscribers.drain(..) {
            unsubscribe();
        }
        let mut core = self.core.borrow_mut();
        if core.attached {
            core.detach();
            debug!("viewport detached");
        }
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        let core = self.core.borrow();
        ViewportDebugInfo {
            attached: core.attached,
            surface: core.transform.surface(),
            base_scale: core.transform.base_scale(),
            display_scale: core.transform.display_scale(),
            zoom_level: core.transform.zoom_level(),
            offset: core.transform.offset(),
            rotation: core.transform.rotation(),
            has_image: core.image.is_some(),
            dragging: core.drag.is_dragging(),
            animating: core.animation.is_some(),
            generation: core.generation,
        }
    }
}

impl<B: ViewportBackend> Drop for Viewport<B> {
    fn drop(&mut self) {
        for unsubscribe in self.unsubscribers.drain(..) {
            unsubscribe();
        }
        self.core.borrow_mut().detach();
    }
}

/// Debug snapshot of a [`Viewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// Whether the viewport is still attached to its channels.
    pub attached: bool,
    /// Current surface size in pixels.
    pub surface: Size,
    /// Scale at which the rotation-adjusted image exactly fits the surface.
    pub base_scale: f64,
    /// Current effective scale.
    pub display_scale: f64,
    /// Current zoom level relative to the fitted scale.
    pub zoom_level: f64,
    /// Translation at which the image center is drawn, in surface pixels.
    pub offset: Vec2,
    /// Current rotation.
    pub rotation: Rotation,
    /// Whether an image is loaded.
    pub has_image: bool,
    /// Whether a drag is in progress.
    pub dragging: bool,
    /// Whether a zoom animation is in flight.
    pub animating: bool,
    /// Current cache-invalidation generation.
    pub generation: u64,
}
