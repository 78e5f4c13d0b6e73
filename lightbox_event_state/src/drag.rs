// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state helper: track a pointer drag as a grab vector.
//!
//! The viewport drags by pure translation: on pointer down the distance
//! between the pointer and the current image offset is remembered, and every
//! later pointer position yields the offset that keeps that distance
//! constant. Scale and rotation are unaffected.
//!
//! ## Usage
//!
//! 1) On pointer down, call [`DragState::start`] with the pointer position
//!    and the current image offset.
//! 2) On each pointer move, call [`DragState::offset_for`] to get the new
//!    offset, or `None` when no drag is active.
//! 3) On pointer up or leave, call [`DragState::end`].

use kurbo::{Point, Vec2};

/// Tracks an active pointer drag.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Vector from the image offset to the pointer at drag start.
    grab: Option<Vec2>,
}

impl DragState {
    /// Starts a drag at the given pointer position with the given current
    /// image offset.
    pub fn start(&mut self, pointer: Point, offset: Vec2) {
        self.grab = Some(pointer.to_vec2() - offset);
    }

    /// Returns the image offset that keeps the grabbed point under the
    /// pointer, or `None` when no drag is active.
    #[must_use]
    pub fn offset_for(&self, pointer: Point) -> Option<Vec2> {
        self.grab.map(|grab| pointer.to_vec2() - grab)
    }

    /// Ends the current drag.
    pub fn end(&mut self) {
        self.grab = None;
    }

    /// Returns `true` while a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_drag_state_is_not_dragging() {
        let drag = DragState::default();
        assert!(!drag.is_dragging());
        assert_eq!(drag.offset_for(Point::new(1.0, 2.0)), None);
    }

    #[test]
    fn start_sets_dragging_state() {
        let mut drag = DragState::default();
        drag.start(Point::new(120.0, 80.0), Vec2::new(100.0, 50.0));
        assert!(drag.is_dragging());
    }

    #[test]
    fn offset_follows_the_pointer() {
        let mut drag = DragState::default();
        drag.start(Point::new(120.0, 80.0), Vec2::new(100.0, 50.0));

        // No movement: the offset is unchanged.
        assert_eq!(
            drag.offset_for(Point::new(120.0, 80.0)),
            Some(Vec2::new(100.0, 50.0))
        );

        // Moves translate the offset one-to-one.
        assert_eq!(
            drag.offset_for(Point::new(130.0, 95.0)),
            Some(Vec2::new(110.0, 65.0))
        );
        assert_eq!(
            drag.offset_for(Point::new(90.0, 60.0)),
            Some(Vec2::new(70.0, 30.0))
        );
    }

    #[test]
    fn end_stops_the_drag() {
        let mut drag = DragState::default();
        drag.start(Point::new(10.0, 10.0), Vec2::ZERO);
        drag.end();

        assert!(!drag.is_dragging());
        assert_eq!(drag.offset_for(Point::new(20.0, 20.0)), None);
    }

    #[test]
    fn end_on_fresh_state_is_safe() {
        let mut drag = DragState::default();
        drag.end();
        assert!(!drag.is_dragging());
    }

    #[test]
    fn start_overwrites_previous_drag() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0), Vec2::new(5.0, 5.0));
        drag.start(Point::new(100.0, 100.0), Vec2::new(20.0, 30.0));

        assert_eq!(
            drag.offset_for(Point::new(110.0, 105.0)),
            Some(Vec2::new(30.0, 35.0))
        );
    }

    #[test]
    fn negative_and_fractional_coordinates() {
        let mut drag = DragState::default();
        drag.start(Point::new(-10.5, 4.25), Vec2::new(1.5, -2.75));

        let offset = drag.offset_for(Point::new(-8.0, 0.0)).unwrap();
        assert!((offset.x - 4.0).abs() < 1e-12);
        assert!((offset.y - (-7.0)).abs() < 1e-12);
    }
}
