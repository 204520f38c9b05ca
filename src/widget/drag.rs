// SPDX-License-Identifier: MPL-2.0

//! Move mode and pointer dragging.
//!
//! Pointer positions are relative to the widget surface. Because the surface
//! moves with the drag, the anchor recorded on press stays valid for the
//! whole gesture and each motion event moves the widget by the pointer's
//! offset from it.

use super::geometry::Point;

#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    move_mode: bool,
    anchor: Option<Point>,
}

impl DragTracker {
    pub fn move_mode(&self) -> bool {
        self.move_mode
    }

    /// Flip move mode. Leaving move mode abandons any drag in progress.
    pub fn toggle_move_mode(&mut self) -> bool {
        self.move_mode = !self.move_mode;
        if !self.move_mode {
            self.anchor = None;
        }
        log::debug!("Move mode {}", if self.move_mode { "on" } else { "off" });
        self.move_mode
    }

    #[cfg(test)]
    fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Primary button pressed at `at`. Ignored outside move mode.
    pub fn press(&mut self, at: Point) {
        if self.move_mode {
            self.anchor = Some(at);
        }
    }

    /// Pointer moved to `at`; returns the widget's new top-left corner.
    pub fn motion(&mut self, at: Point, window: Point) -> Option<Point> {
        let anchor = self.anchor?;
        let (dx, dy) = (at.x - anchor.x, at.y - anchor.y);
        if dx == 0 && dy == 0 {
            return None;
        }
        Some(window.offset(dx, dy))
    }

    /// Primary button released. Returns `true` when a drag ended and the
    /// position should be saved.
    pub fn release(&mut self) -> bool {
        self.anchor.take().is_some() && self.move_mode
    }
}
