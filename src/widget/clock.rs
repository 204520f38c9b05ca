// SPDX-License-Identifier: MPL-2.0

//! The clock widget's live state.
//!
//! `ClockWidget` exclusively owns the [`DisplaySettings`] the user sees.
//! Changes from the context menu, from dragging and from the settings
//! dialog all arrive as [`DisplayChange`] values; any effective change marks
//! the widget dirty so the next tick redraws it.

use std::fmt;

use chrono::{DateTime, TimeZone};

use crate::config::{DisplayChange, DisplaySettings};

use super::drag::DragTracker;
use super::geometry::{self, Direction, Point, Rect, Size};
use super::layout::clock_lines;
use super::render::Frame;

#[derive(Debug, Clone)]
pub struct ClockWidget {
    /// Live settings. `position` is always `Some` once constructed.
    settings: DisplaySettings,
    /// Working areas of the attached screens, primary first
    screens: Vec<Rect>,
    /// Edge margin for the stored-position check, in screen units
    visible_margin: i32,
    /// Last measured size of the clock face
    size: Size,
    drag: DragTracker,
    /// Set by any state change, cleared by the next frame
    dirty: bool,
    /// Unix second of the last composed frame
    last_drawn_second: Option<i64>,
}

impl ClockWidget {
    /// Place the widget on pixel-sized screens.
    pub fn new(settings: DisplaySettings, screens: Vec<Rect>, size: Size) -> Self {
        Self::with_visible_margin(settings, screens, size, geometry::VISIBLE_MARGIN)
    }

    pub fn with_visible_margin(
        settings: DisplaySettings,
        screens: Vec<Rect>,
        size: Size,
        visible_margin: i32,
    ) -> Self {
        let mut settings = settings.normalized();
        let position =
            geometry::resolve_position(settings.position, &screens, size, visible_margin);
        settings.position = Some(position);

        log::info!(
            "Clock widget at ({}, {}), font size {}",
            position.x,
            position.y,
            settings.font_size
        );

        Self {
            settings,
            screens,
            visible_margin,
            size,
            drag: DragTracker::default(),
            dirty: true,
            last_drawn_second: None,
        }
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn position(&self) -> Point {
        self.settings.position.unwrap_or_default()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Apply one change to the live state. Returns whether it changed anything.
    pub fn apply(&mut self, change: DisplayChange) -> bool {
        log::debug!("Applying {:?}", change);
        let changed = self.settings.apply(change);
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Record the size the renderer measured for the last frame.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Replace the screen list, recentring if the widget is no longer visible.
    pub fn set_screens(&mut self, screens: Vec<Rect>) {
        if screens == self.screens {
            return;
        }
        let position = geometry::resolve_position(
            self.settings.position,
            &screens,
            self.size,
            self.visible_margin,
        );
        self.screens = screens;
        self.apply(DisplayChange::MoveTo(position));
    }

    /// Centre the widget on the primary screen.
    pub fn reset_position(&mut self) -> bool {
        let Some(primary) = self.screens.first() else {
            return false;
        };
        let target = primary.centered(self.size);
        log::info!("Resetting position to ({}, {})", target.x, target.y);
        self.apply(DisplayChange::MoveTo(target))
    }

    /// Move one nudge step, keeping the widget on its current screen.
    pub fn nudge(&mut self, direction: Direction, large: bool) -> bool {
        let step = if large {
            geometry::LARGE_STEP
        } else {
            geometry::SMALL_STEP
        };
        let Some(area) = geometry::screen_for(self.position(), self.size, &self.screens) else {
            return false;
        };
        let target = geometry::nudge(self.position(), direction, step, area, self.size);
        self.apply(DisplayChange::MoveTo(target))
    }

    // ------------------------------------------------------------------------
    // Move mode
    // ------------------------------------------------------------------------

    pub fn move_mode(&self) -> bool {
        self.drag.move_mode()
    }

    pub fn toggle_move_mode(&mut self) -> bool {
        self.drag.toggle_move_mode()
    }

    pub fn pointer_press(&mut self, at: Point) {
        self.drag.press(at);
    }

    /// Returns whether the widget moved.
    pub fn pointer_motion(&mut self, at: Point) -> bool {
        match self.drag.motion(at, self.position()) {
            Some(target) => self.apply(DisplayChange::MoveTo(target)),
            None => false,
        }
    }

    /// Returns `true` when a drag finished and the position should be saved.
    pub fn pointer_release(&mut self) -> bool {
        self.drag.release()
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Redraw when state changed or the displayed second rolled over.
    pub fn needs_redraw<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.dirty || self.last_drawn_second != Some(now.timestamp())
    }

    /// Compose the frame for `now` and mark it drawn.
    pub fn compose_frame<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Frame
    where
        Tz::Offset: fmt::Display,
    {
        self.dirty = false;
        self.last_drawn_second = Some(now.timestamp());
        Frame::compose(
            &self.settings,
            self.position(),
            clock_lines(now, self.settings.show_date),
        )
    }
}
