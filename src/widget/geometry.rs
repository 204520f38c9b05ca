// SPDX-License-Identifier: MPL-2.0

//! Screen geometry for placing the widget.
//!
//! Units are whatever the host renderer uses (pixels for a compositor
//! surface, character cells for the terminal host). The rules below only
//! depend on the screens and the widget size being in the same unit.

/// Distance in pixels a stored position must keep from the right and bottom
/// screen edges to count as visible. Renderers in other units supply their
/// own margin.
pub const VISIBLE_MARGIN: i32 = 50;

/// Nudge step without the large modifier.
pub const SMALL_STEP: i32 = 5;

/// Nudge step with the large modifier.
pub const LARGE_STEP: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle describing one attached screen's working area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.right() && point.y < self.bottom()
    }

    /// Top-left corner that centres `size` inside this rectangle.
    pub fn centered(&self, size: Size) -> Point {
        Point::new(
            self.x + (self.width - size.width) / 2,
            self.y + (self.height - size.height) / 2,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Whether a stored top-left corner is far enough inside `screen` to be grabbed.
fn is_visible_on(point: Point, screen: &Rect, margin: i32) -> bool {
    point.x >= screen.x
        && point.y >= screen.y
        && point.x < screen.right() - margin
        && point.y < screen.bottom() - margin
}

/// Resolve a stored position against the attached screens.
///
/// A position that is visible on any screen, at least `margin` away from its
/// right and bottom edges, is kept as is. Anything else
/// (no stored value, a disconnected monitor, a shrunken resolution) centres
/// the widget on the primary screen, which is the first one in `screens`.
pub fn resolve_position(
    saved: Option<Point>,
    screens: &[Rect],
    size: Size,
    margin: i32,
) -> Point {
    if let Some(point) = saved {
        if screens.iter().any(|screen| is_visible_on(point, screen, margin)) {
            return point;
        }
        log::info!(
            "Stored position ({}, {}) is off-screen, recentring",
            point.x,
            point.y
        );
    }

    screens
        .first()
        .map(|primary| primary.centered(size))
        .unwrap_or_default()
}

/// The screen whose area contains the widget's centre, or the primary one.
pub fn screen_for(position: Point, size: Size, screens: &[Rect]) -> Option<Rect> {
    let centre = position.offset(size.width / 2, size.height / 2);
    screens
        .iter()
        .find(|screen| screen.contains(centre))
        .or_else(|| screens.first())
        .copied()
}

/// Move `position` one step in `direction`, keeping at least half of the
/// widget inside `area`.
pub fn nudge(position: Point, direction: Direction, step: i32, area: Rect, size: Size) -> Point {
    let moved = match direction {
        Direction::Up => position.offset(0, -step),
        Direction::Down => position.offset(0, step),
        Direction::Left => position.offset(-step, 0),
        Direction::Right => position.offset(step, 0),
    };

    let half_w = size.width / 2;
    let half_h = size.height / 2;
    let min_x = area.x - half_w;
    let max_x = (area.right() - half_w).max(min_x);
    let min_y = area.y - half_h;
    let max_y = (area.bottom() - half_h).max(min_y);

    Point::new(moved.x.clamp(min_x, max_x), moved.y.clamp(min_y, max_y))
}
