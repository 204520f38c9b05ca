// SPDX-License-Identifier: MPL-2.0

//! Widget module organization

pub mod clock;
pub mod drag;
pub mod geometry;
pub mod layout;
pub mod presets;
pub mod render;

pub use clock::ClockWidget;
pub use geometry::{Direction, Point, Rect, Size};
pub use render::{Frame, Renderer};
