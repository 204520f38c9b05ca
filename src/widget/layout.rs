// SPDX-License-Identifier: MPL-2.0

//! Clock face layout
//!
//! Text content and size estimate for the widget, based on what is shown.

use chrono::{DateTime, TimeZone};
use std::fmt;

use super::geometry::Size;

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%A, %d %B %Y";

/// Padding added around the text block, in pixels.
pub const PADDING: i32 = 20;

/// Lines drawn on the clock face, top to bottom.
pub fn clock_lines<Tz: TimeZone>(now: &DateTime<Tz>, show_date: bool) -> Vec<String>
where
    Tz::Offset: fmt::Display,
{
    let mut lines = Vec::with_capacity(2);
    if show_date {
        lines.push(now.format(DATE_FORMAT).to_string());
    }
    lines.push(now.format(TIME_FORMAT).to_string());
    lines
}

/// Estimate the widget size in pixels for a bold sans face at `font_size` points.
pub fn estimate_size(lines: &[String], font_size: i32) -> Size {
    let pixel_size = f64::from(font_size) * 96.0 / 72.0;
    let widest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let width = (widest as f64 * pixel_size * 0.6).ceil() as i32;
    let height = (lines.len() as f64 * pixel_size * 1.2).ceil() as i32;

    Size::new(width + PADDING, height + PADDING)
}
