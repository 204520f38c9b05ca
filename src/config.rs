// SPDX-License-Identifier: MPL-2.0

//! Display settings shared by the clock widget and the settings dialog.
//!
//! `DisplaySettings` is the single owned piece of live state. Every mutation
//! goes through [`DisplaySettings::apply`] with a [`DisplayChange`], which is
//! where the font-size and opacity bounds are enforced.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::widget::geometry::Point;

/// Name under which the clock registers itself with the desktop.
pub const APP_NAME: &str = "DesktopClock";

/// Directory and file stem used for settings, logs and the autostart entry.
pub const APP_ID: &str = "desktop-clock";

pub const MIN_FONT_SIZE: i32 = 8;
pub const MAX_FONT_SIZE: i32 = 72;
pub const DEFAULT_FONT_SIZE: i32 = 24;

pub const MIN_OPACITY: f64 = 0.1;
pub const MAX_OPACITY: f64 = 1.0;
pub const DEFAULT_OPACITY: f64 = 0.8;

// ============================================================================
// Colors
// ============================================================================

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Error returned when a color string is not `"R,G,B"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{input}', expected R,G,B with channels 0-255")]
pub struct ParseColorError {
    pub input: String,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.red, self.green, self.blue)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseColorError {
            input: s.to_string(),
        };

        let mut channels = s.split(',').map(|part| part.trim().parse::<u8>());
        let red = channels.next().ok_or_else(error)?.map_err(|_| error())?;
        let green = channels.next().ok_or_else(error)?.map_err(|_| error())?;
        let blue = channels.next().ok_or_else(error)?.map_err(|_| error())?;
        if channels.next().is_some() {
            return Err(error());
        }

        Ok(Rgb::new(red, green, blue))
    }
}

// ============================================================================
// Clamping
// ============================================================================

pub fn clamp_font_size(size: i32) -> i32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Clamp a background opacity into `[0.1, 1.0]`.
///
/// NaN has no meaningful position in the range and maps to the default.
pub fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        return DEFAULT_OPACITY;
    }
    opacity.clamp(MIN_OPACITY, MAX_OPACITY)
}

/// Map an opacity slider position (0-100 percent) to a clamped opacity.
pub fn opacity_from_percent(percent: u8) -> f64 {
    clamp_opacity(f64::from(percent.min(100)) / 100.0)
}

/// Slider position for an opacity value.
pub fn opacity_to_percent(opacity: f64) -> u8 {
    (clamp_opacity(opacity) * 100.0).round() as u8
}

// ============================================================================
// Display Settings
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    /// Top-left corner of the widget. `None` means "centre on the primary screen".
    pub position: Option<Point>,
    /// Clock text color
    pub text_color: Rgb,
    /// Font size in points, always within `[MIN_FONT_SIZE, MAX_FONT_SIZE]`
    pub font_size: i32,
    /// Show a date line above the time
    pub show_date: bool,
    /// Background fill color
    pub background_color: Rgb,
    /// Background opacity, always within `[MIN_OPACITY, MAX_OPACITY]`
    pub background_opacity: f64,
    /// Draw the background at all
    pub show_background: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            position: None,
            text_color: Rgb::WHITE,
            font_size: DEFAULT_FONT_SIZE,
            show_date: false,
            background_color: Rgb::BLACK,
            background_opacity: DEFAULT_OPACITY,
            show_background: true,
        }
    }
}

/// One mutation of the live display state.
///
/// Both the widget's own menu and the settings dialog express their edits
/// as `DisplayChange` values so that all of them pass through the same
/// clamping and redraw logic.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayChange {
    TextColor(Rgb),
    FontSize(i32),
    ShowDate(bool),
    BackgroundColor(Rgb),
    BackgroundOpacity(f64),
    ShowBackground(bool),
    MoveTo(Point),
    /// Restore every visual field to its default, keeping the position.
    ResetVisuals,
}

impl DisplaySettings {
    /// Apply a change, returning whether anything actually changed.
    pub fn apply(&mut self, change: DisplayChange) -> bool {
        let before = self.clone();
        match change {
            DisplayChange::TextColor(color) => self.text_color = color,
            DisplayChange::FontSize(size) => self.font_size = clamp_font_size(size),
            DisplayChange::ShowDate(show) => self.show_date = show,
            DisplayChange::BackgroundColor(color) => self.background_color = color,
            DisplayChange::BackgroundOpacity(opacity) => {
                self.background_opacity = clamp_opacity(opacity)
            }
            DisplayChange::ShowBackground(show) => self.show_background = show,
            DisplayChange::MoveTo(point) => self.position = Some(point),
            DisplayChange::ResetVisuals => {
                *self = Self {
                    position: self.position,
                    ..Self::default()
                }
            }
        }
        *self != before
    }

    /// Re-apply the bounds to values that came from outside (disk, user input).
    pub fn normalized(mut self) -> Self {
        self.font_size = clamp_font_size(self.font_size);
        self.background_opacity = clamp_opacity(self.background_opacity);
        self
    }
}
