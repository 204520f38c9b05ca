// SPDX-License-Identifier: MPL-2.0

//! Rendering seam between the clock widget and whatever draws it.
//!
//! The widget never touches a drawing API. Each redraw it composes a
//! [`Frame`] describing what should be visible and hands it to a
//! [`Renderer`], which also reports the attached screens and measures the
//! frame in its own units.

use std::io;

use crate::config::{DisplaySettings, Rgb};

use super::geometry::{Point, Rect, Size, VISIBLE_MARGIN};
use super::layout::estimate_size;

/// Background fill behind the clock text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub color: Rgb,
    /// Opacity of the fill only; the text always stays fully opaque.
    pub opacity: f64,
}

/// Everything needed to draw one clock frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub origin: Point,
    pub lines: Vec<String>,
    pub text_color: Rgb,
    pub font_size: i32,
    pub background: Option<Background>,
}

impl Frame {
    pub fn compose(settings: &DisplaySettings, origin: Point, lines: Vec<String>) -> Self {
        let background = settings.show_background.then_some(Background {
            color: settings.background_color,
            opacity: settings.background_opacity,
        });

        Self {
            origin,
            lines,
            text_color: settings.text_color,
            font_size: settings.font_size,
            background,
        }
    }
}

pub trait Renderer {
    /// Working areas of the attached screens, primary first.
    fn screens(&self) -> Vec<Rect>;

    /// Size the frame will occupy once drawn. Defaults to the pixel
    /// estimate for a bold sans face.
    fn measure(&self, frame: &Frame) -> Size {
        estimate_size(&frame.lines, frame.font_size)
    }

    /// How far a stored position must stay from the right and bottom screen
    /// edges, in the renderer's units.
    fn visible_margin(&self) -> i32 {
        VISIBLE_MARGIN
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()>;

    /// Show a one-line message to the user.
    fn notify(&mut self, message: &str) -> io::Result<()>;
}

/// Composite `color` at `opacity` over an opaque `base`.
pub fn blend_over(color: Rgb, opacity: f64, base: Rgb) -> Rgb {
    let alpha = opacity.clamp(0.0, 1.0);
    let mix = |top: u8, bottom: u8| -> u8 {
        (f64::from(top) * alpha + f64::from(bottom) * (1.0 - alpha)).round() as u8
    };
    Rgb::new(
        mix(color.red, base.red),
        mix(color.green, base.green),
        mix(color.blue, base.blue),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_background_is_omitted() {
        let settings = DisplaySettings {
            show_background: false,
            ..DisplaySettings::default()
        };
        let frame = Frame::compose(&settings, Point::default(), vec!["12:00:00".into()]);
        assert_eq!(frame.background, None);
    }

    #[test]
    fn frame_carries_live_settings() {
        let settings = DisplaySettings {
            text_color: Rgb::new(1, 2, 3),
            font_size: 30,
            background_color: Rgb::new(9, 9, 9),
            background_opacity: 0.5,
            ..DisplaySettings::default()
        };
        let frame = Frame::compose(&settings, Point::new(4, 5), vec![]);
        assert_eq!(frame.origin, Point::new(4, 5));
        assert_eq!(frame.text_color, Rgb::new(1, 2, 3));
        assert_eq!(frame.font_size, 30);
        assert_eq!(
            frame.background,
            Some(Background {
                color: Rgb::new(9, 9, 9),
                opacity: 0.5
            })
        );
    }

    struct PixelSurface;

    impl Renderer for PixelSurface {
        fn screens(&self) -> Vec<Rect> {
            vec![Rect::new(0, 0, 1920, 1080)]
        }

        fn draw(&mut self, _frame: &Frame) -> io::Result<()> {
            Ok(())
        }

        fn notify(&mut self, _message: &str) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn pixel_defaults() {
        let lines = vec!["12:00:00".to_string()];
        let frame = Frame::compose(&DisplaySettings::default(), Point::default(), lines.clone());
        assert_eq!(PixelSurface.measure(&frame), estimate_size(&lines, 24));
        assert_eq!(PixelSurface.visible_margin(), VISIBLE_MARGIN);
    }

    #[test]
    fn blending_extremes() {
        let red = Rgb::new(255, 0, 0);
        assert_eq!(blend_over(red, 1.0, Rgb::BLACK), red);
        assert_eq!(blend_over(red, 0.0, Rgb::BLACK), Rgb::BLACK);
        assert_eq!(blend_over(Rgb::WHITE, 0.5, Rgb::BLACK), Rgb::new(128, 128, 128));
    }
}
