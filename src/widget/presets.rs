// SPDX-License-Identifier: MPL-2.0

//! Named text colors offered by the settings dialog.

use crate::config::Rgb;

/// Label shown when the current color matches no preset.
pub const CUSTOM_PRESET: &str = "Custom";

/// Presets in alphabetical order.
pub const COLOR_PRESETS: &[(&str, Rgb)] = &[
    ("Blue", Rgb::new(0, 0, 255)),
    ("Cyan", Rgb::new(0, 255, 255)),
    ("Gray", Rgb::new(128, 128, 128)),
    ("Green", Rgb::new(0, 128, 0)),
    ("Light Blue", Rgb::new(173, 216, 230)),
    ("Light Green", Rgb::new(144, 238, 144)),
    ("Light Yellow", Rgb::new(255, 255, 224)),
    ("Magenta", Rgb::new(255, 0, 255)),
    ("Orange", Rgb::new(255, 165, 0)),
    ("Pink", Rgb::new(255, 192, 203)),
    ("Purple", Rgb::new(128, 0, 128)),
    ("Red", Rgb::new(255, 0, 0)),
    ("White", Rgb::new(255, 255, 255)),
    ("Yellow", Rgb::new(255, 255, 0)),
];

/// Look up a preset by name, ignoring case and surrounding whitespace.
pub fn preset_color(name: &str) -> Option<Rgb> {
    let name = name.trim();
    COLOR_PRESETS
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(name))
        .map(|(_, color)| *color)
}

/// The preset label for `color`, or [`CUSTOM_PRESET`].
pub fn preset_label(color: Rgb) -> &'static str {
    COLOR_PRESETS
        .iter()
        .find(|(_, preset)| *preset == color)
        .map(|(label, _)| *label)
        .unwrap_or(CUSTOM_PRESET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_sorted() {
        let labels: Vec<_> = COLOR_PRESETS.iter().map(|(label, _)| *label).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(preset_color("light blue"), Some(Rgb::new(173, 216, 230)));
        assert_eq!(preset_color(" RED "), Some(Rgb::new(255, 0, 0)));
        assert_eq!(preset_color("chartreuse"), None);
    }

    #[test]
    fn unknown_color_is_custom() {
        assert_eq!(preset_label(Rgb::WHITE), "White");
        assert_eq!(preset_label(Rgb::new(1, 2, 3)), CUSTOM_PRESET);
    }
}
