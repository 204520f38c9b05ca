// SPDX-License-Identifier: MPL-2.0

//! Settings dialog.
//!
//! At most one dialog exists at a time. It keeps a working copy of the
//! display settings that starts out equal to the widget's live state; every
//! visual edit goes into the working copy and is previewed on the widget
//! immediately, without touching the store.
//!
//! - **OK** persists the widget's live state and applies the autostart choice.
//! - **Cancel** closes without persisting. The preview stays on screen until
//!   the next restart, and the autostart choice is discarded.

use std::path::Path;

use crate::autostart::AutostartRegistrar;
use crate::config::{
    DisplayChange, DisplaySettings, Rgb, opacity_from_percent, opacity_to_percent,
};
use crate::notice::Notice;
use crate::store::SettingsStore;
use crate::widget::presets::{preset_color, preset_label};
use crate::widget::{ClockWidget, Direction};

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SelectPreset(String),
    PickTextColor(Rgb),
    FontSize(i32),
    ToggleDate(bool),
    ToggleBackground(bool),
    PickBackgroundColor(Rgb),
    OpacityPercent(u8),
    ToggleAutostart(bool),
    Nudge { direction: Direction, large: bool },
    /// Centre the widget on the primary screen
    ResetPosition,
    /// Persist the current position right away
    SavePosition,
    ResetDefaults,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    /// A dialog was already open and was brought to the front
    Focused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Confirmed,
    Cancelled,
}

/// Everything the dialog needs to commit.
pub struct SettingsContext<'a> {
    pub store: &'a SettingsStore,
    pub autostart: &'a dyn AutostartRegistrar,
    pub exe_path: &'a Path,
}

#[derive(Debug, Default)]
pub struct DialogResponse {
    pub closed: Option<CloseReason>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone)]
pub struct SettingsDialog {
    working: DisplaySettings,
    autostart: bool,
    color_preset: &'static str,
}

impl SettingsDialog {
    fn new(widget: &ClockWidget, autostart_enabled: bool) -> Self {
        let working = widget.settings().clone();
        Self {
            color_preset: preset_label(working.text_color),
            working,
            autostart: autostart_enabled,
        }
    }

    pub fn working(&self) -> &DisplaySettings {
        &self.working
    }

    /// Pending "start with the system" choice.
    pub fn autostart(&self) -> bool {
        self.autostart
    }

    /// Opacity slider position, 10-100.
    pub fn opacity_percent(&self) -> u8 {
        opacity_to_percent(self.working.background_opacity)
    }

    /// Preset name for the current text color, or "Custom".
    pub fn color_preset(&self) -> &'static str {
        self.color_preset
    }

    fn preview(&mut self, change: DisplayChange, widget: &mut ClockWidget) {
        self.working.apply(change.clone());
        widget.apply(change);
    }
}

/// Holder enforcing the single-dialog rule.
#[derive(Debug, Default)]
pub struct DialogSlot {
    dialog: Option<SettingsDialog>,
}

impl DialogSlot {
    pub fn is_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn dialog(&self) -> Option<&SettingsDialog> {
        self.dialog.as_ref()
    }

    pub fn open(
        &mut self,
        widget: &ClockWidget,
        autostart: &dyn AutostartRegistrar,
    ) -> OpenOutcome {
        if self.dialog.is_some() {
            log::debug!("Settings dialog already open, focusing it");
            return OpenOutcome::Focused;
        }

        log::info!("Opening settings dialog");
        self.dialog = Some(SettingsDialog::new(widget, autostart.is_enabled()));
        OpenOutcome::Opened
    }

    pub fn update(
        &mut self,
        message: Message,
        widget: &mut ClockWidget,
        ctx: &SettingsContext<'_>,
    ) -> DialogResponse {
        let mut response = DialogResponse::default();

        let Some(dialog) = self.dialog.as_mut() else {
            log::warn!("Ignoring {:?}, settings dialog is not open", message);
            response.notices.push(Notice::SettingsNotOpen);
            return response;
        };

        match message {
            Message::SelectPreset(name) => match preset_color(&name) {
                Some(color) => {
                    dialog.preview(DisplayChange::TextColor(color), widget);
                    dialog.color_preset = preset_label(color);
                }
                None => log::warn!("Unknown color preset '{}'", name),
            },
            Message::PickTextColor(color) => {
                dialog.preview(DisplayChange::TextColor(color), widget);
                dialog.color_preset = preset_label(color);
            }
            Message::FontSize(size) => dialog.preview(DisplayChange::FontSize(size), widget),
            Message::ToggleDate(show) => dialog.preview(DisplayChange::ShowDate(show), widget),
            Message::ToggleBackground(show) => {
                dialog.preview(DisplayChange::ShowBackground(show), widget)
            }
            Message::PickBackgroundColor(color) => {
                dialog.preview(DisplayChange::BackgroundColor(color), widget)
            }
            Message::OpacityPercent(percent) => dialog.preview(
                DisplayChange::BackgroundOpacity(opacity_from_percent(percent)),
                widget,
            ),
            Message::ToggleAutostart(enabled) => dialog.autostart = enabled,
            Message::Nudge { direction, large } => {
                if widget.nudge(direction, large) {
                    dialog.working.position = widget.settings().position;
                }
            }
            Message::ResetPosition => {
                widget.reset_position();
                dialog.working.position = widget.settings().position;
                response.notices.push(Notice::PositionReset);
            }
            Message::SavePosition => match ctx.store.save_position(widget.position()) {
                Ok(()) => response.notices.push(Notice::PositionSaved),
                Err(err) => log::warn!("Failed to save position: {}", err),
            },
            Message::ResetDefaults => {
                dialog.preview(DisplayChange::ResetVisuals, widget);
                dialog.color_preset = preset_label(dialog.working.text_color);
                dialog.autostart = false;
                response.notices.push(Notice::SettingsReset);
            }
            Message::Confirm => {
                let autostart = dialog.autostart;
                self.dialog = None;
                response.notices.extend(commit(widget, autostart, ctx));
                response.closed = Some(CloseReason::Confirmed);
            }
            Message::Cancel => {
                log::info!("Settings dialog cancelled");
                self.dialog = None;
                response.closed = Some(CloseReason::Cancelled);
            }
        }

        response
    }
}

/// Persist the live state and apply the autostart choice.
///
/// A failed save is only logged; a failed autostart change is reported.
fn commit(widget: &ClockWidget, autostart: bool, ctx: &SettingsContext<'_>) -> Vec<Notice> {
    let mut notices = Vec::new();

    if let Err(err) = ctx.store.save(widget.settings()) {
        log::warn!("Failed to save settings: {}", err);
    }

    if let Err(err) = ctx.autostart.set_enabled(autostart, ctx.exe_path) {
        log::error!("Error setting autostart: {}", err);
        notices.push(Notice::AutostartFailed {
            reason: err.to_string(),
        });
    }

    log::info!("Settings applied");
    notices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autostart::{AutostartError, XdgAutostart};
    use crate::widget::{Point, Rect, Size};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const EXE: &str = "/usr/bin/desktop-clock";

    struct Fixture {
        _dir: TempDir,
        store: SettingsStore,
        autostart: XdgAutostart,
        exe: PathBuf,
        widget: ClockWidget,
        slot: DialogSlot,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let store = SettingsStore::new(dir.path().join("settings.json"));
            let autostart = XdgAutostart::in_dir(dir.path().join("autostart"));
            let widget = ClockWidget::new(
                DisplaySettings {
                    position: Some(Point::new(100, 100)),
                    ..DisplaySettings::default()
                },
                vec![Rect::new(0, 0, 1000, 800)],
                Size::new(200, 70),
            );
            Self {
                _dir: dir,
                store,
                autostart,
                exe: PathBuf::from(EXE),
                widget,
                slot: DialogSlot::default(),
            }
        }

        fn send(&mut self, message: Message) -> DialogResponse {
            let ctx = SettingsContext {
                store: &self.store,
                autostart: &self.autostart,
                exe_path: &self.exe,
            };
            self.slot.update(message, &mut self.widget, &ctx)
        }
    }

    struct BrokenAutostart;

    impl AutostartRegistrar for BrokenAutostart {
        fn is_enabled(&self) -> bool {
            false
        }

        fn set_enabled(&self, _enabled: bool, exe_path: &Path) -> Result<(), AutostartError> {
            Err(AutostartError::Permission {
                path: exe_path.to_path_buf(),
            })
        }
    }

    #[test]
    fn second_open_focuses_existing_dialog() {
        let mut fx = Fixture::new();
        assert_eq!(fx.slot.open(&fx.widget, &fx.autostart), OpenOutcome::Opened);
        fx.send(Message::FontSize(40));

        assert_eq!(fx.slot.open(&fx.widget, &fx.autostart), OpenOutcome::Focused);
        assert_eq!(fx.slot.dialog().unwrap().working().font_size, 40);
    }

    #[test]
    fn edits_preview_live_without_persisting() {
        let mut fx = Fixture::new();
        fx.slot.open(&fx.widget, &fx.autostart);

        fx.send(Message::PickTextColor(Rgb::new(255, 0, 0)));
        fx.send(Message::OpacityPercent(50));

        assert_eq!(fx.widget.settings().text_color, Rgb::new(255, 0, 0));
        assert_eq!(fx.widget.settings().background_opacity, 0.5);
        assert!(!fx.store.path().exists());
        let dialog = fx.slot.dialog().unwrap();
        assert_eq!(dialog.color_preset(), "Red");
        assert_eq!(dialog.opacity_percent(), 50);
    }

    #[test]
    fn cancel_keeps_preview_but_persists_nothing() {
        let mut fx = Fixture::new();
        fx.slot.open(&fx.widget, &fx.autostart);
        fx.send(Message::SelectPreset("Orange".to_string()));
        assert_eq!(fx.slot.dialog().unwrap().color_preset(), "Orange");
        fx.send(Message::ToggleAutostart(true));

        let response = fx.send(Message::Cancel);

        assert_eq!(response.closed, Some(CloseReason::Cancelled));
        assert!(!fx.slot.is_open());
        assert_eq!(fx.widget.settings().text_color, Rgb::new(255, 165, 0));
        assert_eq!(fx.store.load().text_color, Rgb::WHITE);
        assert!(!fx.autostart.is_enabled());
    }

    #[test]
    fn confirm_persists_live_state_and_autostart() {
        let mut fx = Fixture::new();
        fx.slot.open(&fx.widget, &fx.autostart);
        fx.send(Message::FontSize(36));
        fx.send(Message::ToggleDate(true));
        fx.send(Message::ToggleAutostart(true));

        let response = fx.send(Message::Confirm);

        assert_eq!(response.closed, Some(CloseReason::Confirmed));
        assert!(response.notices.is_empty());
        let saved = fx.store.load();
        assert_eq!(saved.font_size, 36);
        assert!(saved.show_date);
        assert_eq!(saved.position, Some(Point::new(100, 100)));
        assert!(fx.autostart.is_enabled());
    }

    #[test]
    fn font_size_is_clamped_in_preview() {
        let mut fx = Fixture::new();
        fx.slot.open(&fx.widget, &fx.autostart);
        fx.send(Message::FontSize(200));
        assert_eq!(fx.widget.settings().font_size, 72);
    }

    #[test]
    fn nudge_moves_widget_and_working_copy() {
        let mut fx = Fixture::new();
        fx.slot.open(&fx.widget, &fx.autostart);

        fx.send(Message::Nudge {
            direction: Direction::Left,
            large: true,
        });

        assert_eq!(fx.widget.position(), Point::new(80, 100));
        assert_eq!(
            fx.slot.dialog().unwrap().working().position,
            Some(Point::new(80, 100))
        );
    }

    #[test]
    fn reset_position_recentres_without_saving() {
        let mut fx = Fixture::new();
        fx.slot.open(&fx.widget, &fx.autostart);

        let response = fx.send(Message::ResetPosition);

        assert_eq!(response.notices, vec![Notice::PositionReset]);
        assert_eq!(fx.widget.position(), Point::new(400, 365));
        assert_eq!(
            fx.slot.dialog().unwrap().working().position,
            Some(Point::new(400, 365))
        );
        assert!(!fx.store.path().exists());
    }

    #[test]
    fn save_position_persists_only_the_position() {
        let mut fx = Fixture::new();
        fx.slot.open(&fx.widget, &fx.autostart);
        fx.send(Message::FontSize(40));
        fx.send(Message::Nudge {
            direction: Direction::Down,
            large: false,
        });

        let response = fx.send(Message::SavePosition);

        assert_eq!(response.notices, vec![Notice::PositionSaved]);
        assert!(fx.slot.is_open());
        let saved = fx.store.load();
        assert_eq!(saved.position, Some(Point::new(100, 105)));
        assert_eq!(saved.font_size, 24);
    }

    #[test]
    fn reset_restores_defaults_and_clears_autostart() {
        let mut fx = Fixture::new();
        fx.autostart.set_enabled(true, Path::new(EXE)).unwrap();
        fx.slot.open(&fx.widget, &fx.autostart);
        assert!(fx.slot.dialog().unwrap().autostart());
        fx.send(Message::PickTextColor(Rgb::new(1, 2, 3)));
        fx.send(Message::ToggleBackground(false));

        let response = fx.send(Message::ResetDefaults);

        assert_eq!(response.notices, vec![Notice::SettingsReset]);
        let dialog = fx.slot.dialog().unwrap();
        assert!(!dialog.autostart());
        assert_eq!(dialog.color_preset(), "White");
        assert_eq!(fx.widget.settings().text_color, Rgb::WHITE);
        assert!(fx.widget.settings().show_background);
        assert_eq!(fx.widget.position(), Point::new(100, 100));
        // Nothing committed until OK
        assert!(fx.autostart.is_enabled());
    }

    #[test]
    fn unknown_preset_is_ignored() {
        let mut fx = Fixture::new();
        fx.slot.open(&fx.widget, &fx.autostart);
        fx.send(Message::SelectPreset("Chartreuse".to_string()));
        assert_eq!(fx.widget.settings().text_color, Rgb::WHITE);
    }

    #[test]
    fn messages_without_dialog_are_rejected() {
        let mut fx = Fixture::new();
        let response = fx.send(Message::FontSize(40));
        assert_eq!(response.notices, vec![Notice::SettingsNotOpen]);
        assert_eq!(fx.widget.settings().font_size, 24);
    }

    #[test]
    fn autostart_failure_is_reported_and_dialog_closes() {
        let mut fx = Fixture::new();
        fx.slot.open(&fx.widget, &fx.autostart);
        fx.send(Message::FontSize(30));

        let ctx = SettingsContext {
            store: &fx.store,
            autostart: &BrokenAutostart,
            exe_path: &fx.exe,
        };
        let response = fx.slot.update(Message::Confirm, &mut fx.widget, &ctx);

        assert!(!fx.slot.is_open());
        assert!(matches!(
            response.notices.as_slice(),
            [Notice::AutostartFailed { .. }]
        ));
        assert_eq!(fx.store.load().font_size, 30);
    }
}
