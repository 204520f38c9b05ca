// SPDX-License-Identifier: MPL-2.0

//! Messages shown to the user.

use std::fmt;

use crate::fl;
use crate::update::ReleaseVersion;

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Asks whether to open the download page
    UpdateAvailable {
        latest: ReleaseVersion,
        current: ReleaseVersion,
    },
    UpToDate {
        current: ReleaseVersion,
    },
    UpdateFailed {
        reason: String,
    },
    AutostartChanged {
        enabled: bool,
    },
    AutostartFailed {
        reason: String,
    },
    PositionSaved,
    PositionReset,
    MoveMode {
        enabled: bool,
    },
    SettingsOpened,
    SettingsFocused,
    SettingsNotOpen,
    SettingsReset,
    InvalidCommand {
        reason: String,
    },
    Help,
}

impl Notice {
    pub fn title(&self) -> String {
        match self {
            Notice::UpdateAvailable { .. } => fl!("update-available-title"),
            Notice::UpToDate { .. } => fl!("up-to-date-title"),
            Notice::UpdateFailed { .. } => fl!("update-failed-title"),
            Notice::AutostartChanged { .. } | Notice::AutostartFailed { .. } => {
                fl!("autostart-title")
            }
            Notice::PositionSaved => fl!("position-saved-title"),
            Notice::PositionReset => fl!("position-reset-title"),
            Notice::MoveMode { .. } => fl!("move-mode-title"),
            Notice::SettingsOpened | Notice::SettingsFocused | Notice::SettingsNotOpen => {
                fl!("settings-title")
            }
            Notice::SettingsReset => fl!("reset-title"),
            Notice::InvalidCommand { .. } => fl!("error-title"),
            Notice::Help => fl!("help-title"),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::UpdateAvailable { latest, current } => fl!(
                "update-available",
                latest = latest.to_string(),
                current = current.to_string()
            ),
            Notice::UpToDate { current } => fl!("up-to-date", current = current.to_string()),
            Notice::UpdateFailed { reason } => fl!("update-failed", reason = reason.clone()),
            Notice::AutostartChanged { enabled: true } => fl!("autostart-enabled"),
            Notice::AutostartChanged { enabled: false } => fl!("autostart-disabled"),
            Notice::AutostartFailed { reason } => fl!("autostart-failed", reason = reason.clone()),
            Notice::PositionSaved => fl!("position-saved"),
            Notice::PositionReset => fl!("position-reset"),
            Notice::MoveMode { enabled: true } => fl!("move-mode-on"),
            Notice::MoveMode { enabled: false } => fl!("move-mode-off"),
            Notice::SettingsOpened => fl!("settings-opened"),
            Notice::SettingsFocused => fl!("settings-focused"),
            Notice::SettingsNotOpen => fl!("settings-not-open"),
            Notice::SettingsReset => fl!("reset-done"),
            Notice::InvalidCommand { reason } => fl!("invalid-command", reason = reason.clone()),
            Notice::Help => fl!("help"),
        }
    }

    /// Whether the notice expects a yes/no answer.
    pub fn asks_confirmation(&self) -> bool {
        matches!(self, Notice::UpdateAvailable { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}
