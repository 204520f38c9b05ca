// SPDX-License-Identifier: MPL-2.0

//! Durable key/value store for the display settings.
//!
//! The store is a flat JSON object whose values are strings, one key per
//! setting. Each field is read on its own, so a corrupt or missing value
//! only resets that field to its default instead of losing everything.
//!
//! # Location
//!
//! `~/.config/desktop-clock/settings.json`, or the path named by the
//! `DESKTOP_CLOCK_SETTINGS` environment variable.
//!
//! # Writes
//!
//! [`SettingsStore::save`] reads the existing object, upserts its own keys
//! and writes the whole object back through a temporary file, so keys it
//! does not know about survive.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{self, DisplaySettings, Rgb};
use crate::widget::geometry::Point;

/// Environment variable overriding the settings file location.
pub const SETTINGS_PATH_ENV: &str = "DESKTOP_CLOCK_SETTINGS";

/// Keys used in the settings file.
pub mod keys {
    pub const WINDOW_X: &str = "WindowPositionX";
    pub const WINDOW_Y: &str = "WindowPositionY";
    pub const TEXT_COLOR: &str = "TextColor";
    pub const FONT_SIZE: &str = "FontSize";
    pub const SHOW_DATE: &str = "ShowDate";
    pub const BACKGROUND_COLOR: &str = "BackgroundColor";
    pub const BACKGROUND_OPACITY: &str = "BackgroundOpacity";
    pub const SHOW_BACKGROUND: &str = "ShowBackground";
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write settings to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings file '{path}' is not a key/value object: {details}")]
    Parse { path: PathBuf, details: String },
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location for the current user.
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    /// Resolve the settings file path.
    ///
    /// Falls back to `/tmp` if no config directory can be determined.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(SETTINGS_PATH_ENV) {
            return PathBuf::from(path);
        }
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        path.push(config::APP_ID);
        path.push("settings.json");
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ------------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------------

    /// Load the settings. Never fails: anything unreadable becomes a default.
    pub fn load(&self) -> DisplaySettings {
        match self.read_entries() {
            Ok(entries) => {
                log::debug!("Loaded {} settings from {:?}", entries.len(), self.path);
                settings_from_entries(&entries)
            }
            Err(err) => {
                log::warn!("{}; using default settings", err);
                DisplaySettings::default()
            }
        }
    }

    /// Read the raw object. A missing file is an empty object.
    fn read_entries(&self) -> Result<Map<String, Value>, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(other) => Err(ConfigError::Parse {
                path: self.path.clone(),
                details: format!("top-level value is {}", json_kind(&other)),
            }),
            Err(err) => Err(ConfigError::Parse {
                path: self.path.clone(),
                details: err.to_string(),
            }),
        }
    }

    // ------------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------------

    /// Persist every display field, keeping unrelated keys intact.
    pub fn save(&self, settings: &DisplaySettings) -> Result<(), ConfigError> {
        self.update(|entries| write_settings(settings, entries))?;
        log::info!("Settings saved to {:?}", self.path);
        Ok(())
    }

    /// Persist only the window position.
    pub fn save_position(&self, position: Point) -> Result<(), ConfigError> {
        self.update(|entries| write_position(position, entries))?;
        log::debug!("Position saved: X={}, Y={}", position.x, position.y);
        Ok(())
    }

    fn update(&self, edit: impl FnOnce(&mut Map<String, Value>)) -> Result<(), ConfigError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(ConfigError::Parse { details, .. }) => {
                let backup = self.backup_path();
                log::warn!(
                    "Settings file {:?} is unreadable ({}), moving it to {:?}",
                    self.path,
                    details,
                    backup
                );
                fs::rename(&self.path, &backup).map_err(|source| ConfigError::Write {
                    path: backup.clone(),
                    source,
                })?;
                Map::new()
            }
            Err(err) => return Err(err),
        };

        edit(&mut entries);
        self.write_entries(&entries)
    }

    /// `settings.json.bak`, or a timestamped name when that is already taken.
    fn backup_path(&self) -> PathBuf {
        let backup = self.path.with_extension("json.bak");
        if !backup.exists() {
            return backup;
        }
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%3f");
        let stamped = self.path.with_extension(format!("json.{stamp}.bak"));
        log::warn!(
            "Backup {:?} already exists, keeping it and using {:?}",
            backup,
            stamped
        );
        stamped
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_error)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|err| write_error(io::Error::other(err)))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_error)?;
        fs::rename(&tmp, &self.path).map_err(write_error)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Field Conversion
// ============================================================================

fn string_entry<'a>(entries: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    entries.get(key).and_then(Value::as_str).map(str::trim)
}

fn parse_entry<T: std::str::FromStr>(entries: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = string_entry(entries, key)?;
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        log::warn!("Ignoring invalid value {:?} for {}", raw, key);
    }
    parsed
}

fn parse_bool_entry(entries: &Map<String, Value>, key: &str) -> Option<bool> {
    let raw = string_entry(entries, key)?;
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        log::warn!("Ignoring invalid value {:?} for {}", raw, key);
        None
    }
}

fn format_bool(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

/// Build settings from raw entries, defaulting each field independently.
pub fn settings_from_entries(entries: &Map<String, Value>) -> DisplaySettings {
    let defaults = DisplaySettings::default();

    let position = match (
        parse_entry::<i32>(entries, keys::WINDOW_X),
        parse_entry::<i32>(entries, keys::WINDOW_Y),
    ) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        _ => None,
    };

    DisplaySettings {
        position,
        text_color: parse_entry::<Rgb>(entries, keys::TEXT_COLOR).unwrap_or(defaults.text_color),
        font_size: parse_entry::<i32>(entries, keys::FONT_SIZE)
            .map(config::clamp_font_size)
            .unwrap_or(defaults.font_size),
        show_date: parse_bool_entry(entries, keys::SHOW_DATE).unwrap_or(defaults.show_date),
        background_color: parse_entry::<Rgb>(entries, keys::BACKGROUND_COLOR)
            .unwrap_or(defaults.background_color),
        background_opacity: parse_entry::<f64>(entries, keys::BACKGROUND_OPACITY)
            .map(config::clamp_opacity)
            .unwrap_or(defaults.background_opacity),
        show_background: parse_bool_entry(entries, keys::SHOW_BACKGROUND)
            .unwrap_or(defaults.show_background),
    }
}

fn write_position(position: Point, entries: &mut Map<String, Value>) {
    entries.insert(keys::WINDOW_X.into(), Value::String(position.x.to_string()));
    entries.insert(keys::WINDOW_Y.into(), Value::String(position.y.to_string()));
}

/// Upsert every display field into `entries`.
pub fn write_settings(settings: &DisplaySettings, entries: &mut Map<String, Value>) {
    if let Some(position) = settings.position {
        write_position(position, entries);
    }

    let fields = [
        (keys::TEXT_COLOR, settings.text_color.to_string()),
        (keys::FONT_SIZE, settings.font_size.to_string()),
        (keys::SHOW_DATE, format_bool(settings.show_date)),
        (keys::BACKGROUND_COLOR, settings.background_color.to_string()),
        (
            keys::BACKGROUND_OPACITY,
            settings.background_opacity.to_string(),
        ),
        (keys::SHOW_BACKGROUND, format_bool(settings.show_background)),
    ];

    for (key, value) in fields {
        entries.insert(key.to_string(), Value::String(value));
    }
}
