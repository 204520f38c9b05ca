// SPDX-License-Identifier: MPL-2.0

//! Run-at-login registration.
//!
//! On a freedesktop session the "run at login" facility is the per-user
//! autostart directory (`~/.config/autostart`). The clock owns exactly one
//! entry there, named after the application, whose `Exec` line holds the
//! quoted path of the running executable.
//!
//! Querying never fails: anything unreadable counts as "not registered".
//! Disabling an entry that does not exist succeeds.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum AutostartError {
    #[error("permission denied while updating autostart entry '{path}'")]
    Permission { path: PathBuf },

    #[error("failed to update autostart entry '{path}': {source}")]
    Unknown {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AutostartError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            AutostartError::Permission {
                path: path.to_path_buf(),
            }
        } else {
            AutostartError::Unknown {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

pub trait AutostartRegistrar {
    /// Whether the application is registered to run at login.
    fn is_enabled(&self) -> bool;

    /// Register `exe_path` to run at login, or remove the registration.
    fn set_enabled(&self, enabled: bool, exe_path: &Path) -> Result<(), AutostartError>;
}

/// Path of the running executable, for registering it.
pub fn current_exe_path() -> PathBuf {
    std::env::current_exe().unwrap_or_else(|err| {
        log::warn!("Cannot determine executable path ({}), using app id", err);
        PathBuf::from(config::APP_ID)
    })
}

// ============================================================================
// XDG Autostart
// ============================================================================

/// Autostart entry in an XDG autostart directory.
#[derive(Debug, Clone)]
pub struct XdgAutostart {
    entry_path: PathBuf,
}

impl XdgAutostart {
    /// Entry named after the application inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            entry_path: dir.as_ref().join(format!("{}.desktop", config::APP_ID)),
        }
    }

    /// Entry in the current user's autostart directory.
    pub fn for_current_user() -> Self {
        let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        dir.push("autostart");
        Self::in_dir(dir)
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry_path
    }
}

impl AutostartRegistrar for XdgAutostart {
    fn is_enabled(&self) -> bool {
        match fs::read_to_string(&self.entry_path) {
            Ok(content) => registered_exec(&content).is_some(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(err) => {
                log::error!("Error checking autostart status: {}", err);
                false
            }
        }
    }

    fn set_enabled(&self, enabled: bool, exe_path: &Path) -> Result<(), AutostartError> {
        let path = &self.entry_path;

        if enabled {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|err| AutostartError::from_io(path, err))?;
            }
            fs::write(path, desktop_entry(exe_path))
                .map_err(|err| AutostartError::from_io(path, err))?;
            log::info!("Autostart enabled for {:?}", exe_path);
            return Ok(());
        }

        match fs::remove_file(path) {
            Ok(()) => {
                log::info!("Autostart disabled");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("Autostart entry already absent");
                Ok(())
            }
            Err(err) => Err(AutostartError::from_io(path, err)),
        }
    }
}

/// Quote a path for an `Exec` key: wrap in double quotes and escape the
/// characters the desktop entry format reserves inside quotes.
pub fn quote_exec(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for ch in raw.chars() {
        if matches!(ch, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

fn desktop_entry(exe_path: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={}\n\
         Exec={}\n\
         Terminal=false\n\
         X-GNOME-Autostart-enabled=true\n",
        config::APP_NAME,
        quote_exec(exe_path)
    )
}

/// The `Exec` value of an entry, if it has a non-empty one.
fn registered_exec(content: &str) -> Option<&str> {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Exec="))
        .map(str::trim)
        .find(|value| !value.is_empty())
}
