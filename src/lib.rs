// SPDX-License-Identifier: MPL-2.0

//! Desktop Clock
//!
//! A borderless desktop clock with a context menu, a live-preview settings
//! dialog, run-at-login registration and a GitHub release update check.
//!
//! The library holds the application state and its collaborators; a host
//! (see [`host`]) supplies the [`widget::Renderer`] and feeds user input into
//! [`app::ClockApp`].

pub mod app;
pub mod autostart;
pub mod config;
pub mod host;
pub mod i18n;
pub mod notice;
pub mod settings;
pub mod store;
pub mod update;
pub mod widget;
