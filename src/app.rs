// SPDX-License-Identifier: MPL-2.0

//! Application core.
//!
//! [`ClockApp`] is the single place where user input, background update
//! results and the clock tick meet. It owns the widget, the dialog slot and
//! the collaborators (store, autostart registrar, update service, renderer),
//! and the host drives it with [`ClockApp::handle_input`] and
//! [`ClockApp::tick`].
//!
//! Context-menu changes persist immediately. Dialog changes are previewed
//! and only persisted on OK.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use chrono::{DateTime, Local, TimeZone};

use crate::autostart::AutostartRegistrar;
use crate::config::{DisplayChange, Rgb};
use crate::notice::Notice;
use crate::settings::{DialogSlot, Message, OpenOutcome, SettingsContext};
use crate::store::SettingsStore;
use crate::update::{CheckTrigger, ReleaseVersion, UpdateReport, UpdateService};
use crate::widget::layout::clock_lines;
use crate::widget::{ClockWidget, Frame, Point, Renderer};

/// Actions offered by the widget's context menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    ToggleMoveMode,
    ChangeColor(Rgb),
    ChangeFontSize(i32),
    SavePosition,
    ToggleAutostart,
    CheckForUpdates,
    OpenSettings,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerInput {
    Press(Point),
    Motion(Point),
    Release,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Menu(MenuAction),
    Settings(Message),
    Pointer(PointerInput),
    /// Answer to the pending update question
    Answer(bool),
    Help,
}

pub struct ClockApp<R: Renderer> {
    widget: ClockWidget,
    dialog: DialogSlot,
    store: SettingsStore,
    autostart: Box<dyn AutostartRegistrar>,
    exe_path: PathBuf,
    updates: UpdateService,
    renderer: R,
    /// Release the user was asked about and has not answered yet
    pending_download: Option<ReleaseVersion>,
    exit: bool,
}

impl<R: Renderer> ClockApp<R> {
    /// Load the stored settings and place the widget on the renderer's screens.
    pub fn new(
        renderer: R,
        store: SettingsStore,
        autostart: Box<dyn AutostartRegistrar>,
        exe_path: PathBuf,
        updates: UpdateService,
    ) -> Self {
        let settings = store.load();
        let lines = clock_lines(&Local::now(), settings.show_date);
        let size = renderer.measure(&Frame::compose(&settings, Point::default(), lines));
        let widget = ClockWidget::with_visible_margin(
            settings,
            renderer.screens(),
            size,
            renderer.visible_margin(),
        );

        Self {
            widget,
            dialog: DialogSlot::default(),
            store,
            autostart,
            exe_path,
            updates,
            renderer,
            pending_download: None,
            exit: false,
        }
    }

    /// Kick off the silent startup update check.
    pub fn start(&self) {
        self.updates.spawn_check(CheckTrigger::Startup);
    }

    pub fn widget(&self) -> &ClockWidget {
        &self.widget
    }

    pub fn dialog(&self) -> &DialogSlot {
        &self.dialog
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn pending_download(&self) -> Option<ReleaseVersion> {
        self.pending_download
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn handle_input(&mut self, input: Input) -> io::Result<()> {
        match input {
            Input::Menu(action) => self.handle_menu(action),
            Input::Settings(message) => {
                let ctx = SettingsContext {
                    store: &self.store,
                    autostart: self.autostart.as_ref(),
                    exe_path: &self.exe_path,
                };
                let response = self.dialog.update(message, &mut self.widget, &ctx);
                self.show_all(&response.notices)
            }
            Input::Pointer(pointer) => {
                self.handle_pointer(pointer);
                Ok(())
            }
            Input::Answer(yes) => self.answer_update(yes),
            Input::Help => self.show(&Notice::Help),
        }
    }

    fn handle_menu(&mut self, action: MenuAction) -> io::Result<()> {
        log::debug!("Menu action {:?}", action);
        match action {
            MenuAction::ToggleMoveMode => {
                let enabled = self.widget.toggle_move_mode();
                log::info!("Move mode {}", if enabled { "on" } else { "off" });
                self.show(&Notice::MoveMode { enabled })
            }
            MenuAction::ChangeColor(color) => {
                self.change_and_persist(DisplayChange::TextColor(color));
                Ok(())
            }
            MenuAction::ChangeFontSize(size) => {
                self.change_and_persist(DisplayChange::FontSize(size));
                Ok(())
            }
            MenuAction::SavePosition => match self.store.save_position(self.widget.position()) {
                Ok(()) => self.show(&Notice::PositionSaved),
                Err(err) => {
                    log::warn!("Failed to save position: {}", err);
                    Ok(())
                }
            },
            MenuAction::ToggleAutostart => {
                let enabled = !self.autostart.is_enabled();
                let notice = match self.autostart.set_enabled(enabled, &self.exe_path) {
                    Ok(()) => Notice::AutostartChanged { enabled },
                    Err(err) => {
                        log::error!("Error setting autostart: {}", err);
                        Notice::AutostartFailed {
                            reason: err.to_string(),
                        }
                    }
                };
                self.show(&notice)
            }
            MenuAction::CheckForUpdates => {
                self.updates.spawn_check(CheckTrigger::User);
                Ok(())
            }
            MenuAction::OpenSettings => {
                match self.dialog.open(&self.widget, self.autostart.as_ref()) {
                    OpenOutcome::Opened => self.show(&Notice::SettingsOpened),
                    OpenOutcome::Focused => self.show(&Notice::SettingsFocused),
                }
            }
            MenuAction::Exit => {
                log::info!("Exit requested");
                self.exit = true;
                Ok(())
            }
        }
    }

    fn handle_pointer(&mut self, pointer: PointerInput) {
        match pointer {
            PointerInput::Press(at) => self.widget.pointer_press(at),
            PointerInput::Motion(at) => {
                self.widget.pointer_motion(at);
            }
            PointerInput::Release => {
                if self.widget.pointer_release() {
                    self.persist_position();
                }
            }
        }
    }

    /// Apply a widget-originated change and persist the whole live state.
    fn change_and_persist(&mut self, change: DisplayChange) {
        if self.widget.apply(change) {
            if let Err(err) = self.store.save(self.widget.settings()) {
                log::warn!("Failed to save settings: {}", err);
            }
        }
    }

    fn persist_position(&self) {
        if let Err(err) = self.store.save_position(self.widget.position()) {
            log::warn!("Failed to save position: {}", err);
        }
    }

    fn answer_update(&mut self, yes: bool) -> io::Result<()> {
        let Some(latest) = self.pending_download.take() else {
            log::debug!("No pending update question");
            return Ok(());
        };

        if yes {
            let url = self.updates.release_page();
            log::info!("Opening download page for {}: {}", latest, url);
            open_in_browser(&url);
        } else {
            log::info!("Update {} declined", latest);
        }
        Ok(())
    }

    /// Turn an update report into user feedback.
    ///
    /// Startup checks only speak up when an update exists; failures and
    /// "up to date" are logged.
    pub fn handle_update_report(&mut self, report: UpdateReport) -> io::Result<()> {
        let UpdateReport {
            trigger,
            current,
            result,
        } = report;

        match result {
            Ok(Some(latest)) => {
                self.pending_download = Some(latest);
                self.show(&Notice::UpdateAvailable { latest, current })
            }
            Ok(None) if trigger == CheckTrigger::User => self.show(&Notice::UpToDate { current }),
            Ok(None) => {
                log::info!("Running the latest version ({})", current);
                Ok(())
            }
            Err(err) if trigger == CheckTrigger::User => self.show(&Notice::UpdateFailed {
                reason: err.to_string(),
            }),
            Err(err) => {
                log::warn!("Startup update check failed: {}", err);
                Ok(())
            }
        }
    }

    /// One pass of the UI loop: deliver finished update checks, follow
    /// screen changes and redraw when needed.
    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> io::Result<()>
    where
        Tz::Offset: std::fmt::Display,
    {
        for report in self.updates.poll() {
            self.handle_update_report(report)?;
        }

        self.widget.set_screens(self.renderer.screens());

        if self.widget.needs_redraw(now) {
            let frame = self.widget.compose_frame(now);
            self.widget.set_size(self.renderer.measure(&frame));
            self.renderer.draw(&frame)?;
        }
        Ok(())
    }

    /// Save the position on the way out.
    pub fn shutdown(&mut self) {
        log::info!("Shutting down");
        self.persist_position();
    }

    /// Show a free-form line, e.g. a command parse error.
    pub fn show_message(&mut self, message: &str) -> io::Result<()> {
        self.renderer.notify(message)
    }

    fn show(&mut self, notice: &Notice) -> io::Result<()> {
        log::debug!("Notice: {:?}", notice);
        self.renderer.notify(&notice.to_string())
    }

    fn show_all(&mut self, notices: &[Notice]) -> io::Result<()> {
        for notice in notices {
            self.show(notice)?;
        }
        Ok(())
    }
}

fn open_in_browser(url: &str) {
    if let Err(err) = Command::new("xdg-open").arg(url).spawn() {
        log::error!("Failed to open {}: {}", url, err);
    }
}
