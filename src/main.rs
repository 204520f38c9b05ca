// SPDX-License-Identifier: MPL-2.0

//! Desktop Clock, terminal host.
//!
//! Draws the clock into the terminal and takes context-menu, settings and
//! pointer commands as lines on stdin (`help` lists them). Closing stdin
//! exits, saving the widget position on the way out.

use std::fs::OpenOptions;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use desktop_clock::app::{ClockApp, Input, MenuAction};
use desktop_clock::autostart::{XdgAutostart, current_exe_path};
use desktop_clock::config::APP_ID;
use desktop_clock::host::{InputError, TerminalRenderer, parse_command};
use desktop_clock::i18n;
use desktop_clock::notice::Notice;
use desktop_clock::store::SettingsStore;
use desktop_clock::update::{ReleaseVersion, UpdateChecker, UpdateService};

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

fn log_file_path() -> PathBuf {
    match dirs::cache_dir() {
        Some(dir) => dir.join(APP_ID).join(format!("{APP_ID}.log")),
        None => PathBuf::from(format!("/tmp/{APP_ID}.log")),
    }
}

fn init_logging() -> io::Result<()> {
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(&path)?;

    // stdout belongs to the clock face
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

/// Read stdin lines on a thread. The channel disconnects at EOF.
fn spawn_command_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    log::warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        log::debug!("Command reader finished");
    });
    receiver
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Writing to a closed pipe should be an error, not a signal
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_IGN);
    }

    init_logging()?;
    log::info!("Starting Desktop Clock {}", env!("CARGO_PKG_VERSION"));

    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    let updates = UpdateService::new(
        runtime.handle().clone(),
        UpdateChecker::new()?,
        ReleaseVersion::current(),
    );

    let store = SettingsStore::open_default();
    log::info!("Settings file: {:?}", store.path());

    let mut app = ClockApp::new(
        TerminalRenderer::stdout(),
        store,
        Box::new(XdgAutostart::for_current_user()),
        current_exe_path(),
        updates,
    );
    app.renderer_mut().enter()?;
    app.start();
    app.show_message(&Notice::Help.to_string())?;

    let commands = spawn_command_reader();

    'ui: loop {
        loop {
            match commands.try_recv() {
                Ok(line) => match parse_command(&line) {
                    Ok(input) => app.handle_input(input)?,
                    Err(InputError::Empty) => {}
                    Err(err) => {
                        log::debug!("Rejected command {:?}: {}", line, err);
                        let notice = Notice::InvalidCommand {
                            reason: err.to_string(),
                        };
                        app.show_message(&notice.to_string())?;
                    }
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("stdin closed");
                    app.handle_input(Input::Menu(MenuAction::Exit))?;
                    break;
                }
            }
        }

        if app.should_exit() {
            break 'ui;
        }

        app.renderer_mut().refresh_size();
        app.tick(&chrono::Local::now())?;

        thread::sleep(FRAME_INTERVAL);
    }

    app.shutdown();
    app.renderer_mut().restore()?;
    drop(app);

    runtime.shutdown_timeout(Duration::from_secs(1));
    log::info!("Desktop Clock stopped");
    Ok(())
}
