// SPDX-License-Identifier: MPL-2.0

//! Terminal host: renders the widget and reads commands from stdin.

pub mod input;
pub mod terminal;

pub use input::{InputError, parse_command};
pub use terminal::TerminalRenderer;
