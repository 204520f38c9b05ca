// SPDX-License-Identifier: MPL-2.0

//! Line commands read from stdin.
//!
//! Each line is one command word followed by its arguments, e.g.
//! `color light blue`, `opacity 60` or `nudge left big`. Commands map onto
//! the same [`Input`] values a graphical host would produce from its context
//! menu, settings dialog and pointer events.

use std::str::FromStr;

use thiserror::Error;

use crate::app::{Input, MenuAction, PointerInput};
use crate::config::Rgb;
use crate::settings::Message;
use crate::widget::presets::preset_color;
use crate::widget::{Direction, Point};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(String),

    #[error("invalid argument '{value}' for '{command}'")]
    InvalidArgument { command: String, value: String },
}

pub fn parse_command(line: &str) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err(InputError::Empty);
    };
    let command = command.to_ascii_lowercase();
    let args: Vec<&str> = words.collect();
    let cmd = command.as_str();

    let input = match cmd {
        // Context menu
        "move" => Input::Menu(MenuAction::ToggleMoveMode),
        "color" => Input::Menu(MenuAction::ChangeColor(color_arg(cmd, &args)?)),
        "font" => Input::Menu(MenuAction::ChangeFontSize(number_arg(cmd, &args)?)),
        "save" => Input::Menu(MenuAction::SavePosition),
        "autostart" => Input::Menu(MenuAction::ToggleAutostart),
        "update" => Input::Menu(MenuAction::CheckForUpdates),
        "settings" => Input::Menu(MenuAction::OpenSettings),
        "quit" | "exit" => Input::Menu(MenuAction::Exit),

        // Settings dialog
        "preset" => Input::Settings(Message::SelectPreset(joined_arg(cmd, &args)?)),
        "text" => Input::Settings(Message::PickTextColor(color_arg(cmd, &args)?)),
        "size" => Input::Settings(Message::FontSize(number_arg(cmd, &args)?)),
        "date" => Input::Settings(Message::ToggleDate(switch_arg(cmd, &args)?)),
        "bg" => Input::Settings(Message::ToggleBackground(switch_arg(cmd, &args)?)),
        "bgcolor" => Input::Settings(Message::PickBackgroundColor(color_arg(cmd, &args)?)),
        "opacity" => Input::Settings(Message::OpacityPercent(number_arg(cmd, &args)?)),
        "start" => Input::Settings(Message::ToggleAutostart(switch_arg(cmd, &args)?)),
        "nudge" => {
            let direction = direction_arg(cmd, &args)?;
            let large = match args.get(1) {
                None => false,
                Some(word) if word.eq_ignore_ascii_case("big") => true,
                Some(word) => return Err(invalid(cmd, word)),
            };
            Input::Settings(Message::Nudge { direction, large })
        }
        "recenter" => Input::Settings(Message::ResetPosition),
        "savepos" => Input::Settings(Message::SavePosition),
        "reset" => Input::Settings(Message::ResetDefaults),
        "ok" => Input::Settings(Message::Confirm),
        "cancel" => Input::Settings(Message::Cancel),

        // Pointer
        "press" => Input::Pointer(PointerInput::Press(point_arg(cmd, &args)?)),
        "motion" => Input::Pointer(PointerInput::Motion(point_arg(cmd, &args)?)),
        "release" => Input::Pointer(PointerInput::Release),

        "yes" | "y" => Input::Answer(true),
        "no" | "n" => Input::Answer(false),
        "help" | "?" => Input::Help,

        _ => return Err(InputError::Unknown(cmd.to_string())),
    };

    Ok(input)
}

fn invalid(command: &str, value: &str) -> InputError {
    InputError::InvalidArgument {
        command: command.to_string(),
        value: value.to_string(),
    }
}

fn first_arg<'a>(command: &str, args: &[&'a str]) -> Result<&'a str, InputError> {
    args.first()
        .copied()
        .ok_or_else(|| InputError::MissingArgument(command.to_string()))
}

fn joined_arg(command: &str, args: &[&str]) -> Result<String, InputError> {
    if args.is_empty() {
        return Err(InputError::MissingArgument(command.to_string()));
    }
    Ok(args.join(" "))
}

fn number_arg<T: FromStr>(command: &str, args: &[&str]) -> Result<T, InputError> {
    let value = first_arg(command, args)?;
    value.parse().map_err(|_| invalid(command, value))
}

/// Preset name or `r,g,b`.
fn color_arg(command: &str, args: &[&str]) -> Result<Rgb, InputError> {
    let value = joined_arg(command, args)?;
    if let Some(color) = preset_color(&value) {
        return Ok(color);
    }
    value.parse().map_err(|_| invalid(command, &value))
}

fn switch_arg(command: &str, args: &[&str]) -> Result<bool, InputError> {
    let value = first_arg(command, args)?;
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(invalid(command, value)),
    }
}

fn direction_arg(command: &str, args: &[&str]) -> Result<Direction, InputError> {
    let value = first_arg(command, args)?;
    match value.to_ascii_lowercase().as_str() {
        "up" => Ok(Direction::Up),
        "down" => Ok(Direction::Down),
        "left" => Ok(Direction::Left),
        "right" => Ok(Direction::Right),
        _ => Err(invalid(command, value)),
    }
}

fn point_arg(command: &str, args: &[&str]) -> Result<Point, InputError> {
    match args {
        [x, y, ..] => {
            let x = x.parse().map_err(|_| invalid(command, x))?;
            let y = y.parse().map_err(|_| invalid(command, y))?;
            Ok(Point::new(x, y))
        }
        _ => Err(InputError::MissingArgument(command.to_string())),
    }
}
