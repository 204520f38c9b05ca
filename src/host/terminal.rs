// SPDX-License-Identifier: MPL-2.0

//! Terminal renderer.
//!
//! Draws the clock face with truecolor crossterm commands. Units are
//! character cells: the terminal is the only "screen", minus its last row,
//! which holds the status line used for notices. The background is blended
//! over black since a terminal cell cannot be translucent.

use std::io::{self, Write};

use ratatui::crossterm::cursor::{Hide, MoveTo, Show};
use ratatui::crossterm::queue;
use ratatui::crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use ratatui::crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};

use crate::config::Rgb;
use crate::widget::render::blend_over;
use crate::widget::{Frame, Rect, Renderer, Size};

/// Cells of padding left and right of the text
const H_PAD: i32 = 2;
/// Rows of padding above and below the text
const V_PAD: i32 = 1;

/// Cells a stored position must keep from the right and bottom edges
const VISIBLE_MARGIN_CELLS: i32 = 2;

const FALLBACK_SIZE: Size = Size::new(80, 24);

/// Current size of the controlling terminal, or 80x24 if unknown.
pub fn terminal_size() -> Size {
    match terminal::size() {
        Ok((columns, rows)) if columns > 0 && rows > 1 => {
            Size::new(i32::from(columns), i32::from(rows))
        }
        Ok(_) => FALLBACK_SIZE,
        Err(err) => {
            log::debug!("Terminal size unavailable: {}", err);
            FALLBACK_SIZE
        }
    }
}

fn truecolor(color: Rgb) -> Color {
    Color::Rgb {
        r: color.red,
        g: color.green,
        b: color.blue,
    }
}

/// Clamp a cell coordinate into crossterm's range.
fn cell(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    /// Terminal size in cells, status row included
    size: Size,
    status: Option<String>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), terminal_size())
    }

    /// Pick up terminal resizes.
    pub fn refresh_size(&mut self) {
        self.size = terminal_size();
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, size: Size) -> Self {
        Self {
            out,
            size,
            status: None,
        }
    }

    /// Switch to the alternate screen with the cursor hidden.
    pub fn enter(&mut self) -> io::Result<()> {
        queue!(self.out, EnterAlternateScreen, Hide)?;
        self.out.flush()
    }

    /// Leave the terminal clean on exit.
    pub fn restore(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            MoveTo(0, 0),
            Show,
            LeaveAlternateScreen
        )?;
        self.out.flush()
    }

    #[cfg(test)]
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn queue_status(&mut self) -> io::Result<()> {
        let row = cell(self.size.height.max(1) - 1);
        queue!(self.out, MoveTo(0, row), Clear(ClearType::CurrentLine))?;
        if let Some(status) = &self.status {
            let width = usize::try_from(self.size.width).unwrap_or(0);
            let visible: String = status.chars().take(width).collect();
            queue!(self.out, Print(visible))?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn screens(&self) -> Vec<Rect> {
        vec![Rect::new(0, 0, self.size.width, self.size.height - 1)]
    }

    fn visible_margin(&self) -> i32 {
        VISIBLE_MARGIN_CELLS
    }

    fn measure(&self, frame: &Frame) -> Size {
        let widest = frame
            .lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let widest = i32::try_from(widest).unwrap_or(i32::MAX - 2 * H_PAD);
        let rows = i32::try_from(frame.lines.len()).unwrap_or(0);
        Size::new(widest + 2 * H_PAD, rows + 2 * V_PAD)
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        let size = self.measure(frame);
        let inner = usize::try_from(size.width - 2 * H_PAD).unwrap_or(0);
        let pad = " ".repeat(H_PAD as usize);
        let drawable_rows = self.size.height - 1;

        let fill = frame.background.map(|background| {
            truecolor(blend_over(background.color, background.opacity, Rgb::BLACK))
        });
        let text = truecolor(frame.text_color);

        queue!(self.out, ResetColor, Clear(ClearType::All))?;
        for row in 0..size.height {
            let y = frame.origin.y + row;
            if y < 0 || y >= drawable_rows {
                continue;
            }

            let line = usize::try_from(row - V_PAD)
                .ok()
                .and_then(|index| frame.lines.get(index))
                .map(String::as_str)
                .unwrap_or("");
            let cells: Vec<char> = format!("{pad}{line:^inner$}{pad}").chars().collect();

            // Clip horizontally to the terminal
            let start = usize::try_from(-frame.origin.x).unwrap_or(0);
            let end = usize::try_from(self.size.width - frame.origin.x)
                .unwrap_or(0)
                .min(cells.len());
            if start >= end {
                continue;
            }
            let visible: String = cells[start..end].iter().collect();

            queue!(self.out, MoveTo(cell(frame.origin.x), cell(y)))?;
            if let Some(fill) = fill {
                queue!(self.out, SetBackgroundColor(fill))?;
            }
            queue!(
                self.out,
                SetForegroundColor(text),
                SetAttribute(Attribute::Bold),
                Print(visible),
                ResetColor
            )?;
        }
        self.queue_status()?;
        self.out.flush()
    }

    fn notify(&mut self, message: &str) -> io::Result<()> {
        self.status = Some(message.replace('\n', " "));
        self.queue_status()?;
        self.out.flush()
    }
}
