//! Virtual terminal for render tests.
//!
//! Frames are encoded as the escape sequences crossterm would send and fed
//! through `vt100`, so assertions see what a real terminal would show.

use std::io;

use crossterm::{Command, cursor, style, terminal};
use ratatui::backend::{Backend, ClearType, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};
use ratatui::style::{Color, Style};

pub struct VT100Backend {
    parser: vt100::Parser,
    size: Size,
}

impl VT100Backend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            parser: vt100::Parser::new(height, width, 0),
            size: Size::new(width, height),
        }
    }

    pub fn contents(&self) -> String {
        self.parser.screen().contents()
    }

    /// Text of one screen row, trailing blanks trimmed.
    pub fn row(&self, row: u16) -> String {
        self.parser
            .screen()
            .contents_between(row, 0, row, self.size.width)
            .trim_end()
            .to_string()
    }

    pub fn background(&self, column: u16, row: u16) -> Option<vt100::Color> {
        self.parser.screen().cell(row, column).map(vt100::Cell::bgcolor)
    }

    fn feed(&mut self, command: impl Command) {
        let mut ansi = String::new();
        if command.write_ansi(&mut ansi).is_ok() {
            self.parser.process(ansi.as_bytes());
        }
    }

    fn apply_style(&mut self, cell_style: Style) {
        self.feed(style::SetAttribute(style::Attribute::Reset));
        if let Some(fg) = cell_style.fg.and_then(ansi_color) {
            self.feed(style::SetForegroundColor(fg));
        }
        if let Some(bg) = cell_style.bg.and_then(ansi_color) {
            self.feed(style::SetBackgroundColor(bg));
        }
    }
}

impl Backend for VT100Backend {
    type Error = io::Error;

    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        let mut next: Option<(u16, u16)> = None;
        let mut current: Option<Style> = None;
        for (x, y, cell) in content {
            if next != Some((x, y)) {
                self.feed(cursor::MoveTo(x, y));
            }
            if current != Some(cell.style()) {
                self.apply_style(cell.style());
                current = Some(cell.style());
            }
            self.feed(style::Print(cell.symbol()));
            next = Some((x + 1, y));
        }
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        let (row, column) = self.parser.screen().cursor_position();
        Ok(Position::new(column, row))
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        let Position { x, y } = position.into();
        self.feed(cursor::MoveTo(x, y));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.feed(terminal::Clear(terminal::ClearType::All));
        Ok(())
    }

    fn clear_region(&mut self, _clear_type: ClearType) -> io::Result<()> {
        self.clear()
    }

    fn size(&self) -> io::Result<Size> {
        Ok(self.size)
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        Ok(WindowSize {
            columns_rows: self.size,
            pixels: Size::default(),
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Named colors go out as their 256-color index, which vt100 reports as
/// `Color::Idx`.
fn ansi_color(color: Color) -> Option<style::Color> {
    let index = match color {
        Color::Reset => return None,
        Color::Rgb(r, g, b) => return Some(style::Color::Rgb { r, g, b }),
        Color::Indexed(index) => index,
        Color::Black => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Yellow => 3,
        Color::Blue => 4,
        Color::Magenta => 5,
        Color::Cyan => 6,
        Color::Gray => 7,
        Color::DarkGray => 8,
        Color::LightRed => 9,
        Color::LightGreen => 10,
        Color::LightYellow => 11,
        Color::LightBlue => 12,
        Color::LightMagenta => 13,
        Color::LightCyan => 14,
        Color::White => 15,
    };
    Some(style::Color::AnsiValue(index))
}
