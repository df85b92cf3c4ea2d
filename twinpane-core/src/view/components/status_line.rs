//! src/view/components/status_line.rs
//!
//! Bottom row. A warning takes precedence, then an open `:`/`/` line, then
//! the info of the selected entry.

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Widget};

use crate::fs::object_info::FileEntry;
use crate::model::command_line::CommandLine;
use crate::model::ui_state::UIState;
use crate::view::theme;

pub struct StatusLine<'a> {
    ui: &'a UIState,
    selected: Option<&'a FileEntry>,
}

impl<'a> StatusLine<'a> {
    #[must_use]
    pub const fn new(ui: &'a UIState, selected: Option<&'a FileEntry>) -> Self {
        Self { ui, selected }
    }

    /// Terminal cursor position while a line is being edited.
    #[must_use]
    pub fn cursor(&self, area: Rect) -> Option<Position> {
        if self.ui.warning.is_some() {
            return None;
        }
        let line: &CommandLine = self.ui.line()?;
        let col = u16::try_from(line.cursor() + 1).unwrap_or(u16::MAX);
        Some(Position::new(area.x.saturating_add(col).min(area.right().saturating_sub(1)), area.y))
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let paragraph = if let Some(warning) = &self.ui.warning {
            Paragraph::new(warning.message.as_str()).style(theme::warning_style())
        } else if let Some(line) = self.ui.line() {
            Paragraph::new(format!("{}{}", line.mode().prefix(), line.text()))
        } else if let Some(entry) = self.selected {
            Paragraph::new(entry.info_line()).style(theme::status_style())
        } else {
            Paragraph::new("")
        };

        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::command_line::LineMode;
    use crate::model::ui_state::UIMode;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn text(buf: &Buffer) -> String {
        (0..buf.area.width).map(|x| buf[(x, 0)].symbol()).collect::<String>().trim_end().to_string()
    }

    #[test]
    fn warning_beats_open_line() {
        let mut ui = UIState::default();
        ui.mode = UIMode::Line(CommandLine::open(LineMode::Filter));
        ui.show_warning("Command 'x' not found");

        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        let status = StatusLine::new(&ui, None);
        assert!(status.cursor(area).is_none());
        status.render(area, &mut buf);

        assert_eq!(text(&buf), "Command 'x' not found");
        assert_eq!(buf[(0, 0)].bg, Color::Red);
    }

    #[test]
    fn open_line_shows_prefix_and_cursor() {
        let mut line = CommandLine::open(LineMode::Command);
        line.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        let mut ui = UIState::default();
        ui.mode = UIMode::Line(line);

        let area = Rect::new(0, 5, 30, 1);
        let mut buf = Buffer::empty(area);
        let status = StatusLine::new(&ui, None);
        assert_eq!(status.cursor(area), Some(Position::new(2, 5)));
        status.render(area, &mut buf);

        let text: String = (0..area.width).map(|x| buf[(x, 5)].symbol()).collect();
        assert_eq!(text.trim_end(), ":q");
    }
}
