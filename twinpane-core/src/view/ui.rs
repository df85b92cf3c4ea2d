//! src/view/ui.rs
//! ============================================================
//! Frame layout and the top-level draw call. Drawing reads the navigator
//! and UI state; it never changes them.

use std::path::Path;

use ratatui::layout::Position;
use ratatui::prelude::*;

use crate::controller::navigator::{Navigator, PaneSide};
use crate::identity::Identity;
use crate::model::ui_state::UIState;
use crate::view::components::{list_pane::ListPane, path_bar::PathBar, status_line::StatusLine};

/// Screen areas: path bar on top, status line at the bottom, the parent pane
/// taking the left third of the rest and the current pane the remainder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppLayout {
    pub path_bar: Rect,
    pub parent: Rect,
    pub current: Rect,
    pub status: Rect,
}

impl AppLayout {
    #[must_use]
    pub fn new(area: Rect) -> Self {
        let [path_bar, body, status] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let [parent, current] = Layout::horizontal([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
            .spacing(1)
            .areas(body);

        Self {
            path_bar,
            parent,
            current,
            status,
        }
    }

    /// The pane under a terminal cell and the row inside it.
    #[must_use]
    pub fn hit(&self, column: u16, row: u16) -> Option<(PaneSide, usize)> {
        let pos = Position::new(column, row);
        [(PaneSide::Parent, self.parent), (PaneSide::Current, self.current)]
            .into_iter()
            .find(|(_, area)| area.contains(pos))
            .map(|(side, area)| (side, usize::from(row - area.y)))
    }

    /// Rows per pane, as `(parent, current)`.
    #[must_use]
    pub fn heights(&self) -> (usize, usize) {
        (usize::from(self.parent.height), usize::from(self.current.height))
    }
}

pub fn render(frame: &mut Frame<'_>, nav: &Navigator, ui: &UIState, identity: &Identity) {
    let layout = AppLayout::new(frame.area());

    let selected = nav.selected_entry();
    let dir: &Path = selected
        .and_then(|entry| entry.path.parent())
        .unwrap_or_else(|| nav.cwd());
    frame.render_widget(PathBar::new(identity, dir), layout.path_bar);

    frame.render_widget(ListPane::new(nav.parent_pane(), nav.mark_set()), layout.parent);
    frame.render_widget(ListPane::new(nav.current_pane(), nav.mark_set()), layout.current);

    let status = StatusLine::new(ui, selected.map(|entry| &**entry));
    if let Some(cursor) = status.cursor(layout.status) {
        frame.set_cursor_position(cursor);
    }
    frame.render_widget(status, layout.status);
}
