//! src/view/components/list_pane.rs
//!
//! One directory list. Column 0 carries the mark indicator, the row's left
//! content follows it and the right content is flushed to the right edge.

use std::path::PathBuf;

use ahash::AHashSet;
use ratatui::prelude::*;
use ratatui::widgets::Widget;

use crate::model::list_row::ListRow;
use crate::model::pane::PaneState;
use crate::view::theme;

pub struct ListPane<'a> {
    pane: &'a PaneState,
    marks: &'a AHashSet<PathBuf>,
}

impl<'a> ListPane<'a> {
    #[must_use]
    pub const fn new(pane: &'a PaneState, marks: &'a AHashSet<PathBuf>) -> Self {
        Self { pane, marks }
    }

    fn render_row(&self, row: &ListRow, selected: bool, area: Rect, buf: &mut Buffer) {
        if self.marks.contains(row.entry.path.as_path()) {
            buf.set_string(area.x, area.y, ">", theme::mark_style());
        }
        if area.width < 2 {
            return;
        }

        let right: Line<'static> = row.right(selected);
        let right_width: u16 = u16::try_from(right.width()).unwrap_or(u16::MAX);
        let inner_width: u16 = area.width - 1;

        let mut left: Line<'static> = row.left();
        if selected {
            left = left.patch_style(Style::default().add_modifier(Modifier::REVERSED));
        }

        // The name wins when the row is too narrow for both.
        let left_room: u16 = if right_width < inner_width {
            inner_width - right_width
        } else {
            inner_width
        };
        buf.set_line(area.x + 1, area.y, &left, left_room);

        if right_width > 0 && right_width < inner_width {
            buf.set_line(area.right() - right_width, area.y, &right, right_width);
        }
    }
}

impl Widget for ListPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = self
            .pane
            .rows()
            .iter()
            .enumerate()
            .skip(self.pane.offset())
            .take(usize::from(area.height));

        for (line, (idx, row)) in (area.y..).zip(visible) {
            let row_area = Rect::new(area.x, line, area.width, 1);
            self.render_row(row, idx == self.pane.selected(), row_area, buf);
        }
    }
}
