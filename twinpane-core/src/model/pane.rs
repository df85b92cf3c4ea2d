//! src/model/pane.rs
//!
//! Cursor state of one list pane: the rows of the last applied snapshot, the
//! selected row and the first visible row.
//!
//! After every mutation `selected < len` and
//! `offset <= selected < offset + height` hold (both are 0 for an empty pane).

use std::sync::Arc;

use crate::fs::object_info::FileEntry;
use crate::model::list_row::ListRow;

#[derive(Debug, Clone)]
pub struct PaneState {
    rows: Vec<ListRow>,
    selected: usize,
    offset: usize,
    height: usize,
}

impl Default for PaneState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
            offset: 0,
            height: 1,
        }
    }
}

impl PaneState {
    #[must_use]
    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Distance between the selection and the first visible row.
    #[must_use]
    pub const fn distance_from_top(&self) -> usize {
        self.selected.saturating_sub(self.offset)
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<&ListRow> {
        self.rows.get(self.selected)
    }

    #[must_use]
    pub fn selected_entry(&self) -> Option<&Arc<FileEntry>> {
        self.selected_row().map(|row| &row.entry)
    }

    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.name() == name)
    }

    /// Replace the rows, keeping the cursor where it is (clamped).
    pub fn set_rows(&mut self, rows: Vec<ListRow>) {
        self.rows = rows;
        self.clamp();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.selected = 0;
        self.offset = 0;
    }

    /// Moves rows and cursor out of `from`, leaving it empty. The viewport
    /// height of each pane stays with the pane, so the offset is pulled back
    /// until the rows fill this viewport.
    pub fn take_content(&mut self, from: &mut Self) {
        self.rows = std::mem::take(&mut from.rows);
        self.selected = from.selected;
        self.offset = from.offset.min(self.rows.len().saturating_sub(self.height));
        from.clear();
        self.clamp();
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.clamp();
    }

    pub fn select(&mut self, idx: usize) {
        self.selected = idx;
        self.clamp();
    }

    /// Select the row `row` lines below the top of the viewport.
    pub fn select_visible(&mut self, row: usize) {
        self.select(self.offset.saturating_add(row));
    }

    /// Select `name` (row 0 when absent) and place it `distance` rows below
    /// the top of the viewport.
    pub fn restore(&mut self, name: Option<&str>, distance: usize) {
        self.selected = name.and_then(|n| self.position_of(n)).unwrap_or(0);
        self.offset = self.selected.saturating_sub(distance);
        self.clamp();
    }

    pub fn move_by(&mut self, delta: isize) {
        self.selected = self.selected.saturating_add_signed(delta);
        self.clamp();
    }

    pub fn top(&mut self) {
        self.select(0);
    }

    pub fn bottom(&mut self) {
        self.select(self.rows.len().saturating_sub(1));
    }

    /// Move by `factor` viewport heights (negative moves up).
    #[expect(clippy::cast_possible_truncation, reason = "Expected")]
    #[expect(clippy::cast_precision_loss, reason = "Expected")]
    pub fn page(&mut self, factor: f64) {
        self.move_by((self.height as f64 * factor) as isize);
    }

    /// Scroll the viewport by `n` rows (negative scrolls up), dragging the
    /// selection along when it would leave the viewport.
    ///
    /// Returns whether the selection moved.
    pub fn scroll_by(&mut self, n: isize) -> bool {
        if self.rows.is_empty() {
            return false;
        }

        let last = self.rows.len() - 1;
        self.offset = self.offset.saturating_add_signed(n).min(last);

        let before = self.selected;
        let bottom = self.offset + self.height - 1;
        if self.selected < self.offset {
            self.selected = self.offset;
        } else if self.selected > bottom {
            self.selected = bottom;
        }
        self.selected = self.selected.min(last);

        self.selected != before
    }

    fn clamp(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
            self.offset = 0;
            return;
        }

        let last = self.rows.len() - 1;
        self.selected = self.selected.min(last);
        self.offset = self.offset.min(last);

        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.height {
            self.offset = self.selected + 1 - self.height;
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::model::dir_command::ColumnConfig;
    use std::path::PathBuf;
    use std::time::UNIX_EPOCH;

    use crate::fs::object_info::LinkState;
    use compact_str::CompactString;

    /// Row for an in-memory entry named `name` under `/t`.
    pub fn row(name: &str) -> ListRow {
        row_in("/t", name, false)
    }

    pub fn row_in(dir: &str, name: &str, is_dir: bool) -> ListRow {
        let entry = FileEntry {
            path: Arc::new(PathBuf::from(dir).join(name)),
            size: 0,
            accessed: UNIX_EPOCH,
            changed: UNIX_EPOCH,
            modified: UNIX_EPOCH,
            name: CompactString::new(name),
            link_target: None,
            mode: if is_dir { 0o040_755 } else { 0o100_644 },
            uid: 0,
            gid: 0,
            nlink: 1,
            link_state: LinkState::None,
            is_dir,
            target_is_dir: false,
        };
        ListRow::new(Arc::new(entry), ColumnConfig::default())
    }

    pub fn rows(n: usize) -> Vec<ListRow> {
        (0..n).map(|i| row(&format!("f{i:02}"))).collect()
    }
}
