//! src/model/list_row.rs
//!
//! One display row of a directory snapshot. The row only carries the entry
//! and the column configuration that was active when the snapshot was cut;
//! the styled text is built on demand while rendering.

use std::sync::Arc;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::fs::object_info::{ANSIC_FORMAT, FileEntry, PermClass};
use crate::model::dir_command::{ColumnConfig, SizeColumn, UserColumn};
use crate::view::theme;

#[derive(Debug, Clone)]
pub struct ListRow {
    pub entry: Arc<FileEntry>,
    pub columns: ColumnConfig,
}

impl ListRow {
    #[must_use]
    pub const fn new(entry: Arc<FileEntry>, columns: ColumnConfig) -> Self {
        Self { entry, columns }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Name style by entry kind.
    #[must_use]
    pub fn style(&self) -> Style {
        theme::entry_style(&self.entry)
    }

    /// Name, plus ` -> target` when the link target column is on.
    #[must_use]
    pub fn left(&self) -> Line<'static> {
        let mut text = self.entry.name.to_string();

        if self.columns.link_target
            && let Some(target) = &self.entry.link_target
        {
            text.push_str(" -> ");
            text.push_str(&target.to_string_lossy());
        }

        Line::from(Span::styled(text, self.style()))
    }

    /// Optional info columns. Only the size, owner and time cells depend on
    /// `selected` (they are reversed).
    #[must_use]
    pub fn right(&self, selected: bool) -> Line<'static> {
        let cols: &ColumnConfig = &self.columns;
        let entry: &FileEntry = &self.entry;
        let mut spans: Vec<Span<'static>> = Vec::new();

        let reversed = |style: Style| {
            if selected {
                style.add_modifier(Modifier::REVERSED)
            } else {
                style
            }
        };

        if cols.perm {
            spans.extend(
                entry
                    .permission_string()
                    .chars()
                    .map(|ch| Span::styled(ch.to_string(), theme::perm_style(PermClass::of(ch)))),
            );
        }

        if cols.link_count {
            spans.push(Span::raw(format!(" {}", entry.nlink)));
        }

        let size_style = reversed(theme::size_style(entry.is_dir));
        match cols.size {
            SizeColumn::Hidden => {}
            SizeColumn::Human => {
                spans.push(Span::styled(format!(" {:>4}", entry.size_human()), size_style));
            }
            SizeColumn::Raw if entry.is_dir => {
                spans.push(Span::styled(format!(" {:>4}", entry.size_human()), size_style));
            }
            SizeColumn::Raw => {
                spans.push(Span::styled(format!(" {}", entry.size), size_style));
            }
        }

        let owner_style = reversed(theme::owner_style());
        match cols.user {
            UserColumn::Hidden => {}
            UserColumn::User => spans.push(Span::styled(format!(" {}", entry.user_name()), owner_style)),
            UserColumn::Group => spans.push(Span::styled(format!(" {}", entry.group_name()), owner_style)),
            UserColumn::Both => {
                spans.push(Span::styled(format!(" {}", entry.user_name()), owner_style));
                spans.push(Span::styled(format!(" {}", entry.group_name()), owner_style));
            }
        }

        if let Some(kind) = cols.time {
            spans.push(Span::styled(
                format!(" {}", entry.format_time(kind, ANSIC_FORMAT)),
                reversed(theme::time_style()),
            ));
        }

        Line::from(spans)
    }
}
