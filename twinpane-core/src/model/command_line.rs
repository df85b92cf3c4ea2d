//! src/model/command_line.rs
//!
//! The modal `:` command / `/` filter line at the bottom of the screen.
//!
//! The line only edits text; what an edit means (live filtering, running an
//! action) is decided by the caller from the returned [`LineEvent`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    Command,
    Filter,
}

impl LineMode {
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Command => ':',
            Self::Filter => '/',
        }
    }
}

/// Outcome of one key press on the open line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Text changed.
    Edited,
    /// Only the cursor moved, or the key did nothing.
    Unchanged,
    /// Line closed without submitting.
    Cancelled,
    /// Line closed with Enter; carries the text after the prefix.
    Submitted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    mode: LineMode,
    text: String,
    // char index into `text`
    cursor: usize,
}

impl CommandLine {
    #[must_use]
    pub const fn open(mode: LineMode) -> Self {
        Self {
            mode,
            text: String::new(),
            cursor: 0,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> LineMode {
        self.mode
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LineEvent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => LineEvent::Cancelled,
            KeyCode::Enter => LineEvent::Submitted(std::mem::take(&mut self.text)),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_to(self.cursor + 1),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(usize::MAX),
            KeyCode::Char(ch) if ctrl => match ch {
                'c' => LineEvent::Cancelled,
                'u' => self.clear(),
                'b' => self.move_to(self.cursor.saturating_sub(1)),
                'f' => self.move_to(self.cursor + 1),
                'a' => self.move_to(0),
                'e' => self.move_to(usize::MAX),
                'm' => LineEvent::Submitted(std::mem::take(&mut self.text)),
                _ => LineEvent::Unchanged,
            },
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => self.insert(ch),
            _ => LineEvent::Unchanged,
        }
    }

    pub fn insert(&mut self, ch: char) -> LineEvent {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
        LineEvent::Edited
    }

    /// Deletes before the cursor; on an empty prefix the line is cancelled.
    pub fn backspace(&mut self) -> LineEvent {
        if self.cursor == 0 {
            return LineEvent::Cancelled;
        }

        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
        LineEvent::Edited
    }

    pub fn clear(&mut self) -> LineEvent {
        self.cursor = 0;
        if self.text.is_empty() {
            return LineEvent::Unchanged;
        }
        self.text.clear();
        LineEvent::Edited
    }

    fn move_to(&mut self, pos: usize) -> LineEvent {
        self.cursor = pos.min(self.text.chars().count());
        LineEvent::Unchanged
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }
}
