//! src/view/theme.rs
//! ============================================================================
//! # Catppuccin Mocha Theme Color Palette
//!
//! Color constants from the Catppuccin Mocha palette
//! (https://github.com/catppuccin/catppuccin) and the styles built on them.

use ratatui::style::{Color, Modifier, Style};

use crate::fs::object_info::{FileEntry, LinkState, PermClass};

pub const FOREGROUND: Color = Color::Rgb(205, 214, 244); // Text
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const BLUE: Color = Color::Rgb(137, 180, 250); // Blue
pub const CYAN: Color = Color::Rgb(137, 220, 235); // Sky
pub const GREEN: Color = Color::Rgb(166, 227, 161); // Green
pub const PURPLE: Color = Color::Rgb(203, 166, 247); // Mauve
pub const RED: Color = Color::Rgb(243, 139, 168); // Red
pub const YELLOW: Color = Color::Rgb(249, 226, 175); // Yellow

/// Name style by entry kind.
#[must_use]
pub fn entry_style(entry: &FileEntry) -> Style {
    match entry.link_state {
        LinkState::Broken => Style::default().fg(RED),
        LinkState::Resolved => Style::default().fg(CYAN),
        LinkState::None if entry.is_dir => Style::default().fg(BLUE).add_modifier(Modifier::BOLD),
        LinkState::None if entry.is_executable() => Style::default().fg(GREEN),
        LinkState::None => Style::default().fg(FOREGROUND),
    }
}

#[must_use]
pub fn perm_style(class: PermClass) -> Style {
    let color = match class {
        PermClass::Directory => BLUE,
        PermClass::Read => YELLOW,
        PermClass::Write => RED,
        PermClass::Execute => GREEN,
        PermClass::Other => COMMENT,
    };
    Style::default().fg(color)
}

#[must_use]
pub fn size_style(is_dir: bool) -> Style {
    Style::default().fg(if is_dir { COMMENT } else { GREEN })
}

#[must_use]
pub fn owner_style() -> Style {
    Style::default().fg(YELLOW)
}

#[must_use]
pub fn time_style() -> Style {
    Style::default().fg(BLUE)
}

#[must_use]
pub fn mark_style() -> Style {
    Style::default().fg(RED)
}

#[must_use]
pub fn prompt_style() -> Style {
    Style::default().fg(GREEN).add_modifier(Modifier::BOLD)
}

#[must_use]
pub fn path_style() -> Style {
    Style::default().fg(BLUE).add_modifier(Modifier::BOLD)
}

#[must_use]
pub fn warning_style() -> Style {
    Style::default().fg(Color::White).bg(Color::Red)
}

#[must_use]
pub fn status_style() -> Style {
    Style::default().fg(COMMENT)
}

#[must_use]
pub fn border_style() -> Style {
    Style::default().fg(PURPLE)
}
