//! src/controller/keymap.rs
//! ============================================================================
//! # Keymap: chords and clicks to action lists
//!
//! A binding reads `"<chord>:<action>[+<action>...]"`, e.g.
//! `"tab:toggle_mark+next"`. The chord/action separator is the first `:`
//! after the first character, so `"::command"` binds the colon key.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ahash::AHashMap;
use tracing::debug;

use crate::controller::actions::Action;
use crate::error::AppError;

pub const BUILTIN_KEYBINDINGS: &[&str] = &[
    "ctrl-l:resize",
    "j:next",
    "k:prev",
    "g:top",
    "G:bottom",
    "ctrl-e:scroll_down 1",
    "ctrl-y:scroll_up 1",
    "ctrl-d:half_page_down",
    "ctrl-u:half_page_up",
    "space:toggle_mark",
    "tab:toggle_mark+next",
    "shift-tab:toggle_mark+prev",
    "enter:clear_marks+mark+quit",
    "l:in",
    "h:out",
    "ctrl-c:quit",
    "q:quit",
    "left-click:select",
    "double-click:goto",
    "right-click:out",
    "i:toggle_dir_info perm hsize mtime link_target",
    "s:dir sort_by_size",
    "::command",
    "/:filter",
];

/// Something that can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Key(KeyCode, KeyModifiers),
    LeftClick,
    RightClick,
    DoubleClick,
}

impl Trigger {
    /// Normalises a terminal key event. Shift is folded into the character
    /// itself (`G`, not `shift-g`) and into `BackTab`.
    #[must_use]
    pub fn from_key(key: KeyEvent) -> Self {
        let mut mods = key.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
        if matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab) {
            mods.remove(KeyModifiers::SHIFT);
        }
        Self::Key(key.code, mods)
    }

    /// Parses a chord such as `j`, `G`, `ctrl-d`, `alt-x`, `shift-tab`,
    /// `pgdn`, `f5` or `left-click`.
    pub fn parse_chord(chord: &str) -> Result<Self, AppError> {
        let bad = || AppError::invalid_keybinding(chord, "unsupported key");
        let plain = |code: KeyCode| Ok(Self::Key(code, KeyModifiers::NONE));

        if chord.is_empty() {
            return Err(AppError::invalid_keybinding(chord, "empty key"));
        }

        let lower = chord.to_lowercase();
        match lower.as_str() {
            "left-click" => return Ok(Self::LeftClick),
            "right-click" => return Ok(Self::RightClick),
            "double-click" => return Ok(Self::DoubleClick),
            "up" => return plain(KeyCode::Up),
            "down" => return plain(KeyCode::Down),
            "left" => return plain(KeyCode::Left),
            "right" => return plain(KeyCode::Right),
            "enter" | "return" => return plain(KeyCode::Enter),
            "space" => return plain(KeyCode::Char(' ')),
            "bs" | "bspace" => return plain(KeyCode::Backspace),
            "tab" => return plain(KeyCode::Tab),
            "btab" | "shift-tab" => return plain(KeyCode::BackTab),
            "esc" => return plain(KeyCode::Esc),
            "del" => return plain(KeyCode::Delete),
            "home" => return plain(KeyCode::Home),
            "end" => return plain(KeyCode::End),
            "insert" => return plain(KeyCode::Insert),
            "pgup" | "page-up" => return plain(KeyCode::PageUp),
            "pgdn" | "page-down" => return plain(KeyCode::PageDown),
            _ => {}
        }

        if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok())
            && (1..=12).contains(&n)
        {
            return plain(KeyCode::F(n));
        }

        let (mods, rest) = if let Some(rest) = lower.strip_prefix("ctrl-alt-") {
            (KeyModifiers::CONTROL | KeyModifiers::ALT, rest)
        } else if let Some(rest) = lower.strip_prefix("ctrl-") {
            (KeyModifiers::CONTROL, rest)
        } else if chord.len() > 4 && lower.starts_with("alt-") {
            // keep the case of alt chords: alt-G differs from alt-g
            (KeyModifiers::ALT, &chord[4..])
        } else {
            (KeyModifiers::NONE, chord)
        };

        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if mods.contains(KeyModifiers::CONTROL) && ch.is_ascii_alphabetic() => {
                Ok(Self::Key(KeyCode::Char(ch), mods))
            }
            (Some(ch), None) if !mods.contains(KeyModifiers::CONTROL) => Ok(Self::Key(KeyCode::Char(ch), mods)),
            _ => Err(bad()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: AHashMap<Trigger, Vec<Action>>,
}

impl Keymap {
    /// The built-in table.
    pub fn builtin() -> Result<Self, AppError> {
        let mut keymap = Self::default();
        keymap.extend(BUILTIN_KEYBINDINGS.iter().copied())?;
        Ok(keymap)
    }

    /// Built-ins overridden by `extra`.
    pub fn with_overrides(extra: &[String]) -> Result<Self, AppError> {
        let mut keymap = Self::builtin()?;
        keymap.extend(extra.iter().map(String::as_str))?;
        Ok(keymap)
    }

    /// Adds bindings, replacing any existing ones for the same trigger.
    pub fn extend<'a, I>(&mut self, bindings: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for binding in bindings {
            let (trigger, actions) = Self::parse_binding(binding)?;
            debug!(binding, "keybinding");
            self.bindings.insert(trigger, actions);
        }
        Ok(())
    }

    pub fn parse_binding(binding: &str) -> Result<(Trigger, Vec<Action>), AppError> {
        let sep: usize = binding
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == ':')
            .map(|(i, _)| i)
            .ok_or_else(|| AppError::invalid_keybinding(binding, "missing ':'"))?;

        let trigger = Trigger::parse_chord(&binding[..sep])?;
        let actions: Vec<Action> = binding[sep + 1..]
            .split('+')
            .map(|action| {
                action.parse::<Action>()
                    .map_err(|e| AppError::invalid_keybinding(binding, e.to_string()))
            })
            .collect::<Result<_, _>>()?;

        Ok((trigger, actions))
    }

    #[must_use]
    pub fn lookup(&self, trigger: &Trigger) -> Option<&[Action]> {
        self.bindings.get(trigger).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
