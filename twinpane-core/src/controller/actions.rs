//! src/controller/actions.rs
//! ============================================================================
//! # Actions: everything a key, a click or a `:` line can ask for
//!
//! Actions are parsed from `"<name> [args...]"` strings, the same grammar for
//! keybindings and the command line.

use std::str::FromStr;

use crate::error::AppError;
use crate::model::dir_command::DirCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Redraw everything.
    Resize,

    Next,
    Prev,
    Top,
    Bottom,

    /// Scroll the viewport by `rows` (negative is up); `left` targets the
    /// parent pane.
    Scroll { rows: isize, left: bool },

    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,

    ClearMarks,
    Mark,
    Unmark,
    ToggleMark,

    /// Mouse: select the row under the pointer.
    Select,
    /// Mouse: select the row under the pointer and enter it.
    Goto,

    In,
    Out,
    Quit,

    /// Toggle the info columns given as arguments on every visited directory.
    ToggleDirInfo(Vec<DirCommand>),

    /// Send directory commands to the current directory.
    Dir(Vec<DirCommand>),

    /// Open the `:` line.
    Command,
    /// Open the `/` line.
    Filter,
}

impl Action {
    /// Builds an action from its name and whitespace separated arguments.
    pub fn from_parts(name: &str, args: &[&str]) -> Result<Self, AppError> {
        let action = match name {
            "resize" => Self::Resize,
            "next" => Self::Next,
            "prev" => Self::Prev,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "scroll_down" => Self::scroll(args, 1),
            "scroll_up" => Self::scroll(args, -1),
            "half_page_down" => Self::HalfPageDown,
            "half_page_up" => Self::HalfPageUp,
            "page_down" => Self::PageDown,
            "page_up" => Self::PageUp,
            "clear_marks" => Self::ClearMarks,
            "mark" => Self::Mark,
            "unmark" => Self::Unmark,
            "toggle_mark" => Self::ToggleMark,
            "select" => Self::Select,
            "goto" => Self::Goto,
            "in" => Self::In,
            "out" => Self::Out,
            "quit" => Self::Quit,
            "toggle_dir_info" => Self::ToggleDirInfo(DirCommand::parse_all(args)?),
            "dir" => Self::Dir(DirCommand::parse_all(args)?),
            "command" => Self::Command,
            "filter" => Self::Filter,
            _ => return Err(AppError::UnknownAction(name.to_string())),
        };

        Ok(action)
    }

    // `scroll_down [rows] [left]`; an unparsable count falls back to 1.
    fn scroll(args: &[&str], sign: isize) -> Self {
        let rows: isize = args
            .first()
            .and_then(|a| a.parse::<isize>().ok())
            .unwrap_or(1);
        let left: bool = args
            .get(1)
            .is_some_and(|a| matches!(*a, "left" | "true" | "1"));

        Self::Scroll {
            rows: rows * sign,
            left,
        }
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let name: &str = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        Self::from_parts(name, &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dir_command::{SizeColumn, SortMode};

    #[test]
    fn plain_names() {
        assert_eq!("next".parse::<Action>().unwrap(), Action::Next);
        assert_eq!(" quit ".parse::<Action>().unwrap(), Action::Quit);
        assert_eq!("filter".parse::<Action>().unwrap(), Action::Filter);
    }

    #[test]
    fn scroll_arguments() {
        assert_eq!(
            "scroll_down".parse::<Action>().unwrap(),
            Action::Scroll { rows: 1, left: false }
        );
        assert_eq!(
            "scroll_up 3 left".parse::<Action>().unwrap(),
            Action::Scroll { rows: -3, left: true }
        );
        assert_eq!(
            "scroll_down x".parse::<Action>().unwrap(),
            Action::Scroll { rows: 1, left: false }
        );
    }

    #[test]
    fn directory_commands_are_parsed_up_front() {
        assert_eq!(
            "dir sort_by_size hsize".parse::<Action>().unwrap(),
            Action::Dir(vec![DirCommand::SortBy(SortMode::Size), DirCommand::Size(SizeColumn::Human)])
        );

        let err = "dir sort_by_colour".parse::<Action>().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn unknown_name_is_not_fatal() {
        let err = "frobnicate now".parse::<Action>().unwrap_err();
        assert!(matches!(err, AppError::UnknownAction(ref n) if n == "frobnicate"));
        assert!(!err.is_fatal());
    }
}
