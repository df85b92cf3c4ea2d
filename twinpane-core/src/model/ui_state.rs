//! src/model/ui_state.rs
//!
//! Input mode and the warning banner. Every recoverable error ends up in
//! [`UIState::show_warning`]; nothing else writes the banner.

use std::time::{Duration, Instant};

use compact_str::CompactString;
use tracing::warn;

use crate::model::command_line::CommandLine;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UIMode {
    #[default]
    Browse,
    Line(CommandLine),
}

#[derive(Debug, Clone)]
pub struct Warning {
    pub message: CompactString,
    pub timestamp: Instant,
}

#[derive(Debug, Clone)]
pub struct UIState {
    pub mode: UIMode,
    pub warning: Option<Warning>,
    pub warning_timeout: Duration,
}

impl UIState {
    #[must_use]
    pub const fn new(warning_timeout: Duration) -> Self {
        Self {
            mode: UIMode::Browse,
            warning: None,
            warning_timeout,
        }
    }

    pub fn show_warning(&mut self, message: impl Into<CompactString>) {
        let message: CompactString = message.into();
        warn!("{message}");
        self.warning = Some(Warning {
            message,
            timestamp: Instant::now(),
        });
    }

    /// When the current warning expires, if any.
    #[must_use]
    pub fn warning_deadline(&self) -> Option<Instant> {
        self.warning
            .as_ref()
            .map(|w| w.timestamp + self.warning_timeout)
    }

    /// Drops an expired warning; returns whether one was dropped.
    pub fn expire_warning(&mut self, now: Instant) -> bool {
        if self.warning_deadline().is_some_and(|deadline| now >= deadline) {
            self.warning = None;
            return true;
        }
        false
    }

    #[must_use]
    pub const fn line(&self) -> Option<&CommandLine> {
        match &self.mode {
            UIMode::Line(line) => Some(line),
            UIMode::Browse => None,
        }
    }
}

impl Default for UIState {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::command_line::LineMode;

    #[test]
    fn warning_expires_after_timeout() {
        let mut ui = UIState::new(Duration::from_millis(50));
        assert!(ui.warning_deadline().is_none());

        ui.show_warning("boom");
        let deadline = ui.warning_deadline().unwrap();

        assert!(!ui.expire_warning(deadline - Duration::from_millis(1)));
        assert_eq!(ui.warning.as_ref().unwrap().message, "boom");

        assert!(ui.expire_warning(deadline));
        assert!(ui.warning.is_none());
        assert!(!ui.expire_warning(deadline));
    }

    #[test]
    fn line_accessor() {
        let mut ui = UIState::default();
        assert!(ui.line().is_none());

        ui.mode = UIMode::Line(CommandLine::open(LineMode::Filter));
        assert_eq!(ui.line().unwrap().mode(), LineMode::Filter);
    }
}
