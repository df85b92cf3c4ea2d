//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event Loop: one event at a time, input and snapshots raced
//!
//! Each turn waits for whichever comes first: a terminal event, a directory
//! snapshot or the expiry of the warning banner. The event is handled to
//! completion before the next wait, and the caller redraws in between.
//! Nothing here waits on the filesystem or on the filter process; that all
//! happens inside the directory workers.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event as TermEvent, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use futures::{Stream, StreamExt};
use ratatui::layout::Rect;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, trace};

use crate::controller::actions::Action;
use crate::controller::keymap::{Keymap, Trigger};
use crate::controller::navigator::{Navigator, PaneSide};
use crate::error::AppError;
use crate::model::command_line::{CommandLine, LineEvent, LineMode};
use crate::model::ui_state::{UIMode, UIState};
use crate::tasks::dir_worker::DirSnapshot;
use crate::view::ui::AppLayout;

/// Rows moved by one wheel notch.
pub const WHEEL_ROWS: isize = 3;

/// Two left clicks on the same cell within this window are a double click.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);

#[derive(Debug)]
pub enum AppEvent {
    Input(TermEvent),
    Snapshot(DirSnapshot),
    /// The warning banner is due to expire.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
struct Click {
    at: Instant,
    column: u16,
    row: u16,
}

pub struct EventLoop<S> {
    input: S,
    snapshots: Receiver<DirSnapshot>,
    navigator: Navigator,
    ui: UIState,
    keymap: Keymap,
    layout: AppLayout,
    last_click: Option<Click>,
    clear_screen: bool,
}

impl<S> EventLoop<S>
where
    S: Stream<Item = io::Result<TermEvent>> + Unpin,
{
    pub fn new(
        input: S,
        snapshots: Receiver<DirSnapshot>,
        navigator: Navigator,
        keymap: Keymap,
        ui: UIState,
    ) -> Self {
        info!(bindings = keymap.len(), "event loop ready");
        Self {
            input,
            snapshots,
            navigator,
            ui,
            keymap,
            layout: AppLayout::default(),
            last_click: None,
            clear_screen: false,
        }
    }

    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub const fn ui(&self) -> &UIState {
        &self.ui
    }

    /// Returns and resets the request for a full repaint (`resize`).
    pub const fn take_clear_screen(&mut self) -> bool {
        std::mem::replace(&mut self.clear_screen, false)
    }

    /// Recomputes the layout for a terminal of `area` and resizes the panes.
    pub fn resize(&mut self, area: Rect) {
        self.layout = AppLayout::new(area);
        let (parent, current) = self.layout.heights();
        self.navigator.set_heights(parent, current);
        debug!(?area, "resized");
    }

    /// Waits for the next event. `None` once the terminal input ends.
    pub async fn next_event(&mut self) -> Result<Option<AppEvent>, AppError> {
        let deadline: Option<Instant> = self.ui.warning_deadline();

        tokio::select! {
            input = self.input.next() => match input {
                Some(Ok(event)) => Ok(Some(AppEvent::Input(event))),
                Some(Err(e)) => Err(AppError::Terminal(e.to_string())),
                None => Ok(None),
            },
            Some(snapshot) = self.snapshots.recv() => Ok(Some(AppEvent::Snapshot(snapshot))),
            () = sleep_until(deadline) => Ok(Some(AppEvent::Tick)),
        }
    }

    /// Draws, waits, handles, until quit or end of input. Fatal errors end
    /// the loop; everything else is a warning.
    pub async fn run<F>(&mut self, mut draw: F) -> Result<(), AppError>
    where
        F: FnMut(&mut Self) -> Result<(), AppError>,
    {
        loop {
            draw(self)?;

            let Some(event) = self.next_event().await? else {
                info!("input closed");
                return Ok(());
            };
            if self.handle(event)? == Flow::Quit {
                info!("quit");
                return Ok(());
            }
        }
    }

    pub fn handle(&mut self, event: AppEvent) -> Result<Flow, AppError> {
        match event {
            AppEvent::Input(event) => self.handle_input(event),
            AppEvent::Snapshot(snapshot) => {
                let result = self.navigator.apply_snapshot(snapshot).map(|_| ());
                self.report(result)?;
                Ok(Flow::Continue)
            }
            AppEvent::Tick => {
                self.ui.expire_warning(Instant::now());
                Ok(Flow::Continue)
            }
        }
    }

    fn handle_input(&mut self, event: TermEvent) -> Result<Flow, AppError> {
        trace!(?event, "input");
        match event {
            TermEvent::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            TermEvent::Mouse(mouse) => self.handle_mouse(mouse),
            TermEvent::Resize(width, height) => {
                self.resize(Rect::new(0, 0, width, height));
                Ok(Flow::Continue)
            }
            _ => Ok(Flow::Continue),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Flow, AppError> {
        if let UIMode::Line(line) = &mut self.ui.mode {
            let mode: LineMode = line.mode();
            let event: LineEvent = line.handle_key(key);
            return self.handle_line_event(mode, event);
        }

        match self.keymap.lookup(&Trigger::from_key(key)) {
            Some(actions) => {
                let actions: Vec<Action> = actions.to_vec();
                self.run_actions(&actions, None)
            }
            None => {
                trace!(?key, "unbound key");
                Ok(Flow::Continue)
            }
        }
    }

    fn handle_line_event(&mut self, mode: LineMode, event: LineEvent) -> Result<Flow, AppError> {
        match (mode, event) {
            (_, LineEvent::Unchanged) => {}
            (LineMode::Filter, LineEvent::Edited) => {
                if let Some(line) = self.ui.line() {
                    self.navigator.filter(line.text());
                }
            }
            (LineMode::Command, LineEvent::Edited) => {}
            (mode, LineEvent::Cancelled) => {
                self.ui.mode = UIMode::Browse;
                if mode == LineMode::Filter {
                    self.navigator.filter("");
                }
            }
            (LineMode::Filter, LineEvent::Submitted(_)) => self.ui.mode = UIMode::Browse,
            (LineMode::Command, LineEvent::Submitted(text)) => {
                self.ui.mode = UIMode::Browse;
                if text.trim().is_empty() {
                    return Ok(Flow::Continue);
                }
                return match text.parse::<Action>() {
                    Ok(action) => self.run_actions(&[action], None),
                    Err(e) => {
                        self.report::<()>(Err(e))?;
                        Ok(Flow::Continue)
                    }
                };
            }
        }
        Ok(Flow::Continue)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<Flow, AppError> {
        let hit = self.layout.hit(mouse.column, mouse.row);

        let trigger = match mouse.kind {
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let rows = if mouse.kind == MouseEventKind::ScrollDown {
                    WHEEL_ROWS
                } else {
                    -WHEEL_ROWS
                };
                if let Some((side, _)) = hit {
                    let result = self.navigator.scroll(rows, side);
                    self.report(result)?;
                }
                return Ok(Flow::Continue);
            }
            MouseEventKind::Down(MouseButton::Left) => self.left_click(mouse),
            MouseEventKind::Down(MouseButton::Right) => Trigger::RightClick,
            _ => return Ok(Flow::Continue),
        };

        match self.keymap.lookup(&trigger) {
            Some(actions) => {
                let actions: Vec<Action> = actions.to_vec();
                self.run_actions(&actions, hit)
            }
            None => Ok(Flow::Continue),
        }
    }

    fn left_click(&mut self, mouse: MouseEvent) -> Trigger {
        let now = Instant::now();
        let double = self.last_click.is_some_and(|last| {
            last.column == mouse.column && last.row == mouse.row && now.duration_since(last.at) <= DOUBLE_CLICK
        });

        if double {
            self.last_click = None;
            Trigger::DoubleClick
        } else {
            self.last_click = Some(Click {
                at: now,
                column: mouse.column,
                row: mouse.row,
            });
            Trigger::LeftClick
        }
    }

    /// Runs `actions` in order. `pointer` is the pane cell under the mouse
    /// for `select` and `goto`.
    fn run_actions(&mut self, actions: &[Action], pointer: Option<(PaneSide, usize)>) -> Result<Flow, AppError> {
        for action in actions {
            debug!(?action, "action");
            let result = self.run_action(action, pointer);
            match self.report(result)? {
                Some(Flow::Quit) => return Ok(Flow::Quit),
                Some(Flow::Continue) | None => {}
            }
        }
        Ok(Flow::Continue)
    }

    fn run_action(&mut self, action: &Action, pointer: Option<(PaneSide, usize)>) -> Result<Flow, AppError> {
        let nav = &mut self.navigator;

        match action {
            Action::Resize => self.clear_screen = true,
            Action::Next => nav.next(),
            Action::Prev => nav.prev(),
            Action::Top => nav.top(),
            Action::Bottom => nav.bottom(),
            Action::Scroll { rows, left } => {
                let side = if *left { PaneSide::Parent } else { PaneSide::Current };
                nav.scroll(*rows, side)?;
            }
            Action::HalfPageDown => nav.page(0.5),
            Action::HalfPageUp => nav.page(-0.5),
            Action::PageDown => nav.page(1.0),
            Action::PageUp => nav.page(-1.0),
            Action::ClearMarks => nav.clear_marks(),
            Action::Mark => nav.mark(),
            Action::Unmark => nav.unmark(),
            Action::ToggleMark => nav.toggle_mark(),
            Action::Select => {
                if let Some((side, row)) = pointer {
                    nav.select_at(side, row)?;
                }
            }
            Action::Goto => {
                if let Some((side, row)) = pointer {
                    nav.goto_at(side, row)?;
                }
            }
            Action::In => {
                nav.enter()?;
            }
            Action::Out => {
                nav.leave()?;
            }
            Action::Quit => return Ok(Flow::Quit),
            Action::ToggleDirInfo(cmds) => nav.toggle_dir_info(cmds.clone()),
            Action::Dir(cmds) => nav.dir_do(cmds.clone()),
            Action::Command => self.ui.mode = UIMode::Line(CommandLine::open(LineMode::Command)),
            Action::Filter => self.ui.mode = UIMode::Line(CommandLine::open(LineMode::Filter)),
        }

        Ok(Flow::Continue)
    }

    /// Routes a recoverable error to the warning banner; fatal ones pass.
    fn report<T>(&mut self, result: Result<T, AppError>) -> Result<Option<T>, AppError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.ui.show_warning(e.to_string());
                Ok(None)
            }
        }
    }

    /// Stops every worker and hands back the navigator.
    pub fn finish(mut self) -> Navigator {
        self.navigator.shutdown();
        self.navigator
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}
