//! src/main.rs
//! Twin-pane directory navigator. Prints the marked paths on exit.

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{error, info};

use twinpane_core::{
    AppError, Logger,
    config::Config,
    controller::{event_loop::EventLoop, keymap::Keymap, navigator::Navigator},
    fs::working_dir::ProcessWorkingDir,
    identity::Identity,
    model::ui_state::UIState,
    tasks::{fuzzy_filter::ExternalFilter, worker_registry::DirRegistry},
    view::ui,
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<()> {
    setup_panic_handler();

    let app = App::new()
        .await
        .context("Failed to initialize application")?;
    let marks: Vec<PathBuf> = app.run().await.context("Application runtime error")?;

    for mark in marks {
        println!("{}", mark.display());
    }

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    event_loop: EventLoop<EventStream>,
    identity: Identity,
}

impl App {
    async fn new() -> Result<Self> {
        let config: Config = Config::load().await.unwrap_or_else(|e| {
            eprintln!("Failed to load config, using defaults: {e:#}");
            Config::default()
        });

        let log_dir: PathBuf = config.log_dir()?;
        if let Err(e) = Logger::init_tracing(&config.log, &log_dir) {
            eprintln!("Logging disabled: {e:#}");
        }
        info!("Starting twinpane");

        // Bad keybindings stop us before the terminal is touched.
        let keymap: Keymap = Keymap::with_overrides(&config.keybindings)?;

        let cwd: PathBuf = tokio::fs::canonicalize(".")
            .await
            .context("Failed to get current directory")?;
        let identity: Identity = Identity::resolve();

        let matcher = Arc::new(ExternalFilter::from_config(&config.filter));
        let (registry, snapshots) = DirRegistry::new(matcher);
        let navigator = Navigator::new(cwd, registry, Box::new(ProcessWorkingDir));

        let terminal: AppTerminal = setup_terminal().context("Failed to initialize terminal")?;
        let event_loop = EventLoop::new(
            EventStream::new(),
            snapshots,
            navigator,
            keymap,
            UIState::new(config.warning_timeout),
        );

        Ok(Self {
            terminal,
            event_loop,
            identity,
        })
    }

    /// Runs until quit; the terminal is restored whatever the outcome.
    async fn run(mut self) -> Result<Vec<PathBuf>> {
        let result = self.drive().await;
        cleanup_terminal(&mut self.terminal)?;
        result?;

        let navigator: Navigator = self.event_loop.finish();
        Ok(navigator.marks())
    }

    async fn drive(&mut self) -> Result<(), AppError> {
        let size = self
            .terminal
            .size()
            .map_err(|e| AppError::Terminal(e.to_string()))?;
        self.event_loop.resize(Rect::new(0, 0, size.width, size.height));

        let terminal: &mut AppTerminal = &mut self.terminal;
        let identity: &Identity = &self.identity;

        self.event_loop
            .run(|el| {
                if el.take_clear_screen() {
                    terminal
                        .clear()
                        .map_err(|e| AppError::Terminal(e.to_string()))?;
                }
                terminal
                    .draw(|frame| ui::render(frame, el.navigator(), el.ui(), identity))
                    .map_err(|e| AppError::Terminal(e.to_string()))?;
                Ok(())
            })
            .await
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
