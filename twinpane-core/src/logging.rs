//! src/logging.rs
//!
//! File-only tracing setup. The terminal is owned by the TUI, so nothing is
//! ever written to stderr while the app runs.

use std::{
    fs,
    path::Path,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::{Context, Result};
use tracing::Metadata;
use tracing_appender::rolling::{RollingFileAppender, daily};
use tracing_subscriber::{
    EnvFilter,
    filter::Directive,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::config::LogConfig;

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`.
    pub fn init_tracing(config: &LogConfig, log_dir: &Path) -> Result<()> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("cannot create log dir {}", log_dir.display()))?;

        SEQ.get_or_init(|| AtomicUsize::new(1));

        // daily rolling file appender → <log_dir>/twinpane.YYYY-MM-DD
        let file: RollingFileAppender = daily(log_dir, "twinpane");

        let directive: Directive = config
            .level
            .parse()
            .with_context(|| format!("invalid log level '{}'", config.level))?;

        let file_layer = fmt::layer()
            .event_format(SeqFileMod) // our compact formatter
            .with_writer(file)
            .with_ansi(false)
            .with_filter(EnvFilter::from_default_env().add_directive(directive));

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .context("tracing subscriber already installed")?;

        Ok(())
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically‑increasing sequence number
        let seq: usize = SEQ
            .get()
            .map_or(0, |seq| seq.fetch_add(1, Ordering::Relaxed));

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        // span context (e.g. the worker path) before the message
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(w, "{}", span.name())?;
                if let Some(fields) = span
                    .extensions()
                    .get::<fmt::FormattedFields<N>>()
                    .filter(|f| !f.is_empty())
                {
                    write!(w, "{{{fields}}}")?;
                }
                write!(w, ": ")?;
            }
        }

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
