//! ``src/tasks/fuzzy_filter.rs``
//! ============================================================================
//! # Fuzzy Filter: external line-oriented matcher
//!
//! Entry names go to the child's stdin one per line; matched names come back
//! one per line on stdout. The default tool is `fzf -f <query>`, and anything
//! speaking the same protocol (`sk -f`, `grep -F -e`) works.

use std::fmt;
use std::io;
use std::process::{ExitStatus, Stdio};

use ahash::AHashSet;
use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter, Lines},
    process::{Child, ChildStdin, ChildStdout, Command},
    task::{JoinError, JoinHandle},
};
use tracing::{debug, instrument};

use crate::config::FilterConfig;
use crate::error::AppError;

/// Picks the names that match `query`.
#[async_trait]
pub trait NameMatcher: Send + Sync + fmt::Debug {
    async fn matches(&self, query: &str, names: Vec<String>) -> Result<AHashSet<String>, AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFilter {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalFilter {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    #[must_use]
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    fn failed(&self, reason: impl fmt::Display) -> AppError {
        AppError::filter_failed(&self.program, reason.to_string())
    }
}

#[async_trait]
impl NameMatcher for ExternalFilter {
    #[instrument(level = "debug", skip(self, names), fields(program = %self.program, count = names.len()))]
    async fn matches(&self, query: &str, names: Vec<String>) -> Result<AHashSet<String>, AppError> {
        let mut child: Child = Command::new(&self.program)
            .args(&self.args)
            .arg(query)
            .kill_on_drop(true)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.failed(e))?;

        let stdin: ChildStdin = child
            .stdin
            .take()
            .ok_or_else(|| self.failed("stdin not captured"))?;
        let stdout: ChildStdout = child
            .stdout
            .take()
            .ok_or_else(|| self.failed("stdout not captured"))?;

        // Feed names from a separate task so a child that writes before it
        // has read everything cannot deadlock us on a full pipe.
        let writer: JoinHandle<io::Result<()>> = tokio::spawn(write_names(stdin, names));

        let matched: AHashSet<String> = match read_matches(stdout).await {
            Ok(matched) => matched,
            Err(e) => {
                writer.abort();
                if let Err(kill) = child.kill().await {
                    debug!("killing filter failed: {kill}");
                }
                return Err(self.failed(format!("reading output: {e}")));
            }
        };

        written(writer.await).map_err(|e| self.failed(format!("writing names: {e}")))?;

        // fzf and grep exit 1 on "no match"; only the output counts.
        let status: ExitStatus = child.wait().await.map_err(|e| self.failed(e))?;
        if !status.success() {
            debug!("filter exited with {status}");
        }

        Ok(matched)
    }
}

/// Collects one name per line until EOF. The pipe is closed on return.
async fn read_matches(stdout: ChildStdout) -> io::Result<AHashSet<String>> {
    let mut matched: AHashSet<String> = AHashSet::new();
    let mut reader: Lines<BufReader<ChildStdout>> = BufReader::new(stdout).lines();
    while let Some(line) = reader.next_line().await? {
        matched.insert(line);
    }
    Ok(matched)
}

/// Outcome of the stdin writer. A child that stops reading early closes the
/// pipe on us; that is not a failure.
fn written(joined: Result<io::Result<()>, JoinError>) -> io::Result<()> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("filter stdin closed early: {e}");
            Ok(())
        }
        Ok(Err(e)) => Err(e),
        Err(e) => Err(io::Error::other(e)),
    }
}

async fn write_names(stdin: ChildStdin, names: Vec<String>) -> io::Result<()> {
    let mut input = BufWriter::new(stdin);
    for name in names {
        input.write_all(name.as_bytes()).await?;
        input.write_all(b"\n").await?;
    }
    input.flush().await
}
