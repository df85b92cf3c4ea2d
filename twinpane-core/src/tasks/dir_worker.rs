//! ``src/tasks/dir_worker.rs``
//! ============================================================================
//! # Directory Worker: one background task per listed directory
//!
//! A worker scans its directory once, then applies command batches in the
//! order they were submitted and emits exactly one [`DirSnapshot`] per batch.
//! All listing state lives inside the task; the outside world only sends
//! batches and receives snapshots.
//!
//! Snapshots go to a bounded channel shared by every worker. A worker holds
//! at most one unsent snapshot and parks on it until the consumer catches up
//! or the worker is stopped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashSet;
use tokio::{
    sync::mpsc::{self, Sender, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

use crate::error::AppError;
use crate::fs::dir_scanner::{scan_dir, sort_entries};
use crate::fs::object_info::FileEntry;
use crate::model::dir_command::{ColumnConfig, DirCommand, SortMode};
use crate::model::list_row::ListRow;
use crate::tasks::fuzzy_filter::NameMatcher;

/// One worker's view of its directory, cut after a command batch.
#[derive(Debug)]
pub struct DirSnapshot {
    pub path: Arc<PathBuf>,

    /// Registry generation of the worker that produced this snapshot
    pub epoch: u64,

    pub rows: Vec<ListRow>,

    /// Set when the directory could not be listed; `rows` is then empty
    pub error: Option<AppError>,
}

/// Handle to a running worker. Dropping the handle stops the worker.
#[derive(Debug)]
pub struct DirWorker {
    path: Arc<PathBuf>,
    epoch: u64,
    cmd_tx: Option<UnboundedSender<Vec<DirCommand>>>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl DirWorker {
    /// Spawns the worker task. `initial` is applied right after the scan, as
    /// the first batch.
    pub fn start(
        path: PathBuf,
        epoch: u64,
        initial: Vec<DirCommand>,
        out_tx: Sender<DirSnapshot>,
        matcher: Arc<dyn NameMatcher>,
    ) -> Self {
        let path: Arc<PathBuf> = Arc::new(path);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<Vec<DirCommand>>();
        let cancel = CancellationToken::new();

        let task = WorkerTask {
            path: Arc::clone(&path),
            epoch,
            out_tx,
            matcher,
            cancel: cancel.clone(),
        };
        let handle: JoinHandle<()> = tokio::spawn(task.run(initial, cmd_rx));

        debug!(path = %path.display(), epoch, "directory worker started");

        Self {
            path,
            epoch,
            cmd_tx: Some(cmd_tx),
            cancel,
            handle,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Queues a batch behind any earlier ones. Returns false once stopped.
    pub fn submit(&self, batch: Vec<DirCommand>) -> bool {
        self.cmd_tx
            .as_ref()
            .is_some_and(|tx: &UnboundedSender<Vec<DirCommand>>| tx.send(batch).is_ok())
    }

    /// Closes the command queue and cancels whatever the task is waiting on.
    /// Does not wait for the task. Safe to call any number of times.
    pub fn stop(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            drop(tx);
            self.cancel.cancel();
            debug!(path = %self.path.display(), epoch = self.epoch, "directory worker stopped");
        }
    }

    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.cmd_tx.is_none()
    }

    /// True once the background task has returned.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DirWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

// ------------------------------------------------------------
// Task side
// ------------------------------------------------------------

struct WorkerTask {
    path: Arc<PathBuf>,
    epoch: u64,
    out_tx: Sender<DirSnapshot>,
    matcher: Arc<dyn NameMatcher>,
    cancel: CancellationToken,
}

/// Private listing state of one worker.
#[derive(Debug, Default)]
struct DirListing {
    // Full listing in the current sort order
    entries: Vec<Arc<FileEntry>>,

    // Names kept by the active filter; `None` when unfiltered
    matched: Option<AHashSet<String>>,

    sort: SortMode,
    columns: ColumnConfig,
}

impl DirListing {
    fn new(entries: Vec<FileEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(Arc::new).collect(),
            ..Self::default()
        }
    }

    fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.to_string()).collect()
    }

    /// Rows for the active list: the filtered subset in listing order, or
    /// everything.
    fn rows(&self) -> Vec<ListRow> {
        let columns: ColumnConfig = self.columns;
        self.entries
            .iter()
            .filter(|e| {
                self.matched
                    .as_ref()
                    .is_none_or(|m: &AHashSet<String>| m.contains(e.name.as_str()))
            })
            .map(|e| ListRow::new(Arc::clone(e), columns))
            .collect()
    }
}

impl WorkerTask {
    #[instrument(name = "dir_worker", skip_all, fields(path = %self.path.display(), epoch = self.epoch))]
    async fn run(self, initial: Vec<DirCommand>, mut cmd_rx: UnboundedReceiver<Vec<DirCommand>>) {
        let scanned = tokio::select! {
            () = self.cancel.cancelled() => return,
            res = scan_dir(&self.path) => res,
        };

        let mut listing: DirListing = match scanned {
            Ok(entries) => DirListing::new(entries),
            Err(e) => {
                debug!("scan failed: {e}");
                if self.emit(Vec::new(), Some(e)).await {
                    // Nothing to configure without a listing; wait for teardown.
                    while self.next_batch(&mut cmd_rx).await.is_some() {}
                }
                return;
            }
        };

        let mut batch: Option<Vec<DirCommand>> = Some(initial);
        while let Some(cmds) = batch {
            if !self.process(&mut listing, cmds).await {
                break;
            }
            batch = self.next_batch(&mut cmd_rx).await;
        }

        trace!("directory worker exiting");
    }

    async fn next_batch(
        &self,
        cmd_rx: &mut UnboundedReceiver<Vec<DirCommand>>,
    ) -> Option<Vec<DirCommand>> {
        tokio::select! {
            () = self.cancel.cancelled() => None,
            batch = cmd_rx.recv() => batch,
        }
    }

    /// Applies one batch and emits its snapshot. Returns false when the
    /// worker should exit.
    async fn process(&self, listing: &mut DirListing, cmds: Vec<DirCommand>) -> bool {
        let mut resort = false;

        for cmd in cmds {
            match cmd {
                DirCommand::Filter(query) => {
                    if !self.filter(listing, &query).await {
                        return false;
                    }
                }
                DirCommand::SortBy(mode) => {
                    listing.sort = mode;
                    resort = true;
                }
                DirCommand::ResetInfo => {
                    listing.matched = None;
                    listing.columns.apply(&DirCommand::ResetInfo);
                }
                other => {
                    listing.columns.apply(&other);
                }
            }
        }

        if resort {
            sort_entries(&mut listing.entries, listing.sort);
        }

        self.emit(listing.rows(), None).await
    }

    /// Sets or clears the filter. A broken filter tool clears it. Returns
    /// false if cancelled while the tool was running.
    async fn filter(&self, listing: &mut DirListing, query: &str) -> bool {
        if query.is_empty() {
            listing.matched = None;
            return true;
        }

        let result = tokio::select! {
            () = self.cancel.cancelled() => return false,
            res = self.matcher.matches(query, listing.names()) => res,
        };

        match result {
            Ok(matched) => {
                debug!(query, matched = matched.len(), "filter applied");
                listing.matched = Some(matched);
            }
            Err(e) => {
                warn!("filter '{query}' not applied: {e}");
                listing.matched = None;
            }
        }
        true
    }

    /// Returns false if the worker was stopped or the consumer is gone.
    async fn emit(&self, rows: Vec<ListRow>, error: Option<AppError>) -> bool {
        let snapshot = DirSnapshot {
            path: Arc::clone(&self.path),
            epoch: self.epoch,
            rows,
            error,
        };

        tokio::select! {
            () = self.cancel.cancelled() => false,
            res = self.out_tx.send(snapshot) => res.is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::fuzzy_filter::ExternalFilter;
    use crate::tasks::fuzzy_filter::testing::SubstringMatcher;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc::Receiver;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("alpha.rs"), vec![0u8; 50]).unwrap();
        fs::write(tmp.path().join("Beta.txt"), vec![0u8; 5]).unwrap();
        fs::write(tmp.path().join("gamma.rs"), vec![0u8; 500]).unwrap();
        fs::create_dir(tmp.path().join("delta")).unwrap();
        tmp
    }

    fn spawn(path: &Path, initial: &[&str]) -> (DirWorker, Receiver<DirSnapshot>) {
        spawn_with(path, initial, Arc::new(SubstringMatcher))
    }

    fn spawn_with(
        path: &Path,
        initial: &[&str],
        matcher: Arc<dyn NameMatcher>,
    ) -> (DirWorker, Receiver<DirSnapshot>) {
        let (tx, rx) = mpsc::channel(1);
        let worker = DirWorker::start(path.to_path_buf(), 7, DirCommand::parse_all(initial).unwrap(), tx, matcher);
        (worker, rx)
    }

    fn cmds(tokens: &[&str]) -> Vec<DirCommand> {
        DirCommand::parse_all(tokens).unwrap()
    }

    async fn next(rx: &mut Receiver<DirSnapshot>) -> DirSnapshot {
        timeout(WAIT, rx.recv()).await.unwrap().unwrap()
    }

    fn names(snap: &DirSnapshot) -> Vec<&str> {
        snap.rows.iter().map(ListRow::name).collect()
    }

    #[tokio::test]
    async fn first_snapshot_is_name_sorted() {
        let tmp = fixture();
        let (worker, mut rx) = spawn(tmp.path(), &[]);

        let snap = next(&mut rx).await;

        assert_eq!(*snap.path, tmp.path());
        assert_eq!(snap.epoch, worker.epoch());
        assert!(snap.error.is_none());
        assert_eq!(names(&snap), vec!["alpha.rs", "Beta.txt", "delta", "gamma.rs"]);
    }

    #[tokio::test]
    async fn batches_apply_in_order() {
        let tmp = fixture();
        let (worker, mut rx) = spawn(tmp.path(), &["perm"]);

        let first = next(&mut rx).await;
        assert!(first.rows[0].columns.perm);

        // Queued back to back while the consumer is not reading.
        assert!(worker.submit(cmds(&["sort_by_size", "hsize"])));
        assert!(worker.submit(cmds(&["sort_by_name"])));
        assert!(worker.submit(Vec::new()));

        let by_size = next(&mut rx).await;
        let sizes: Vec<u64> = by_size.rows.iter().map(|r| r.entry.size).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert!(by_size.rows[0].columns.perm);

        let by_name = next(&mut rx).await;
        assert_eq!(names(&by_name), names(&first));

        // Empty batch still yields a snapshot.
        let unchanged = next(&mut rx).await;
        assert_eq!(names(&unchanged), names(&by_name));
    }

    #[tokio::test]
    async fn filter_keeps_listing_order_and_clears() {
        let tmp = fixture();
        let (worker, mut rx) = spawn(tmp.path(), &["sort_by_size"]);
        let full = next(&mut rx).await;

        worker.submit(cmds(&["filter .rs"]));
        let filtered = next(&mut rx).await;
        assert_eq!(names(&filtered), vec!["alpha.rs", "gamma.rs"]);

        worker.submit(cmds(&["filter xyz"]));
        assert!(next(&mut rx).await.rows.is_empty());

        worker.submit(cmds(&["filter"]));
        assert_eq!(next(&mut rx).await.rows.len(), full.rows.len());
    }

    #[tokio::test]
    async fn broken_filter_fails_open() {
        let tmp = fixture();
        let (worker, mut rx) = spawn(tmp.path(), &[]);
        let full = next(&mut rx).await;

        worker.submit(cmds(&["filter alpha", "filter !"]));

        assert_eq!(next(&mut rx).await.rows.len(), full.rows.len());
    }

    #[tokio::test]
    async fn filter_tool_dying_mid_output_fails_open() {
        let tmp = fixture();
        let tool = ExternalFilter::new(
            "sh",
            vec!["-c".into(), r"cat >/dev/null; echo alpha.rs; printf '\377\n'; echo gamma.rs".into()],
        );
        let (worker, mut rx) = spawn_with(tmp.path(), &[], Arc::new(tool));
        let full = next(&mut rx).await;

        worker.submit(cmds(&["filter rs"]));

        let snap = next(&mut rx).await;
        assert!(snap.error.is_none());
        assert_eq!(snap.rows.len(), full.rows.len());
    }

    #[tokio::test]
    async fn reset_info_keeps_sort() {
        let tmp = fixture();
        let (worker, mut rx) = spawn(tmp.path(), &["sort_by_size", "perm", "mtime", "filter alpha"]);
        let configured = next(&mut rx).await;
        assert_eq!(names(&configured), vec!["alpha.rs"]);
        assert!(!configured.rows[0].columns.is_plain());

        worker.submit(cmds(&["reset_info"]));
        let reset = next(&mut rx).await;

        assert_eq!(reset.rows.len(), 4);
        assert!(reset.rows.iter().all(|r| r.columns.is_plain()));
        let sizes: Vec<u64> = reset.rows.iter().filter(|r| !r.entry.is_dir).map(|r| r.entry.size).collect();
        assert_eq!(sizes, vec![5, 50, 500]);
    }

    #[tokio::test]
    async fn scan_error_then_inert() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("gone");
        let (worker, mut rx) = spawn(&gone, &[]);

        let snap = next(&mut rx).await;
        assert!(matches!(snap.error, Some(AppError::Scan { .. })));
        assert!(snap.rows.is_empty());

        assert!(worker.submit(cmds(&["perm"])));
        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let tmp = fixture();
        let (mut worker, mut rx) = spawn(tmp.path(), &[]);
        next(&mut rx).await;

        worker.stop();
        worker.stop();

        assert!(worker.is_stopped());
        assert!(!worker.submit(cmds(&["perm"])));
        timeout(WAIT, async {
            while !worker.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn stop_releases_a_blocked_sender() {
        let tmp = fixture();
        let (tx, _rx) = mpsc::channel(1);
        // Fill the only slot so the worker parks on its first send.
        tx.try_send(DirSnapshot {
            path: Arc::new(PathBuf::from("/x")),
            epoch: 0,
            rows: Vec::new(),
            error: None,
        })
        .unwrap();

        let mut worker = DirWorker::start(tmp.path().to_path_buf(), 1, Vec::new(), tx, Arc::new(SubstringMatcher));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!worker.is_finished());

        worker.stop();
        timeout(WAIT, async {
            while !worker.is_finished() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }
}
