//! ``src/tasks/worker_registry.rs``
//! ============================================================================
//! # Worker Registry: the set of live directory workers
//!
//! At most one worker per path. Every worker started here shares one
//! snapshot channel; the receiving end is handed out once, on construction.
//! Each start gets a fresh epoch so a snapshot can be traced back to the
//! exact worker instance that produced it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info};

use crate::model::dir_command::DirCommand;
use crate::tasks::dir_worker::{DirSnapshot, DirWorker};
use crate::tasks::fuzzy_filter::NameMatcher;

/// Capacity of the shared snapshot channel.
pub const SNAPSHOT_BUFFER: usize = 1;

#[derive(Debug)]
pub struct DirRegistry {
    workers: AHashMap<PathBuf, DirWorker>,
    next_epoch: u64,
    out_tx: Sender<DirSnapshot>,
    matcher: Arc<dyn NameMatcher>,
}

impl DirRegistry {
    #[must_use]
    pub fn new(matcher: Arc<dyn NameMatcher>) -> (Self, Receiver<DirSnapshot>) {
        let (out_tx, out_rx) = mpsc::channel::<DirSnapshot>(SNAPSHOT_BUFFER);

        let registry = Self {
            workers: AHashMap::new(),
            next_epoch: 1,
            out_tx,
            matcher,
        };
        (registry, out_rx)
    }

    /// Starts a worker for `path` unless one is already running. Returns
    /// whether a worker was started.
    pub fn add(&mut self, path: &Path, initial: Vec<DirCommand>) -> bool {
        if self.workers.contains_key(path) {
            return false;
        }

        let epoch: u64 = self.next_epoch;
        self.next_epoch += 1;

        let worker = DirWorker::start(
            path.to_path_buf(),
            epoch,
            initial,
            self.out_tx.clone(),
            Arc::clone(&self.matcher),
        );
        self.workers.insert(path.to_path_buf(), worker);

        info!(path = %path.display(), epoch, "watching directory");
        true
    }

    /// Stops and forgets the worker for `path`. Unknown paths are a no-op.
    pub fn remove(&mut self, path: &Path) -> bool {
        match self.workers.remove(path) {
            Some(mut worker) => {
                worker.stop();
                debug!(path = %path.display(), "worker removed");
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&DirWorker> {
        self.workers.get(path)
    }

    /// Queues `batch` on the worker for `path`, if any.
    pub fn submit(&self, path: &Path, batch: Vec<DirCommand>) -> bool {
        self.get(path).is_some_and(|w: &DirWorker| w.submit(batch))
    }

    /// True when the worker that produced epoch `epoch` for `path` is still
    /// the registered one.
    #[must_use]
    pub fn is_live(&self, path: &Path, epoch: u64) -> bool {
        self.get(path).is_some_and(|w: &DirWorker| w.epoch() == epoch)
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.workers.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.workers.keys().map(PathBuf::as_path)
    }

    pub fn shutdown(&mut self) {
        for (_, mut worker) in self.workers.drain() {
            worker.stop();
        }
    }
}

impl Drop for DirRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
