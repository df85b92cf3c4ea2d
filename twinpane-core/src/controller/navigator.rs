//! src/controller/navigator.rs
//! ============================================================================
//! # Navigator: the two panes and how they move through the tree
//!
//! The current pane always shows `cwd` and the parent pane `parent(cwd)`
//! (empty at `/`). Each shown directory has a worker in the registry; moving
//! in or out starts the one that becomes adjacent and stops the one that no
//! longer is. Snapshots are matched back to a pane by path and worker epoch,
//! anything else is stale and dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashSet;
use tracing::{debug, info, trace};

use crate::error::AppError;
use crate::fs::object_info::FileEntry;
use crate::fs::working_dir::WorkingDir;
use crate::model::dir_command::DirCommand;
use crate::model::pane::PaneState;
use crate::model::view_state::{ViewState, ViewStateCache};
use crate::tasks::dir_worker::DirSnapshot;
use crate::tasks::worker_registry::DirRegistry;

/// Which on-screen list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneSide {
    Parent,
    Current,
}

/// Where a snapshot landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Parent,
    Stale,
}

#[derive(Debug)]
pub struct Navigator {
    cwd: PathBuf,
    parent: Option<PathBuf>,

    // First snapshot since entering restores the cursor from the cache
    cwd_inited: bool,
    parent_inited: bool,

    current: PaneState,
    parent_pane: PaneState,

    view_states: ViewStateCache,
    marks: AHashSet<PathBuf>,

    // Columns forced on every directory that becomes current
    dir_info: Option<Vec<DirCommand>>,

    registry: DirRegistry,
    working_dir: Box<dyn WorkingDir>,
}

impl Navigator {
    /// Starts workers for `cwd` and its parent.
    pub fn new(cwd: PathBuf, mut registry: DirRegistry, working_dir: Box<dyn WorkingDir>) -> Self {
        registry.add(&cwd, Vec::new());

        let parent: Option<PathBuf> = cwd.parent().map(Path::to_path_buf);
        if let Some(parent) = &parent {
            registry.add(parent, Vec::new());
        }

        info!(cwd = %cwd.display(), "navigator started");

        Self {
            view_states: ViewStateCache::seeded(&cwd),
            cwd,
            parent,
            cwd_inited: false,
            parent_inited: false,
            current: PaneState::default(),
            parent_pane: PaneState::default(),
            marks: AHashSet::new(),
            dir_info: None,
            registry,
            working_dir,
        }
    }

    // ------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Path> {
        self.parent.as_deref()
    }

    #[must_use]
    pub const fn current_pane(&self) -> &PaneState {
        &self.current
    }

    #[must_use]
    pub const fn parent_pane(&self) -> &PaneState {
        &self.parent_pane
    }

    #[must_use]
    pub fn pane(&self, side: PaneSide) -> &PaneState {
        match side {
            PaneSide::Parent => &self.parent_pane,
            PaneSide::Current => &self.current,
        }
    }

    #[must_use]
    pub fn selected_entry(&self) -> Option<&Arc<FileEntry>> {
        self.current.selected_entry()
    }

    #[must_use]
    pub const fn registry(&self) -> &DirRegistry {
        &self.registry
    }

    #[must_use]
    pub fn dir_info(&self) -> Option<&[DirCommand]> {
        self.dir_info.as_deref()
    }

    #[must_use]
    pub const fn view_states(&self) -> &ViewStateCache {
        &self.view_states
    }

    pub fn set_heights(&mut self, parent: usize, current: usize) {
        self.parent_pane.set_height(parent);
        self.current.set_height(current);
    }

    // ------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------

    /// Descends into the selected entry. `Ok(false)` when it is not a
    /// directory; on a refused chdir nothing changes.
    pub fn enter(&mut self) -> Result<bool, AppError> {
        let Some(entry) = self.current.selected_entry() else {
            return Ok(false);
        };
        if !entry.is_enterable() {
            return Ok(false);
        }
        let new_cwd: PathBuf = entry.path.as_ref().clone();

        self.save_view_state();

        self.working_dir
            .change_to(&new_cwd)
            .map_err(|e| AppError::navigation_failed(&new_cwd, e.to_string()))?;

        self.registry
            .add(&new_cwd, self.dir_info.clone().unwrap_or_default());
        if let Some(old_parent) = self.parent.take() {
            self.registry.remove(&old_parent);
        }

        let old_cwd: PathBuf = std::mem::replace(&mut self.cwd, new_cwd);
        self.parent_inited = self.cwd_inited;
        self.cwd_inited = false;
        self.parent_pane.take_content(&mut self.current);

        if self.dir_info.is_some() {
            self.registry.submit(&old_cwd, vec![DirCommand::ResetInfo]);
        }
        self.parent = Some(old_cwd);

        info!(cwd = %self.cwd.display(), "entered");
        Ok(true)
    }

    /// Ascends to the parent. `Ok(false)` at `/`; on a refused chdir nothing
    /// changes.
    pub fn leave(&mut self) -> Result<bool, AppError> {
        let Some(parent) = self.parent.clone() else {
            return Ok(false);
        };

        self.save_view_state();

        self.working_dir
            .change_to(&parent)
            .map_err(|e| AppError::navigation_failed(&parent, e.to_string()))?;

        self.registry.remove(&self.cwd);
        self.cwd = parent;
        self.cwd_inited = self.parent_inited;
        self.parent_inited = false;
        self.current.take_content(&mut self.parent_pane);

        self.parent = self.cwd.parent().map(Path::to_path_buf);
        match &self.parent {
            Some(grandparent) => {
                self.registry.add(grandparent, Vec::new());
            }
            None => self.parent_pane.clear(),
        }

        if let Some(cmds) = &self.dir_info {
            self.registry.submit(&self.cwd, cmds.clone());
        }

        info!(cwd = %self.cwd.display(), "left");
        Ok(true)
    }

    fn save_view_state(&mut self) {
        if let Some(entry) = self.current.selected_entry() {
            let state = ViewState {
                selected: entry.name.clone(),
                offset: self.current.distance_from_top(),
            };
            trace!(path = %self.cwd.display(), ?state, "view state saved");
            self.view_states.save(&self.cwd, state);
        }
    }

    // ------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------

    /// Puts a worker snapshot into the pane it belongs to. Error snapshots
    /// empty their pane and come back as `Err` for the warning banner.
    pub fn apply_snapshot(&mut self, snap: DirSnapshot) -> Result<Applied, AppError> {
        let DirSnapshot {
            path,
            epoch,
            rows,
            error,
        } = snap;

        if !self.registry.is_live(&path, epoch) {
            trace!(path = %path.display(), epoch, "stale snapshot dropped");
            return Ok(Applied::Stale);
        }

        let applied = if *path == self.cwd {
            self.current.set_rows(rows);
            if !self.cwd_inited {
                self.cwd_inited = true;
                match self.view_states.get(&self.cwd) {
                    Some(state) => self.current.restore(Some(&state.selected), state.offset),
                    None => self.current.restore(None, 0),
                }
            }
            Applied::Current
        } else if self.parent.as_deref() == Some(path.as_path()) {
            self.parent_pane.set_rows(rows);
            self.parent_inited = true;
            let idx = self
                .cwd
                .file_name()
                .and_then(|name| self.parent_pane.position_of(&name.to_string_lossy()))
                .unwrap_or(0);
            self.parent_pane.select(idx);
            Applied::Parent
        } else {
            trace!(path = %path.display(), "snapshot for a hidden directory dropped");
            Applied::Stale
        };

        match error {
            Some(e) => Err(e),
            None => Ok(applied),
        }
    }

    // ------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------

    pub fn next(&mut self) {
        self.current.move_by(1);
    }

    pub fn prev(&mut self) {
        self.current.move_by(-1);
    }

    pub fn top(&mut self) {
        self.current.top();
    }

    pub fn bottom(&mut self) {
        self.current.bottom();
    }

    pub fn page(&mut self, factor: f64) {
        self.current.page(factor);
    }

    /// Scrolls a pane. Dragging the parent pane's selection onto another
    /// entry moves into that sibling.
    pub fn scroll(&mut self, rows: isize, side: PaneSide) -> Result<(), AppError> {
        match side {
            PaneSide::Current => {
                self.current.scroll_by(rows);
            }
            PaneSide::Parent => {
                if self.parent_pane.scroll_by(rows) {
                    self.reenter_from_parent()?;
                }
            }
        }
        Ok(())
    }

    /// Mouse select: `row` lines below the top of the pane.
    pub fn select_at(&mut self, side: PaneSide, row: usize) -> Result<(), AppError> {
        match side {
            PaneSide::Current => self.current.select_visible(row),
            PaneSide::Parent => {
                self.parent_pane.select_visible(row);
                self.reenter_from_parent()?;
            }
        }
        Ok(())
    }

    /// Mouse go-to: select then enter (current pane) or leave (parent pane).
    pub fn goto_at(&mut self, side: PaneSide, row: usize) -> Result<(), AppError> {
        match side {
            PaneSide::Current => {
                self.current.select_visible(row);
                self.enter()?;
            }
            PaneSide::Parent => {
                self.parent_pane.select_visible(row);
                self.leave()?;
            }
        }
        Ok(())
    }

    // Out, then into whatever the parent pane now selects.
    fn reenter_from_parent(&mut self) -> Result<(), AppError> {
        if self.leave()? {
            self.enter()?;
        }
        Ok(())
    }

    // ------------------------------------------------------------
    // Marks
    // ------------------------------------------------------------

    pub fn mark(&mut self) {
        if let Some(entry) = self.current.selected_entry() {
            self.marks.insert(entry.path.as_ref().clone());
        }
    }

    pub fn unmark(&mut self) {
        if let Some(entry) = self.current.selected_entry() {
            self.marks.remove(entry.path.as_path());
        }
    }

    pub fn toggle_mark(&mut self) {
        if let Some(entry) = self.current.selected_entry() {
            let path: &Path = entry.path.as_path();
            if !self.marks.remove(path) {
                self.marks.insert(path.to_path_buf());
            }
        }
    }

    pub fn clear_marks(&mut self) {
        self.marks.clear();
    }

    #[must_use]
    pub fn is_marked(&self, path: &Path) -> bool {
        self.marks.contains(path)
    }

    #[must_use]
    pub const fn mark_set(&self) -> &AHashSet<PathBuf> {
        &self.marks
    }

    /// Marked paths, sorted.
    #[must_use]
    pub fn marks(&self) -> Vec<PathBuf> {
        let mut marks: Vec<PathBuf> = self.marks.iter().cloned().collect();
        marks.sort();
        marks
    }

    // ------------------------------------------------------------
    // Directory commands
    // ------------------------------------------------------------

    /// Sends `cmds` to the current directory's worker.
    pub fn dir_do(&self, cmds: Vec<DirCommand>) {
        if !self.registry.submit(&self.cwd, cmds) {
            debug!(cwd = %self.cwd.display(), "no worker for current directory");
        }
    }

    pub fn filter(&self, query: &str) {
        self.dir_do(vec![DirCommand::Filter(query.to_string())]);
    }

    /// Switches the per-directory info columns on (with `cmds`) or off.
    pub fn toggle_dir_info(&mut self, cmds: Vec<DirCommand>) {
        self.dir_info = match self.dir_info.take() {
            Some(_) => None,
            None => Some(cmds),
        };

        let mut batch: Vec<DirCommand> = vec![DirCommand::ResetInfo];
        batch.extend(self.dir_info.iter().flatten().cloned());
        self.dir_do(batch);
    }

    pub fn shutdown(&mut self) {
        self.registry.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::working_dir::testing::RecordingWorkingDir;
    use crate::model::list_row::ListRow;
    use crate::model::pane::testing::rows;
    use crate::tasks::fuzzy_filter::testing::SubstringMatcher;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc::Receiver;
    use tokio::time::timeout;

    /// tmp/
    ///   a/
    ///     b/
    ///     c.txt
    ///     d/
    ///       e.txt
    ///   z.txt
    fn tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        fs::create_dir_all(a.join("b")).unwrap();
        fs::create_dir_all(a.join("d")).unwrap();
        fs::write(a.join("c.txt"), b"0123456789").unwrap();
        fs::write(a.join("d").join("e.txt"), b"e").unwrap();
        fs::write(tmp.path().join("z.txt"), b"z").unwrap();
        tmp
    }

    fn navigator(cwd: &Path) -> (Navigator, Receiver<DirSnapshot>, RecordingWorkingDir) {
        let (registry, rx) = DirRegistry::new(Arc::new(SubstringMatcher));
        let wd = RecordingWorkingDir::default();
        let mut nav = Navigator::new(cwd.to_path_buf(), registry, Box::new(wd.clone()));
        nav.set_heights(10, 10);
        (nav, rx, wd)
    }

    /// Applies snapshots until `done` holds.
    async fn settle<F>(nav: &mut Navigator, rx: &mut Receiver<DirSnapshot>, done: F)
    where
        F: Fn(&Navigator) -> bool,
    {
        timeout(Duration::from_secs(5), async {
            while !done(nav) {
                let snap = rx.recv().await.unwrap();
                let _ = nav.apply_snapshot(snap);
            }
        })
        .await
        .unwrap();
    }

    fn names(pane: &PaneState) -> Vec<&str> {
        pane.rows().iter().map(ListRow::name).collect()
    }

    fn selected_name(pane: &PaneState) -> Option<&str> {
        pane.selected_row().map(ListRow::name)
    }

    fn both_loaded(nav: &Navigator) -> bool {
        !nav.current_pane().is_empty() && nav.parent().is_none_or(|_| !nav.parent_pane().is_empty())
    }

    fn select(nav: &mut Navigator, name: &str) {
        let idx = nav.current_pane().position_of(name).unwrap();
        nav.current.select(idx);
    }

    #[tokio::test]
    async fn startup_loads_both_panes() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, _wd) = navigator(&a);

        settle(&mut nav, &mut rx, both_loaded).await;

        assert_eq!(names(nav.current_pane()), vec!["b", "c.txt", "d"]);
        assert_eq!(selected_name(nav.parent_pane()), Some("a"));
        assert_eq!(nav.registry().len(), 2);
    }

    #[tokio::test]
    async fn enter_then_leave_restores_selection() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, wd) = navigator(&a);
        settle(&mut nav, &mut rx, both_loaded).await;

        select(&mut nav, "d");
        assert!(nav.enter().unwrap());
        assert_eq!(nav.cwd(), a.join("d"));
        assert_eq!(nav.parent(), Some(a.as_path()));
        assert_eq!(wd.last(), Some(a.join("d")));
        // old current pane is reused as the parent pane
        assert_eq!(selected_name(nav.parent_pane()), Some("d"));
        assert!(!nav.registry().contains(tmp.path()));

        settle(&mut nav, &mut rx, |n| !n.current_pane().is_empty()).await;
        assert_eq!(names(nav.current_pane()), vec!["e.txt"]);

        assert!(nav.leave().unwrap());
        assert_eq!(nav.cwd(), a);
        assert_eq!(selected_name(nav.current_pane()), Some("d"));
        assert!(!nav.registry().contains(&a.join("d")));
        assert!(nav.registry().contains(tmp.path()));
    }

    #[tokio::test]
    async fn selection_survives_a_rescan_that_reorders() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, _wd) = navigator(&a);
        settle(&mut nav, &mut rx, both_loaded).await;

        select(&mut nav, "d");
        assert!(nav.leave().unwrap());
        settle(&mut nav, &mut rx, both_loaded).await;

        // New entries sort before "d" in /a.
        fs::write(a.join("0new"), b"").unwrap();
        fs::write(a.join("1new"), b"").unwrap();

        assert_eq!(selected_name(nav.current_pane()), Some("a"));
        assert!(nav.enter().unwrap());
        settle(&mut nav, &mut rx, |n| !n.current_pane().is_empty()).await;

        assert_eq!(names(nav.current_pane()), vec!["0new", "1new", "b", "c.txt", "d"]);
        assert_eq!(selected_name(nav.current_pane()), Some("d"));
    }

    #[tokio::test]
    async fn refused_chdir_changes_nothing() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, wd) = navigator(&a);
        settle(&mut nav, &mut rx, both_loaded).await;

        wd.deny(&a.join("b"));
        select(&mut nav, "b");

        let err = nav.enter().unwrap_err();
        assert!(matches!(err, AppError::NavigationFailed { .. }));
        assert_eq!(nav.cwd(), a);
        assert_eq!(nav.parent(), Some(tmp.path()));
        assert_eq!(names(nav.current_pane()), vec!["b", "c.txt", "d"]);
        assert_eq!(nav.registry().len(), 2);
        assert!(!nav.registry().contains(&a.join("b")));
    }

    #[tokio::test]
    async fn files_are_not_entered() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, _wd) = navigator(&a);
        settle(&mut nav, &mut rx, both_loaded).await;

        select(&mut nav, "c.txt");
        assert!(!nav.enter().unwrap());
        assert_eq!(nav.cwd(), a);
    }

    #[tokio::test]
    async fn walk_matches_the_filesystem() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, wd) = navigator(tmp.path());
        settle(&mut nav, &mut rx, both_loaded).await;

        select(&mut nav, "a");
        nav.enter().unwrap();
        settle(&mut nav, &mut rx, both_loaded).await;
        select(&mut nav, "d");
        nav.enter().unwrap();
        nav.leave().unwrap();
        settle(&mut nav, &mut rx, both_loaded).await;
        select(&mut nav, "b");
        nav.enter().unwrap();

        assert_eq!(nav.cwd(), a.join("b"));
        assert_eq!(wd.last(), Some(a.join("b")));
        assert_eq!(nav.registry().len(), 2);
    }

    #[tokio::test]
    async fn root_has_no_parent() {
        let (mut nav, mut rx, _wd) = navigator(Path::new("/"));

        assert!(nav.parent().is_none());
        assert!(!nav.leave().unwrap());
        assert_eq!(nav.registry().len(), 1);

        settle(&mut nav, &mut rx, |n| !n.current_pane().is_empty()).await;
        assert!(nav.parent_pane().is_empty());
    }

    #[tokio::test]
    async fn leaving_into_root_clears_the_parent_pane() {
        let tmp = tree();
        let top: &Path = tmp
            .path()
            .ancestors()
            .find(|p| p.parent() == Some(Path::new("/")))
            .unwrap();
        let (mut nav, mut rx, _wd) = navigator(top);
        settle(&mut nav, &mut rx, both_loaded).await;

        assert!(nav.leave().unwrap());

        assert_eq!(nav.cwd(), Path::new("/"));
        assert!(nav.parent().is_none());
        assert!(nav.parent_pane().is_empty());
        assert_eq!(
            selected_name(nav.current_pane()),
            top.file_name().and_then(|n| n.to_str())
        );
        assert_eq!(nav.registry().len(), 1);
    }

    #[tokio::test]
    async fn stale_snapshots_are_dropped() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, _wd) = navigator(&a);
        settle(&mut nav, &mut rx, both_loaded).await;
        let live = nav.registry().get(&a).unwrap().epoch();

        let wrong_epoch = DirSnapshot {
            path: Arc::new(a.clone()),
            epoch: live + 100,
            rows: rows(7),
            error: None,
        };
        let wrong_path = DirSnapshot {
            path: Arc::new(a.join("d")),
            epoch: live,
            rows: rows(7),
            error: None,
        };

        assert_eq!(nav.apply_snapshot(wrong_epoch).unwrap(), Applied::Stale);
        assert_eq!(nav.apply_snapshot(wrong_path).unwrap(), Applied::Stale);
        assert_eq!(names(nav.current_pane()), vec!["b", "c.txt", "d"]);
    }

    #[tokio::test]
    async fn error_snapshot_empties_the_pane() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, _wd) = navigator(&a);
        settle(&mut nav, &mut rx, both_loaded).await;
        let live = nav.registry().get(&a).unwrap().epoch();

        let err = nav
            .apply_snapshot(DirSnapshot {
                path: Arc::new(a.clone()),
                epoch: live,
                rows: Vec::new(),
                error: Some(AppError::scan_failed(&a, std::io::Error::other("gone"))),
            })
            .unwrap_err();

        assert!(matches!(err, AppError::Scan { .. }));
        assert!(nav.current_pane().is_empty());
    }

    #[tokio::test]
    async fn dir_info_follows_navigation() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, _wd) = navigator(&a);
        settle(&mut nav, &mut rx, both_loaded).await;

        let info = DirCommand::parse_all(["perm", "hsize"]).unwrap();
        nav.toggle_dir_info(info.clone());
        assert_eq!(nav.dir_info(), Some(info.as_slice()));
        settle(&mut nav, &mut rx, |n| n.current_pane().rows()[0].columns.perm).await;

        select(&mut nav, "d");
        nav.enter().unwrap();
        settle(&mut nav, &mut rx, |n| {
            !n.current_pane().is_empty()
                && n.current_pane().rows()[0].columns.perm
                && n.parent_pane().rows()[0].columns.is_plain()
        })
        .await;

        nav.toggle_dir_info(Vec::new());
        assert!(nav.dir_info().is_none());
        settle(&mut nav, &mut rx, |n| n.current_pane().rows()[0].columns.is_plain()).await;
    }

    #[tokio::test]
    async fn live_filter_on_current_directory() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, _wd) = navigator(&a);
        settle(&mut nav, &mut rx, both_loaded).await;

        nav.filter("txt");
        settle(&mut nav, &mut rx, |n| n.current_pane().len() == 1).await;
        assert_eq!(names(nav.current_pane()), vec!["c.txt"]);

        nav.filter("");
        settle(&mut nav, &mut rx, |n| n.current_pane().len() == 3).await;
    }

    #[tokio::test]
    async fn marks_toggle_and_sort() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, _wd) = navigator(&a);
        settle(&mut nav, &mut rx, both_loaded).await;

        select(&mut nav, "d");
        nav.toggle_mark();
        select(&mut nav, "b");
        nav.mark();
        nav.mark();
        assert_eq!(nav.marks(), vec![a.join("b"), a.join("d")]);

        nav.unmark();
        select(&mut nav, "d");
        nav.toggle_mark();
        assert!(nav.marks().is_empty());

        nav.mark();
        nav.clear_marks();
        assert!(!nav.is_marked(&a.join("d")));
    }

    #[tokio::test]
    async fn scrolling_the_parent_moves_to_a_sibling() {
        let tmp = tree();
        let a = tmp.path().join("a");
        let (mut nav, mut rx, wd) = navigator(&a.join("d"));
        settle(&mut nav, &mut rx, both_loaded).await;
        nav.set_heights(1, 10);

        // Parent pane [b, c.txt, d] shows only "d"; scrolling up one row
        // drags the selection onto c.txt, a file, so we stay in /a.
        nav.scroll(-1, PaneSide::Parent).unwrap();
        assert_eq!(nav.cwd(), a);
        assert_eq!(wd.last(), Some(a.clone()));
        // The three rows now fit the taller current pane.
        assert_eq!(nav.current_pane().offset(), 0);
        settle(&mut nav, &mut rx, both_loaded).await;

        select(&mut nav, "d");
        nav.enter().unwrap();
        settle(&mut nav, &mut rx, both_loaded).await;
        nav.set_heights(10, 10);

        // Clicking "b" in the parent pane of /a/d moves to /a/b. Rows are
        // counted from the top of the viewport.
        let parent = nav.parent_pane();
        let b_row = parent.position_of("b").unwrap() - parent.offset();
        nav.select_at(PaneSide::Parent, b_row).unwrap();
        assert_eq!(nav.cwd(), a.join("b"));
        assert_eq!(nav.parent(), Some(a.as_path()));
    }
}
