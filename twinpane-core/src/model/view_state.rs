//! src/model/view_state.rs
//!
//! Path keyed memory of where the cursor was, so re-entering a directory puts
//! the selection back on the same entry. Only the foreground loop touches it.

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Name of the selected entry.
    pub selected: CompactString,
    /// Rows between the selection and the top of the viewport.
    pub offset: usize,
}

#[derive(Debug, Default)]
pub struct ViewStateCache {
    states: AHashMap<PathBuf, ViewState>,
}

impl ViewStateCache {
    /// Seeds every ancestor of `cwd` with the child that leads to `cwd`, so
    /// walking up from the start directory lands on where we came from.
    #[must_use]
    pub fn seeded(cwd: &Path) -> Self {
        let mut states = AHashMap::new();

        if cwd.is_absolute() {
            for dir in cwd.ancestors() {
                if let (Some(parent), Some(name)) = (dir.parent(), dir.file_name()) {
                    states.insert(
                        parent.to_path_buf(),
                        ViewState {
                            selected: CompactString::new(name.to_string_lossy()),
                            offset: 0,
                        },
                    );
                }
            }
        }

        Self { states }
    }

    pub fn save(&mut self, path: &Path, state: ViewState) {
        self.states.insert(path.to_path_buf(), state);
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&ViewState> {
        self.states.get(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_remember_the_way_down() {
        let cache = ViewStateCache::seeded(Path::new("/usr/local/bin"));

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(Path::new("/")).unwrap().selected, "usr");
        assert_eq!(cache.get(Path::new("/usr")).unwrap().selected, "local");
        assert_eq!(cache.get(Path::new("/usr/local")).unwrap().selected, "bin");
        assert!(cache.get(Path::new("/usr/local/bin")).is_none());
    }

    #[test]
    fn root_and_relative_seed_nothing() {
        assert!(ViewStateCache::seeded(Path::new("/")).is_empty());
        assert!(ViewStateCache::seeded(Path::new("rel/dir")).is_empty());
    }

    #[test]
    fn save_overwrites() {
        let mut cache = ViewStateCache::seeded(Path::new("/a/b"));
        cache.save(
            Path::new("/a"),
            ViewState {
                selected: "c".into(),
                offset: 4,
            },
        );

        let state = cache.get(Path::new("/a")).unwrap();
        assert_eq!(state.selected, "c");
        assert_eq!(state.offset, 4);
    }
}
