//! `src/fs/working_dir.rs`
//!
//! Process working-directory changes behind a trait so the navigator can be
//! driven in tests without touching the real process cwd.

use std::fmt;
use std::io;
use std::path::Path;

pub trait WorkingDir: Send + fmt::Debug {
    fn change_to(&self, path: &Path) -> io::Result<()>;
}

/// Changes the real process working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessWorkingDir;

impl WorkingDir for ProcessWorkingDir {
    fn change_to(&self, path: &Path) -> io::Result<()> {
        std::env::set_current_dir(path)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Records every change; refuses paths listed in `denied`.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingWorkingDir {
        pub visited: Arc<Mutex<Vec<PathBuf>>>,
        pub denied: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl RecordingWorkingDir {
        pub fn deny(&self, path: &Path) {
            self.denied.lock().unwrap().push(path.to_path_buf());
        }

        pub fn last(&self) -> Option<PathBuf> {
            self.visited.lock().unwrap().last().cloned()
        }
    }

    impl WorkingDir for RecordingWorkingDir {
        fn change_to(&self, path: &Path) -> io::Result<()> {
            if self.denied.lock().unwrap().iter().any(|d| d == path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.visited.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }
}
