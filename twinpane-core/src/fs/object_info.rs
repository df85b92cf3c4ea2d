//! `src/fs/object_info.rs`
//! ============================================================
//! `FileEntry`: one directory entry as seen by a single scan.
//!
//! Entries are immutable once built and shared through `Arc` between the
//! worker that scanned them and the rows it hands to the UI. A rescan builds
//! a fresh set; nothing is patched in place.

use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytesize::ByteSize;
use chrono::{DateTime, Local, TimeZone};
use compact_str::CompactString;
use tokio::fs as tokio_fs;

use crate::fs::owner;

/// `ctime(3)` layout, e.g. `Mon Jan  2 15:04:05 2006`.
pub const ANSIC_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

// ------------------------------------------------------------
// LinkState: symlink resolution at scan time.
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Not a symlink.
    #[default]
    None,
    /// Symlink whose target exists.
    Resolved,
    /// Symlink whose target is missing or unreadable.
    Broken,
}

/// Which of the three timestamps to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    Access,
    Change,
    Modify,
}

/// Semantic class of one permission-string character, used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermClass {
    Directory,
    Read,
    Write,
    Execute,
    Other,
}

impl PermClass {
    #[must_use]
    pub const fn of(ch: char) -> Self {
        match ch {
            'd' => Self::Directory,
            'r' => Self::Read,
            'w' => Self::Write,
            'x' => Self::Execute,
            _ => Self::Other,
        }
    }
}

// ------------------------------------------------------------
// FileEntry
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    // Absolute path (directory path joined with the entry name)
    pub path: Arc<PathBuf>,

    // Byte length as reported by lstat
    pub size: u64,

    pub accessed: SystemTime,
    pub changed: SystemTime,
    pub modified: SystemTime,

    // File or directory name - rendering and sorting hot path
    pub name: CompactString,

    // Raw readlink result, symlinks only
    pub link_target: Option<PathBuf>,

    // st_mode, file type bits included
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u64,

    pub link_state: LinkState,

    // Entry itself is a directory (lstat)
    pub is_dir: bool,

    // Symlink that resolves to a directory
    pub target_is_dir: bool,
}

impl FileEntry {
    /// Synchronous constructor.
    pub fn from_path_sync(path: &Path) -> std::io::Result<Self> {
        let meta: Metadata = fs::symlink_metadata(path)?;

        let (link_target, link_state, target_is_dir) = if meta.file_type().is_symlink() {
            let target = fs::read_link(path).ok();
            match fs::metadata(path) {
                Ok(followed) => (target, LinkState::Resolved, followed.is_dir()),
                Err(_) => (target, LinkState::Broken, false),
            }
        } else {
            (None, LinkState::None, false)
        };

        Ok(Self::from_meta(path, &meta, link_target, link_state, target_is_dir))
    }

    /// Asynchronous constructor for worker tasks.
    pub async fn from_path_async(path: &Path) -> std::io::Result<Self> {
        let meta: Metadata = tokio_fs::symlink_metadata(path).await?;

        let (link_target, link_state, target_is_dir) = if meta.file_type().is_symlink() {
            let target = tokio_fs::read_link(path).await.ok();
            match tokio_fs::metadata(path).await {
                Ok(followed) => (target, LinkState::Resolved, followed.is_dir()),
                Err(_) => (target, LinkState::Broken, false),
            }
        } else {
            (None, LinkState::None, false)
        };

        Ok(Self::from_meta(path, &meta, link_target, link_state, target_is_dir))
    }

    fn from_meta(
        path: &Path,
        meta: &Metadata,
        link_target: Option<PathBuf>,
        link_state: LinkState,
        target_is_dir: bool,
    ) -> Self {
        let name: CompactString =
            CompactString::new(path.file_name().map(OsStr::to_string_lossy).unwrap_or_default());

        Self {
            path: Arc::new(path.to_path_buf()),
            size: meta.size(),
            accessed: unix_time(meta.atime(), meta.atime_nsec()),
            changed: unix_time(meta.ctime(), meta.ctime_nsec()),
            modified: unix_time(meta.mtime(), meta.mtime_nsec()),
            name,
            link_target,
            mode: meta.mode(),
            uid: meta.uid(),
            gid: meta.gid(),
            nlink: meta.nlink(),
            link_state,
            is_dir: meta.is_dir(),
            target_is_dir,
        }
    }

    /// Directories and symlinks that resolve to one.
    #[inline]
    #[must_use]
    pub fn is_enterable(&self) -> bool {
        self.is_dir || (self.link_state == LinkState::Resolved && self.target_is_dir)
    }

    #[inline]
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        !matches!(self.link_state, LinkState::None)
    }

    #[must_use]
    pub const fn is_executable(&self) -> bool {
        !self.is_dir && self.mode & 0o111 != 0
    }

    /// `ls -l` style mode string, e.g. `drwxr-xr-x`.
    #[must_use]
    pub fn permission_string(&self) -> String {
        let kind = match self.mode & libc::S_IFMT {
            libc::S_IFDIR => 'd',
            libc::S_IFLNK => 'l',
            libc::S_IFIFO => 'p',
            libc::S_IFSOCK => 's',
            libc::S_IFCHR => 'c',
            libc::S_IFBLK => 'b',
            _ => '-',
        };

        let bit = |mask: u32, ch: char| if self.mode & mask != 0 { ch } else { '-' };
        let special = |exec: u32, flag: u32, set: char| match (self.mode & exec != 0, self.mode & flag != 0) {
            (true, true) => set,
            (false, true) => set.to_ascii_uppercase(),
            (true, false) => 'x',
            (false, false) => '-',
        };

        [
            kind,
            bit(0o400, 'r'),
            bit(0o200, 'w'),
            special(0o100, 0o4000, 's'),
            bit(0o040, 'r'),
            bit(0o020, 'w'),
            special(0o010, 0o2000, 's'),
            bit(0o004, 'r'),
            bit(0o002, 'w'),
            special(0o001, 0o1000, 't'),
        ]
        .into_iter()
        .collect()
    }

    // Human-readable size string; directories have none.
    #[must_use]
    pub fn size_human(&self) -> String {
        if self.is_dir {
            "-".to_string()
        } else {
            ByteSize::b(self.size).to_string()
        }
    }

    #[must_use]
    pub fn user_name(&self) -> String {
        owner::user_name(self.uid).unwrap_or_else(|| self.uid.to_string())
    }

    #[must_use]
    pub fn group_name(&self) -> String {
        owner::group_name(self.gid).unwrap_or_else(|| self.gid.to_string())
    }

    #[must_use]
    pub const fn time(&self, kind: TimeKind) -> SystemTime {
        match kind {
            TimeKind::Access => self.accessed,
            TimeKind::Change => self.changed,
            TimeKind::Modify => self.modified,
        }
    }

    #[expect(clippy::cast_possible_wrap, reason = "Expected")]
    #[must_use]
    pub fn format_time(&self, kind: TimeKind, fmt: &str) -> String {
        let dur: Duration = self
            .time(kind)
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| -> Duration { Duration::from_secs(0) });

        let dt: DateTime<Local> = Local
            .timestamp_opt(dur.as_secs() as i64, dur.subsec_nanos())
            .single()
            .unwrap_or_else(|| -> DateTime<Local> { Local::now() });

        dt.format(fmt).to_string()
    }

    /// One-line summary for the status line.
    #[must_use]
    pub fn info_line(&self) -> String {
        let link = self
            .link_target
            .as_ref()
            .map(|t| format!(" -> {}", t.display()))
            .unwrap_or_default();

        format!(
            "{} {} {} {} {:>4} {}{}",
            self.permission_string(),
            self.nlink,
            self.user_name(),
            self.group_name(),
            self.size_human(),
            self.format_time(TimeKind::Modify, ANSIC_FORMAT),
            link,
        )
    }
}

fn unix_time(secs: i64, nsecs: i64) -> SystemTime {
    let secs = u64::try_from(secs).unwrap_or(0);
    let nsecs = u32::try_from(nsecs.clamp(0, 999_999_999)).unwrap_or(0);

    UNIX_EPOCH + Duration::new(secs, nsecs)
}
