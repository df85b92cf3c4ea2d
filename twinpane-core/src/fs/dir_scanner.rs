//! ``src/fs/dir_scanner.rs``
//!
//! # `Directory Scanner`: Asynchronous Filesystem Listing
//!
//! Non-recursive listing of one directory into `FileEntry` values, plus the
//! two orderings a directory worker can apply to them.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::fs::{self, ReadDir};
use tracing::debug;

use crate::error::AppError;
use crate::fs::object_info::FileEntry;
use crate::model::dir_command::SortMode;

/// Scans `path` and returns its entries in default (name) order.
///
/// Entries that vanish between `readdir` and `lstat` are skipped. Hidden
/// files are not special-cased.
pub async fn scan_dir(path: &Path) -> Result<Vec<FileEntry>, AppError> {
    let start_time: Instant = Instant::now();

    let mut entries: Vec<FileEntry> = Vec::new();
    let mut read_dir: ReadDir = fs::read_dir(path)
        .await
        .map_err(|e| AppError::scan_failed(path, e))?;

    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| AppError::scan_failed(path, e))?
    {
        let entry_path: PathBuf = entry.path();

        match FileEntry::from_path_async(&entry_path).await {
            Ok(info) => entries.push(info),

            Err(e) => {
                debug!("Skipping {:?}: {}", entry_path, e);
            }
        }
    }

    sort_by_name(&mut entries);

    let duration: Duration = start_time.elapsed();
    debug!(
        entries = entries.len(),
        "Scanned {} in {:?}",
        path.display(),
        duration
    );

    Ok(entries)
}

/// Case-insensitive name order: code points compared after lowercasing, a
/// shorter common prefix first. Names that only differ in case fall back to
/// raw byte order so the order stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

pub fn sort_by_name<E: Borrow<FileEntry>>(entries: &mut [E]) {
    entries.sort_by(|a: &E, b: &E| compare_names(&entry(a).name, &entry(b).name));
}

/// Non-decreasing size; stable, so equal sizes keep their current order.
pub fn sort_by_size<E: Borrow<FileEntry>>(entries: &mut [E]) {
    entries.sort_by_key(|e: &E| entry(e).size);
}

fn entry<E: Borrow<FileEntry>>(e: &E) -> &FileEntry {
    <E as Borrow<FileEntry>>::borrow(e)
}

pub fn sort_entries<E: Borrow<FileEntry>>(entries: &mut [E], mode: SortMode) {
    match mode {
        SortMode::Name => sort_by_name(entries),
        SortMode::Size => sort_by_size(entries),
    }
}
