use glob::Pattern;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Error;
use crate::events::{Event, EventSink};
use crate::scanner::FileRecord;

/// Total size of every regular file below `dir`. Symlinks are neither
/// followed nor counted. Unreadable entries are reported and skipped.
pub fn tree_size(dir: &Path, sink: &dyn EventSink) -> u64 {
    let mut total = 0u64;

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                sink.emit(inaccessible(err.path().unwrap_or(dir), &err));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => total += metadata.len(),
            Err(err) => sink.emit(inaccessible(entry.path(), &err)),
        }
    }

    total
}

/// Regular files directly inside `dir`, sorted by name.
///
/// Failing to read `dir` itself is an error; a file whose size cannot be read
/// is reported and left out.
pub fn top_level_files(dir: &Path, sink: &dyn EventSink) -> io::Result<Vec<FileRecord>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match fs::symlink_metadata(&path) {
            Ok(metadata) => records.push(FileRecord::new(path, metadata.len())),
            Err(err) => sink.emit(inaccessible(&path, &err)),
        }
    }
    Ok(records)
}

/// Every regular file at any depth below `root`, in sorted walk order.
/// Symlinks are skipped and unreadable entries are reported and left out.
pub fn files_under(root: &Path, sink: &dyn EventSink) -> Vec<FileRecord> {
    let mut records = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                sink.emit(inaccessible(err.path().unwrap_or(root), &err));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => records.push(FileRecord::new(entry.into_path(), metadata.len())),
            Err(err) => sink.emit(inaccessible(entry.path(), &err)),
        }
    }

    records
}

/// Recursively gather every file under `root` whose name matches `matcher`.
///
/// Downstream consumers key on file name alone, so a name seen twice anywhere
/// in the tree aborts the scan with [`Error::DuplicateFileName`]. The walk is
/// sorted by file name, which makes the returned order reproducible.
pub fn collect_matching_files(
    root: &Path,
    matcher: &Pattern,
    sink: &dyn EventSink,
) -> Result<Vec<FileRecord>, Error> {
    let mut records = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                sink.emit(inaccessible(err.path().unwrap_or(root), &err));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if !matcher.matches(&name) {
            continue;
        }

        if seen.contains_key(&name) {
            return Err(Error::DuplicateFileName {
                name,
                path: entry.into_path(),
            });
        }
        // Claimed before sizing, so an unreadable first copy still counts.
        seen.insert(name, entry.path().to_path_buf());

        match entry.metadata() {
            Ok(metadata) => records.push(FileRecord::new(entry.into_path(), metadata.len())),
            Err(err) => sink.emit(inaccessible(entry.path(), &err)),
        }
    }

    Ok(records)
}

fn inaccessible(path: &Path, err: &dyn std::fmt::Display) -> Event {
    Event::Inaccessible {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
