use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::events::EventSink;
use crate::scanner::walk;

/// Immediate children of a directory. Symlinks are left out of both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirEntries {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

/// Read-only view of a directory tree used by the reconciler.
///
/// Production code uses [`FsListing`]; tests can substitute an in-memory tree
/// to exercise state classification without touching the disk.
pub trait DirectoryListing {
    /// One level of `dir`, each list sorted by name.
    fn entries(&self, dir: &Path) -> io::Result<DirEntries>;

    /// Recursive byte total of the regular files under `dir`.
    fn size_of(&self, dir: &Path, sink: &dyn EventSink) -> u64;
}

pub struct FsListing;

impl DirectoryListing for FsListing {
    fn entries(&self, dir: &Path) -> io::Result<DirEntries> {
        let mut listing = DirEntries::default();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                listing.dirs.push(entry.path());
            } else if file_type.is_file() {
                listing.files.push(entry.path());
            }
        }

        listing.files.sort();
        listing.dirs.sort();
        Ok(listing)
    }

    fn size_of(&self, dir: &Path, sink: &dyn EventSink) -> u64 {
        walk::tree_size(dir, sink)
    }
}
