pub mod listing;
pub mod walk;

use std::path::PathBuf;

pub use listing::{DirEntries, DirectoryListing, FsListing};
pub use walk::{collect_matching_files, files_under, top_level_files, tree_size};

/// A data file and its size at the moment it was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
