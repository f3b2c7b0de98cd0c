use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::reconcile::DirectoryState;
use crate::units::bytes_to_gb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

/// Everything the library has to say about a run.
///
/// Components never print. They hand events to an [`EventSink`] and the
/// caller decides how (or whether) to present them.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A file or directory could not be read while sizing or scanning.
    Inaccessible { path: PathBuf, message: String },
    SourceSize { path: PathBuf, bytes: u64 },
    WithinLimit { bytes: u64, limit: u64 },
    SubfolderSize { path: PathBuf, bytes: u64, limit: u64 },
    Classified { state: DirectoryState },
    AlreadyOrganized,
    LooseFilesLeft { count: usize },

    SegregationStarted { files: usize, holding: PathBuf },
    SegregationCompleted { moved: usize },

    FlattenStarted { root: PathBuf },
    NameCollision { path: PathBuf, existing: PathBuf },
    FlattenCompleted { moved: usize },

    FilesDiscovered { count: usize, bytes: u64 },
    NoMatchingFiles { root: PathBuf },
    OversizedAllowed { path: PathBuf, bytes: u64, limit: u64 },
    PartitionSized { index: usize, files: usize, bytes: u64 },
    PackingCompleted { partitions: usize },

    DistributionStarted { partitions: usize, files: usize },
    PartitionCreated { path: PathBuf },
    /// A would-be partition folder already holds something and is skipped.
    FolderOccupied { path: PathBuf },
    FileMoved { path: PathBuf, to: PathBuf },
    MoveFailed { path: PathBuf, to: PathBuf, message: String },
    DistributionCompleted { moved: usize, failed: usize },

    ManifestWritten { path: PathBuf },

    DirectoryRemoved { path: PathBuf },
    RemoveFailed { path: PathBuf, message: String },
    CleanupCompleted { removed: usize },
}

impl Event {
    pub fn level(&self) -> Level {
        match self {
            Event::FileMoved { .. } | Event::PartitionCreated { .. } => Level::Debug,
            Event::Inaccessible { .. }
            | Event::LooseFilesLeft { .. }
            | Event::NameCollision { .. }
            | Event::FolderOccupied { .. }
            | Event::NoMatchingFiles { .. }
            | Event::OversizedAllowed { .. }
            | Event::RemoveFailed { .. } => Level::Warning,
            Event::MoveFailed { .. } => Level::Error,
            Event::SubfolderSize { bytes, limit, .. } if bytes > limit => Level::Warning,
            _ => Level::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Inaccessible { path, message } => {
                write!(f, "Unable to access {}: {}", path.display(), message)
            }
            Event::SourceSize { path, bytes } => write!(
                f,
                "Total size of {}: {:.2} GB",
                path.display(),
                bytes_to_gb(*bytes)
            ),
            Event::WithinLimit { limit, .. } => write!(
                f,
                "Directory size is within the size limit of {:.2} GB. Skipping file distribution.",
                bytes_to_gb(*limit)
            ),
            Event::SubfolderSize { path, bytes, limit } => {
                let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
                if bytes > limit {
                    write!(
                        f,
                        "Subfolder {} ({:.2} GB) exceeds the size limit of {:.2} GB",
                        name,
                        bytes_to_gb(*bytes),
                        bytes_to_gb(*limit)
                    )
                } else {
                    write!(f, "Size of {}: {:.2} GB", name, bytes_to_gb(*bytes))
                }
            }
            Event::Classified { state } => write!(f, "Directory classified as {}", state),
            Event::AlreadyOrganized => write!(
                f,
                "All existing subdirectories are within the size limit. Skipping file distribution."
            ),
            Event::LooseFilesLeft { count } => write!(
                f,
                "{} loose file(s) at the top level were left in place next to organized subfolders",
                count
            ),
            Event::SegregationStarted { files, holding } => write!(
                f,
                "Data files and subfolders detected. Segregating {} file(s) into {}",
                files,
                holding.display()
            ),
            Event::SegregationCompleted { moved } => {
                write!(f, "Segregation completed: {} file(s) moved", moved)
            }
            Event::FlattenStarted { root } => {
                write!(f, "Flattening subdirectories in {}", root.display())
            }
            Event::NameCollision { path, existing } => write!(
                f,
                "Not moving {}: {} already exists",
                path.display(),
                existing.display()
            ),
            Event::FlattenCompleted { moved } => {
                write!(f, "Flattening completed: {} file(s) moved", moved)
            }
            Event::FilesDiscovered { count, bytes } => write!(
                f,
                "Found {} file(s), {:.2} GB total",
                count,
                bytes_to_gb(*bytes)
            ),
            Event::NoMatchingFiles { root } => {
                write!(f, "No matching files found in {}", root.display())
            }
            Event::OversizedAllowed { path, bytes, limit } => write!(
                f,
                "File {} ({:.2} GB) exceeds the size limit of {:.2} GB and gets a partition of its own",
                path.display(),
                bytes_to_gb(*bytes),
                bytes_to_gb(*limit)
            ),
            Event::PartitionSized {
                index,
                files,
                bytes,
            } => write!(
                f,
                "Size of partition_{}: {:.2} GB ({} file(s))",
                index,
                bytes_to_gb(*bytes),
                files
            ),
            Event::PackingCompleted { partitions } => {
                write!(f, "Total partitions created: {}", partitions)
            }
            Event::DistributionStarted { partitions, files } => write!(
                f,
                "Distributing {} file(s) into {} subfolder(s)",
                files, partitions
            ),
            Event::PartitionCreated { path } => write!(f, "Created subfolder {}", path.display()),
            Event::FolderOccupied { path } => write!(
                f,
                "{} is not empty, using the next free subfolder",
                path.display()
            ),
            Event::FileMoved { path, to } => {
                write!(f, "Moved {} to {}", path.display(), to.display())
            }
            Event::MoveFailed { path, to, message } => write!(
                f,
                "Failed to move {} to {}: {}",
                path.display(),
                to.display(),
                message
            ),
            Event::DistributionCompleted { moved, failed } => write!(
                f,
                "File distribution completed: {} moved, {} failed",
                moved, failed
            ),
            Event::ManifestWritten { path } => {
                write!(f, "Saved all partitions to '{}'", path.display())
            }
            Event::DirectoryRemoved { path } => {
                write!(f, "Removed empty directory {}", path.display())
            }
            Event::RemoveFailed { path, message } => write!(
                f,
                "Directory {} could not be removed: {}",
                path.display(),
                message
            ),
            Event::CleanupCompleted { removed } => {
                if *removed == 0 {
                    write!(f, "No empty subfolders found to remove")
                } else {
                    write!(f, "Removed {} empty subfolder(s)", removed)
                }
            }
        }
    }
}

/// Receiver for [`Event`]s.
///
/// The CLI implements this with tracing and indicatif; tests collect events
/// in memory. The default implementation drops everything.
pub trait EventSink: Send + Sync {
    fn emit(&self, _event: Event) {}
}

/// No-op sink for silent operation.
pub struct SilentSink;

impl EventSink for SilentSink {}

/// Sink that keeps every event in memory, in emission order.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Event>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.events().iter().filter(|e| e.level() == level).count()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let moved = Event::FileMoved {
            path: PathBuf::from("/a"),
            to: PathBuf::from("/b"),
        };
        assert_eq!(moved.level(), Level::Debug);

        let failed = Event::MoveFailed {
            path: PathBuf::from("/a"),
            to: PathBuf::from("/b"),
            message: "denied".to_string(),
        };
        assert_eq!(failed.level(), Level::Error);

        let within = Event::SubfolderSize {
            path: PathBuf::from("/src/sub"),
            bytes: 10,
            limit: 10,
        };
        assert_eq!(within.level(), Level::Info);

        let over = Event::SubfolderSize {
            path: PathBuf::from("/src/sub"),
            bytes: 11,
            limit: 10,
        };
        assert_eq!(over.level(), Level::Warning);
    }

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.emit(Event::AlreadyOrganized);
        sink.emit(Event::CleanupCompleted { removed: 0 });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], Event::AlreadyOrganized);
        assert_eq!(sink.count_at(Level::Info), 2);
        assert_eq!(
            events[1].to_string(),
            "No empty subfolders found to remove"
        );
    }
}
