use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::events::{Event, EventSink};

/// Remove every empty directory below `root`, deepest first, so a parent
/// emptied by removing its children goes in the same pass. `root` itself is
/// kept. Failures are reported, never fatal. Returns the number removed.
pub fn remove_empty_dirs(root: &Path, sink: &dyn EventSink) -> usize {
    let mut removed = 0;

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                sink.emit(Event::Inaccessible {
                    path: err.path().unwrap_or(root).to_path_buf(),
                    message: err.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let is_empty = match fs::read_dir(path) {
            Ok(mut children) => children.next().is_none(),
            Err(err) => {
                sink.emit(Event::RemoveFailed {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
                continue;
            }
        };
        if !is_empty {
            continue;
        }

        match fs::remove_dir(path) {
            Ok(()) => {
                removed += 1;
                sink.emit(Event::DirectoryRemoved {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => sink.emit(Event::RemoveFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    sink.emit(Event::CleanupCompleted { removed });
    removed
}
