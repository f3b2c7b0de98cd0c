use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::events::{Event, EventSink};
use crate::fsops;

/// Move every file found below `root` up to `root` itself and remove the
/// directories that empties. Returns the number of files moved.
///
/// A file whose name is already taken at the top level stays where it is.
/// Failed moves and removals are reported and skipped.
pub fn flatten(root: &Path, sink: &dyn EventSink) -> usize {
    sink.emit(Event::FlattenStarted {
        root: root.to_path_buf(),
    });

    let mut moved = 0;
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .sort_by_file_name();

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

        let file_type = entry.file_type();
        if file_type.is_dir() {
            match fs::remove_dir(entry.path()) {
                Ok(()) => sink.emit(Event::DirectoryRemoved {
                    path: entry.path().to_path_buf(),
                }),
                Err(err) => sink.emit(Event::RemoveFailed {
                    path: entry.path().to_path_buf(),
                    message: err.to_string(),
                }),
            }
        } else if file_type.is_file() && entry.depth() > 1 {
            let dest = root.join(entry.file_name());
            if fsops::exists_no_follow(&dest) {
                sink.emit(Event::NameCollision {
                    path: entry.path().to_path_buf(),
                    existing: dest,
                });
                continue;
            }
            match fsops::move_file(entry.path(), &dest) {
                Ok(()) => moved += 1,
                Err(err) => sink.emit(Event::MoveFailed {
                    path: entry.path().to_path_buf(),
                    to: dest,
                    message: err.to_string(),
                }),
            }
        }
    }

    sink.emit(Event::FlattenCompleted { moved });
    moved
}
