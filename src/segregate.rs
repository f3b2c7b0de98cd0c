use glob::Pattern;
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::events::{Event, EventSink};
use crate::fsops;
use crate::scanner::DirectoryListing;

/// Move loose matching files into `root/<holding>` when the top level also
/// has subfolders, so the reconciler only has subfolders to reason about.
///
/// Nothing happens unless both kinds of entries are present. Any failure to
/// create the holding folder or to move a file into it is fatal.
/// Returns the number of files moved.
pub fn segregate(
    listing: &dyn DirectoryListing,
    root: &Path,
    matcher: &Pattern,
    holding: &str,
    sink: &dyn EventSink,
) -> Result<usize, Error> {
    let top = listing.entries(root)?;

    let loose: Vec<_> = top
        .files
        .iter()
        .filter(|path| {
            path.file_name()
                .map(|name| matcher.matches(&name.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    if loose.is_empty() || top.dirs.is_empty() {
        return Ok(0);
    }

    let holding_path = root.join(holding);
    sink.emit(Event::SegregationStarted {
        files: loose.len(),
        holding: holding_path.clone(),
    });

    fs::create_dir_all(&holding_path).map_err(|source| Error::Segregation {
        path: holding_path.clone(),
        source,
    })?;

    for path in &loose {
        fsops::move_into(path, &holding_path).map_err(|source| Error::Segregation {
            path: path.to_path_buf(),
            source,
        })?;
    }

    sink.emit(Event::SegregationCompleted { moved: loose.len() });
    Ok(loose.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SilentSink;
    use crate::scanner::FsListing;
    use tempfile::tempdir;

    fn pod5() -> Pattern {
        Pattern::new("*.pod5").unwrap()
    }

    #[test]
    fn test_segregates_loose_files_next_to_subfolders() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("subfolder_0")).unwrap();
        fs::write(root.join("subfolder_0").join("a.pod5"), b"a").unwrap();
        fs::write(root.join("b.pod5"), b"b").unwrap();
        fs::write(root.join("c.pod5"), b"c").unwrap();
        fs::write(root.join("notes.txt"), b"n").unwrap();

        let moved = segregate(&FsListing, root, &pod5(), "holding", &SilentSink).unwrap();

        assert_eq!(moved, 2);
        assert!(root.join("holding").join("b.pod5").is_file());
        assert!(root.join("holding").join("c.pod5").is_file());
        assert!(root.join("notes.txt").is_file());
        assert!(!root.join("b.pod5").exists());
    }

    #[test]
    fn test_flat_directory_left_alone() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.pod5"), b"a").unwrap();

        let moved = segregate(&FsListing, root, &pod5(), "holding", &SilentSink).unwrap();

        assert_eq!(moved, 0);
        assert!(!root.join("holding").exists());
        assert!(root.join("a.pod5").is_file());
    }

    #[test]
    fn test_subfolders_without_loose_files_left_alone() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("readme.md"), b"r").unwrap();

        let moved = segregate(&FsListing, root, &pod5(), "holding", &SilentSink).unwrap();
        assert_eq!(moved, 0);
        assert!(!root.join("holding").exists());
    }
}
