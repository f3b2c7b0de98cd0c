//! Decide what a source directory needs before it can be distributed.
//!
//! The directory is reduced to a [`DirectorySnapshot`] through a
//! [`DirectoryListing`], classified into a [`DirectoryState`], and the state
//! maps to exactly one [`Action`]:
//!
//! | state                | action             |
//! |----------------------|--------------------|
//! | (total within limit) | `None`             |
//! | `Flat`               | `Repack`           |
//! | `Organized`          | `Cleanup`          |
//! | `Mixed`              | `Cleanup`          |
//! | `OverLimitOrganized` | `FlattenAndRepack` |
//!
//! A subfolder that itself contains a subfolder is rejected before any
//! subfolder is sized.

pub mod flatten;
pub mod state;

use std::path::Path;

use crate::error::Error;
use crate::events::{Event, EventSink};
use crate::scanner::DirectoryListing;
use crate::units::SizeLimit;

pub use flatten::flatten;
pub use state::{Action, DirectorySnapshot, DirectoryState, SubfolderSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub total_size: u64,
    /// `None` when the whole directory is already within the limit.
    pub state: Option<DirectoryState>,
    pub action: Action,
}

/// Fail with [`Error::NestedSubfolder`] if any top-level subfolder of `root`
/// has a subfolder of its own. Only reads.
pub fn check_nesting(listing: &dyn DirectoryListing, root: &Path) -> Result<(), Error> {
    for dir in listing.entries(root)?.dirs {
        if !listing.entries(&dir)?.dirs.is_empty() {
            return Err(Error::NestedSubfolder { path: dir });
        }
    }
    Ok(())
}

pub fn assess(
    listing: &dyn DirectoryListing,
    root: &Path,
    limit: SizeLimit,
    sink: &dyn EventSink,
) -> Result<Assessment, Error> {
    let total_size = listing.size_of(root, sink);
    sink.emit(Event::SourceSize {
        path: root.to_path_buf(),
        bytes: total_size,
    });

    if !limit.is_exceeded_by(total_size) {
        sink.emit(Event::WithinLimit {
            bytes: total_size,
            limit: limit.bytes(),
        });
        return Ok(Assessment {
            total_size,
            state: None,
            action: Action::None,
        });
    }

    check_nesting(listing, root)?;
    let top = listing.entries(root)?;

    let subfolders: Vec<SubfolderSnapshot> = top
        .dirs
        .iter()
        .map(|dir| {
            let size = listing.size_of(dir, sink);
            sink.emit(Event::SubfolderSize {
                path: dir.clone(),
                bytes: size,
                limit: limit.bytes(),
            });
            SubfolderSnapshot {
                path: dir.clone(),
                size,
            }
        })
        .collect();

    let snapshot = DirectorySnapshot {
        total_size,
        loose_files: top.files.len(),
        subfolders,
    };

    let state = DirectoryState::classify(&snapshot, limit);
    sink.emit(Event::Classified { state });
    match state {
        DirectoryState::Organized => sink.emit(Event::AlreadyOrganized),
        DirectoryState::Mixed => {
            sink.emit(Event::AlreadyOrganized);
            sink.emit(Event::LooseFilesLeft {
                count: snapshot.loose_files,
            });
        }
        _ => {}
    }

    Ok(Assessment {
        total_size,
        state: Some(state),
        action: state.action(),
    })
}
