use std::fmt;
use std::path::PathBuf;

use crate::units::SizeLimit;

/// Layout of an over-limit source directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryState {
    /// Only files at the top level.
    Flat,
    /// Only subfolders, each within the limit.
    Organized,
    /// At least one subfolder is over the limit. Loose files may coexist.
    OverLimitOrganized,
    /// Loose files next to subfolders that are all within the limit.
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Cleanup,
    Repack,
    FlattenAndRepack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubfolderSnapshot {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySnapshot {
    pub total_size: u64,
    pub loose_files: usize,
    pub subfolders: Vec<SubfolderSnapshot>,
}

impl DirectoryState {
    pub fn classify(snapshot: &DirectorySnapshot, limit: SizeLimit) -> Self {
        if snapshot.subfolders.is_empty() {
            return DirectoryState::Flat;
        }
        if snapshot
            .subfolders
            .iter()
            .any(|sub| limit.is_exceeded_by(sub.size))
        {
            return DirectoryState::OverLimitOrganized;
        }
        if snapshot.loose_files > 0 {
            DirectoryState::Mixed
        } else {
            DirectoryState::Organized
        }
    }

    pub fn action(self) -> Action {
        match self {
            DirectoryState::Flat => Action::Repack,
            DirectoryState::Organized | DirectoryState::Mixed => Action::Cleanup,
            DirectoryState::OverLimitOrganized => Action::FlattenAndRepack,
        }
    }
}

impl fmt::Display for DirectoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DirectoryState::Flat => "FLAT",
            DirectoryState::Organized => "ORGANIZED",
            DirectoryState::OverLimitOrganized => "OVER_LIMIT_ORGANIZED",
            DirectoryState::Mixed => "MIXED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(loose_files: usize, subfolder_sizes: &[u64]) -> DirectorySnapshot {
        DirectorySnapshot {
            total_size: subfolder_sizes.iter().sum(),
            loose_files,
            subfolders: subfolder_sizes
                .iter()
                .enumerate()
                .map(|(i, size)| SubfolderSnapshot {
                    path: PathBuf::from(format!("/src/subfolder_{}", i)),
                    size: *size,
                })
                .collect(),
        }
    }

    #[test]
    fn test_classify_transitions() {
        let limit = SizeLimit::from_bytes(100).unwrap();

        let cases = [
            (snapshot(5, &[]), DirectoryState::Flat, Action::Repack),
            (snapshot(0, &[]), DirectoryState::Flat, Action::Repack),
            (snapshot(0, &[100, 40]), DirectoryState::Organized, Action::Cleanup),
            (snapshot(2, &[100, 40]), DirectoryState::Mixed, Action::Cleanup),
            (
                snapshot(0, &[101, 40]),
                DirectoryState::OverLimitOrganized,
                Action::FlattenAndRepack,
            ),
            (
                snapshot(3, &[10, 250]),
                DirectoryState::OverLimitOrganized,
                Action::FlattenAndRepack,
            ),
        ];

        for (snap, state, action) in cases {
            let classified = DirectoryState::classify(&snap, limit);
            assert_eq!(classified, state, "snapshot {:?}", snap);
            assert_eq!(classified.action(), action);
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(DirectoryState::OverLimitOrganized.to_string(), "OVER_LIMIT_ORGANIZED");
        assert_eq!(DirectoryState::Flat.to_string(), "FLAT");
    }
}
