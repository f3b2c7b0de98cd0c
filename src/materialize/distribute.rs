use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::events::{Event, EventSink};
use crate::fsops;
use crate::packer::Partition;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionReport {
    /// Subfolders used, in partition order.
    pub folders: Vec<PathBuf>,
    pub moved: usize,
    /// Files that could not be moved and were left where they were.
    pub failed: Vec<PathBuf>,
}

/// Folder for the partition at `index`. Indices start at 0.
pub fn subfolder_path(target: &Path, prefix: &str, index: usize) -> PathBuf {
    target.join(format!("{}{}", prefix, index))
}

/// Move each partition's files into `target/<prefix><index>`.
///
/// Indices whose folder already holds something are skipped, so each
/// partition lands in a folder of its own and existing files are never
/// mixed in or replaced. Folders are created if absent and a failure to
/// create one aborts the run. A file that cannot be moved is reported and
/// skipped, so the result is best-effort: check [`DistributionReport::failed`].
pub fn distribute(
    partitions: &[Partition],
    target: &Path,
    prefix: &str,
    sink: &dyn EventSink,
) -> Result<DistributionReport, Error> {
    let total_files: usize = partitions.iter().map(Partition::len).sum();
    sink.emit(Event::DistributionStarted {
        partitions: partitions.len(),
        files: total_files,
    });

    let mut report = DistributionReport::default();

    let mut index = 0;
    for partition in partitions {
        let mut folder = subfolder_path(target, prefix, index);
        while fsops::is_occupied(&folder) {
            sink.emit(Event::FolderOccupied { path: folder });
            index += 1;
            folder = subfolder_path(target, prefix, index);
        }
        index += 1;

        fs::create_dir_all(&folder).map_err(|source| Error::CreateDir {
            path: folder.clone(),
            source,
        })?;
        sink.emit(Event::PartitionCreated {
            path: folder.clone(),
        });

        for record in partition.files() {
            match fsops::move_into(&record.path, &folder) {
                Ok(to) => {
                    report.moved += 1;
                    sink.emit(Event::FileMoved {
                        path: record.path.clone(),
                        to,
                    });
                }
                Err(err) => {
                    sink.emit(Event::MoveFailed {
                        path: record.path.clone(),
                        to: folder.clone(),
                        message: err.to_string(),
                    });
                    report.failed.push(record.path.clone());
                }
            }
        }

        report.folders.push(folder);
    }

    sink.emit(Event::DistributionCompleted {
        moved: report.moved,
        failed: report.failed.len(),
    });
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CollectingSink, SilentSink};
    use crate::packer::{pack, OversizePolicy};
    use crate::scanner::FileRecord;
    use crate::units::SizeLimit;
    use tempfile::tempdir;

    #[test]
    fn test_distribute_into_numbered_folders() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        let target = tmp.path().join("out");
        fs::create_dir(&src).unwrap();

        let mut records = Vec::new();
        for (name, size) in [("a.pod5", 6usize), ("b.pod5", 5), ("c.pod5", 4)] {
            let path = src.join(name);
            fs::write(&path, vec![0u8; size]).unwrap();
            records.push(FileRecord::new(path, size as u64));
        }
        let limit = SizeLimit::from_bytes(10).unwrap();
        let partitions = pack(records, limit, OversizePolicy::Reject, &SilentSink).unwrap();

        let report = distribute(&partitions, &target, "subfolder_", &SilentSink).unwrap();

        assert_eq!(report.moved, 3);
        assert!(report.failed.is_empty());
        assert_eq!(
            report.folders,
            vec![target.join("subfolder_0"), target.join("subfolder_1")]
        );
        assert!(target.join("subfolder_0").join("a.pod5").is_file());
        assert!(target.join("subfolder_1").join("b.pod5").is_file());
        assert!(target.join("subfolder_1").join("c.pod5").is_file());
    }

    #[test]
    fn test_missing_file_is_skipped_not_fatal() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("here.pod5"), b"12").unwrap();

        let records = vec![
            FileRecord::new(src.join("gone.pod5"), 3),
            FileRecord::new(src.join("here.pod5"), 2),
        ];
        let limit = SizeLimit::from_bytes(10).unwrap();
        let partitions = pack(records, limit, OversizePolicy::Reject, &SilentSink).unwrap();

        let sink = CollectingSink::new();
        let report = distribute(&partitions, &src, "subfolder_", &sink).unwrap();

        assert_eq!(report.moved, 1);
        assert_eq!(report.failed, vec![src.join("gone.pod5")]);
        assert!(src.join("subfolder_0").join("here.pod5").is_file());
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, Event::MoveFailed { .. })));
    }

    #[test]
    fn test_occupied_folders_are_skipped() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("src");
        let target = tmp.path().join("out");
        fs::create_dir(&src).unwrap();
        fs::create_dir_all(target.join("subfolder_0")).unwrap();
        fs::create_dir_all(target.join("subfolder_1")).unwrap();
        fs::write(target.join("subfolder_1").join("a.pod5"), b"earlier").unwrap();

        let mut records = Vec::new();
        for (name, size) in [("a.pod5", 8usize), ("b.pod5", 6)] {
            let path = src.join(name);
            fs::write(&path, vec![1u8; size]).unwrap();
            records.push(FileRecord::new(path, size as u64));
        }
        let limit = SizeLimit::from_bytes(10).unwrap();
        let partitions = pack(records, limit, OversizePolicy::Reject, &SilentSink).unwrap();

        let sink = CollectingSink::new();
        let report = distribute(&partitions, &target, "subfolder_", &sink).unwrap();

        assert_eq!(report.moved, 2);
        assert_eq!(
            report.folders,
            vec![target.join("subfolder_0"), target.join("subfolder_2")]
        );
        assert_eq!(fs::read(target.join("subfolder_0").join("a.pod5")).unwrap(), vec![1u8; 8]);
        assert_eq!(fs::read(target.join("subfolder_1").join("a.pod5")).unwrap(), b"earlier");
        assert!(target.join("subfolder_2").join("b.pod5").is_file());
        assert!(sink
            .events()
            .contains(&Event::FolderOccupied {
                path: target.join("subfolder_1")
            }));
    }
}
