use serde::Deserialize;

use crate::error::Error;
use crate::events::{Event, EventSink};
use crate::scanner::FileRecord;
use crate::units::SizeLimit;

/// What to do with a single file that is larger than the limit on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversizePolicy {
    /// Abort before any partition is produced.
    #[default]
    Reject,
    /// Let the file form a partition of its own, over the limit.
    AllowAsOwnPartition,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    files: Vec<FileRecord>,
    size: u64,
}

impl Partition {
    fn push(&mut self, record: FileRecord) {
        self.size += record.size;
        self.files.push(record);
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Fail with [`Error::OversizedFile`] naming the largest file (the first one
/// in input order on a tie) when it is over the limit on its own.
pub fn reject_oversized(files: &[FileRecord], limit: SizeLimit) -> Result<(), Error> {
    let largest = files
        .iter()
        .reduce(|best, record| if record.size > best.size { record } else { best });

    match largest {
        Some(record) if limit.is_exceeded_by(record.size) => Err(Error::OversizedFile {
            path: record.path.clone(),
            size: record.size,
            limit: limit.bytes(),
        }),
        _ => Ok(()),
    }
}

/// Next-fit-descending packing.
///
/// Files are stably sorted by size, largest first, so equal sizes keep their
/// input order. Each file joins the open partition unless that would push it
/// past the limit, in which case the open partition is closed and the file
/// starts a new one. Closed partitions are never revisited.
///
/// Under [`OversizePolicy::Reject`] every file is checked before packing
/// starts, so an oversized file yields an error and no partitions at all.
pub fn pack(
    mut files: Vec<FileRecord>,
    limit: SizeLimit,
    policy: OversizePolicy,
    sink: &dyn EventSink,
) -> Result<Vec<Partition>, Error> {
    files.sort_by(|a, b| b.size.cmp(&a.size));

    match policy {
        OversizePolicy::Reject => reject_oversized(&files, limit)?,
        OversizePolicy::AllowAsOwnPartition => {
            for record in files.iter().take_while(|r| limit.is_exceeded_by(r.size)) {
                sink.emit(Event::OversizedAllowed {
                    path: record.path.clone(),
                    bytes: record.size,
                    limit: limit.bytes(),
                });
            }
        }
    }

    let mut partitions: Vec<Partition> = Vec::new();
    let mut current = Partition::default();

    for record in files {
        if !current.is_empty() && limit.is_exceeded_by(current.size + record.size) {
            partitions.push(std::mem::take(&mut current));
        }
        current.push(record);
    }

    if !current.is_empty() {
        partitions.push(current);
    }

    for (idx, partition) in partitions.iter().enumerate() {
        sink.emit(Event::PartitionSized {
            index: idx + 1,
            files: partition.len(),
            bytes: partition.size(),
        });
    }
    sink.emit(Event::PackingCompleted {
        partitions: partitions.len(),
    });

    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SilentSink;
    use std::collections::HashSet;

    const MB: u64 = 1024 * 1024;

    fn records(sizes: &[(&str, u64)]) -> Vec<FileRecord> {
        sizes
            .iter()
            .map(|(name, size)| FileRecord::new(format!("/data/{}", name), *size))
            .collect()
    }

    fn names(partition: &Partition) -> Vec<String> {
        partition.files().iter().map(|f| f.file_name()).collect()
    }

    #[test]
    fn test_pack_next_fit_descending() {
        let limit = SizeLimit::from_gb(1.0).unwrap();
        let files = records(&[
            ("d.pod5", 100 * MB),
            ("b.pod5", 600 * MB),
            ("a.pod5", 700 * MB),
            ("c.pod5", 500 * MB),
        ]);

        let partitions = pack(files, limit, OversizePolicy::Reject, &SilentSink).unwrap();

        // 600 does not fit next to 700, 500 does not fit next to 600,
        // and 100 joins the open partition holding 500.
        assert_eq!(partitions.len(), 3);
        assert_eq!(names(&partitions[0]), vec!["a.pod5"]);
        assert_eq!(names(&partitions[1]), vec!["b.pod5"]);
        assert_eq!(names(&partitions[2]), vec!["c.pod5", "d.pod5"]);
        assert_eq!(partitions[2].size(), 600 * MB);
    }

    #[test]
    fn test_pack_does_not_backfill_closed_partitions() {
        let limit = SizeLimit::from_bytes(10).unwrap();
        let files = records(&[("a", 6), ("b", 5), ("c", 4)]);

        let partitions = pack(files, limit, OversizePolicy::Reject, &SilentSink).unwrap();

        // c (4) would fit next to a (6) but a's partition is already closed.
        assert_eq!(partitions.len(), 2);
        assert_eq!(names(&partitions[0]), vec!["a"]);
        assert_eq!(names(&partitions[1]), vec!["b", "c"]);
    }

    #[test]
    fn test_pack_exact_fit_stays_together() {
        let limit = SizeLimit::from_bytes(10).unwrap();
        let files = records(&[("a", 5), ("b", 5)]);

        let partitions = pack(files, limit, OversizePolicy::Reject, &SilentSink).unwrap();
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].size(), 10);
    }

    #[test]
    fn test_pack_ties_keep_input_order() {
        let limit = SizeLimit::from_bytes(8).unwrap();
        let files = records(&[("z", 4), ("m", 4), ("a", 4)]);

        let partitions = pack(files, limit, OversizePolicy::Reject, &SilentSink).unwrap();
        assert_eq!(names(&partitions[0]), vec!["z", "m"]);
        assert_eq!(names(&partitions[1]), vec!["a"]);
    }

    #[test]
    fn test_pack_is_deterministic() {
        let limit = SizeLimit::from_bytes(100).unwrap();
        let input = records(&[
            ("a", 30),
            ("b", 70),
            ("c", 30),
            ("d", 45),
            ("e", 55),
            ("f", 1),
        ]);

        let first = pack(input.clone(), limit, OversizePolicy::Reject, &SilentSink).unwrap();
        let second = pack(input, limit, OversizePolicy::Reject, &SilentSink).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pack_covers_every_file_once_within_limit() {
        let limit = SizeLimit::from_bytes(1000).unwrap();
        let sizes: Vec<(String, u64)> = (0..200u64)
            .map(|i| (format!("f{:03}.pod5", i), (i * 7919) % 997 + 1))
            .collect();
        let input: Vec<FileRecord> = sizes
            .iter()
            .map(|(n, s)| FileRecord::new(format!("/data/{}", n), *s))
            .collect();
        let input_total: u64 = input.iter().map(|r| r.size).sum();

        let partitions = pack(input.clone(), limit, OversizePolicy::Reject, &SilentSink).unwrap();

        let mut seen = HashSet::new();
        let mut total = 0;
        for partition in &partitions {
            assert!(!partition.is_empty());
            assert!(partition.size() <= limit.bytes());
            for file in partition.files() {
                assert!(seen.insert(file.path.clone()), "file packed twice");
            }
            total += partition.size();
        }
        assert_eq!(seen.len(), input.len());
        assert_eq!(total, input_total);
    }

    #[test]
    fn test_pack_rejects_oversized_file() {
        let limit = SizeLimit::from_bytes(100).unwrap();
        let files = records(&[("ok", 50), ("big", 101)]);

        let err = pack(files, limit, OversizePolicy::Reject, &SilentSink).unwrap_err();
        match err {
            Error::OversizedFile { path, size, limit } => {
                assert!(path.ends_with("big"));
                assert_eq!(size, 101);
                assert_eq!(limit, 100);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reject_oversized_names_first_largest() {
        let limit = SizeLimit::from_bytes(100).unwrap();
        let files = records(&[("ok", 50), ("first", 120), ("second", 120)]);

        match reject_oversized(&files, limit).unwrap_err() {
            Error::OversizedFile { path, size, .. } => {
                assert!(path.ends_with("first"));
                assert_eq!(size, 120);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(reject_oversized(&files[..1], limit).is_ok());
        assert!(reject_oversized(&[], limit).is_ok());
    }

    #[test]
    fn test_pack_allows_oversized_file_alone() {
        let limit = SizeLimit::from_bytes(100).unwrap();
        let files = records(&[("small", 10), ("big", 150), ("mid", 60)]);

        let partitions =
            pack(files, limit, OversizePolicy::AllowAsOwnPartition, &SilentSink).unwrap();

        assert_eq!(partitions.len(), 2);
        assert_eq!(names(&partitions[0]), vec!["big"]);
        assert_eq!(partitions[0].size(), 150);
        assert_eq!(names(&partitions[1]), vec!["mid", "small"]);
    }

    #[test]
    fn test_pack_empty_input() {
        let limit = SizeLimit::from_bytes(100).unwrap();
        let partitions = pack(Vec::new(), limit, OversizePolicy::Reject, &SilentSink).unwrap();
        assert!(partitions.is_empty());
    }
}
