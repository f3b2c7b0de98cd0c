use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::events::{Event, EventSink};
use crate::packer::Partition;

/// Label of the partition at `index` in the manifest. Labels start at 1.
pub fn partition_label(index: usize) -> String {
    format!("partition_{}", index + 1)
}

/// `{"partition_1": {"/abs/path.pod5": 123, ...}, ...}` in partition order.
struct Manifest<'a>(&'a [Partition]);

struct Members<'a>(&'a Partition);

impl Serialize for Manifest<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, partition) in self.0.iter().enumerate() {
            map.serialize_entry(&partition_label(index), &Members(partition))?;
        }
        map.end()
    }
}

impl Serialize for Members<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for record in self.0.files() {
            map.serialize_entry(&record.path.to_string_lossy(), &record.size)?;
        }
        map.end()
    }
}

pub fn render_manifest(partitions: &[Partition]) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    Manifest(partitions).serialize(&mut serializer)?;
    Ok(buf)
}

/// Serialize the whole manifest, then write it in one go, replacing any
/// existing file. The parent directory is created if needed.
pub fn write_manifest(
    partitions: &[Partition],
    path: &Path,
    sink: &dyn EventSink,
) -> Result<(), Error> {
    let rendered = render_manifest(partitions)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, rendered).map_err(|source| Error::WriteManifest {
        path: path.to_path_buf(),
        source,
    })?;

    sink.emit(Event::ManifestWritten {
        path: path.to_path_buf(),
    });
    Ok(())
}
