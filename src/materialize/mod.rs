//! Turn computed partitions into something on disk: either numbered folders
//! holding the moved files, or a JSON manifest describing the grouping.

pub mod distribute;
pub mod manifest;

pub use distribute::{distribute, subfolder_path, DistributionReport};
pub use manifest::{partition_label, render_manifest, write_manifest};
