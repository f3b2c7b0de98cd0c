use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "podsplit")]
#[command(about = "Split directories of pod5 files into size-bounded groups", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Move files into numbered subfolders that each fit the size limit
    Distribute(DistributeArgs),
    /// Write a partitions.json manifest without moving any file
    Partition(PartitionArgs),
    /// Show how a directory would be classified, without changing it
    Inspect(InspectArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct DistributeArgs {
    /// Source directory containing files to distribute
    pub source_dir: PathBuf,
    /// Target directory to create subfolders in
    pub target_dir: PathBuf,
    /// Size limit for each subfolder in GB
    pub size_limit_gb: f64,
    /// Give a file larger than the limit a subfolder of its own instead of aborting
    #[arg(long)]
    pub allow_oversized: bool,
}

#[derive(Debug, Args)]
pub struct PartitionArgs {
    /// Directory to scan recursively for data files
    pub source_dir: PathBuf,
    /// Size limit for each partition in GB
    pub size_limit_gb: f64,
    /// Directory to save the manifest in (defaults to the current directory)
    #[arg(long = "output-dir", visible_alias = "output_dir")]
    pub output_dir: Option<PathBuf>,
    /// Give a file larger than the limit a partition of its own instead of aborting
    #[arg(long)]
    pub allow_oversized: bool,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    pub source_dir: PathBuf,
    /// Size limit in GB
    pub size_limit_gb: f64,
}
