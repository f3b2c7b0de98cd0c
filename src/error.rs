use std::path::PathBuf;
use thiserror::Error;

use crate::units::bytes_to_gb;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Manifest serialization error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error(
        "Nested subfolders detected in '{}'. Acceptable structure: data files, or subfolders containing only data files",
        .path.display()
    )]
    NestedSubfolder { path: PathBuf },

    #[error("Duplicate filename detected: '{name}' in '{}'", .path.display())]
    DuplicateFileName { name: String, path: PathBuf },

    #[error(
        "File '{}' ({:.2} GB) exceeds the size limit of {:.2} GB",
        .path.display(),
        gb(.size),
        gb(.limit)
    )]
    OversizedFile { path: PathBuf, size: u64, limit: u64 },

    #[error("Invalid size limit: {0} GB (must be a positive number)")]
    InvalidSizeLimit(f64),

    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Source directory '{}' does not exist or is not a directory", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to segregate '{}': {source}", .path.display())]
    Segregation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to save partitions to '{}': {source}", .path.display())]
    WriteManifest {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn gb(bytes: &u64) -> f64 {
    bytes_to_gb(*bytes)
}
