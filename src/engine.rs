use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cleanup;
use crate::config::AppConfig;
use crate::error::Error;
use crate::events::{Event, EventSink, SilentSink};
use crate::materialize::{self, DistributionReport};
use crate::packer::{self, OversizePolicy, Partition};
use crate::reconcile::{self, Action, Assessment};
use crate::scanner::{self, FsListing};
use crate::segregate;
use crate::units::SizeLimit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributeOutcome {
    /// The source directory already fits in one partition.
    WithinLimit,
    /// Existing subfolders are all within the limit; only cleanup ran.
    AlreadyOrganized,
    Distributed(DistributionReport),
}

#[derive(Debug)]
pub struct DistributeResult {
    pub source: PathBuf,
    pub target: PathBuf,
    pub assessment: Assessment,
    pub outcome: DistributeOutcome,
    pub segregated: usize,
    pub flattened: usize,
    pub removed_dirs: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOutcome {
    NoFilesFound,
    Written {
        path: PathBuf,
        partitions: Vec<Partition>,
    },
}

#[derive(Debug)]
pub struct ManifestResult {
    pub source: PathBuf,
    pub outcome: ManifestOutcome,
    pub total_files: usize,
    pub total_size: u64,
    pub duration: Duration,
}

/// Moves files into size-bounded subfolders, reconciling whatever layout the
/// source directory already has.
pub struct DistributeEngine {
    config: AppConfig,
}

impl DistributeEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_policy(mut self, policy: OversizePolicy) -> Self {
        self.config.on_oversized_file = policy;
        self
    }

    /// Run the full pipeline:
    /// 1. Segregate loose data files when subfolders also exist
    /// 2. Assess the directory (size, nesting, state)
    /// 3. Flatten if a subfolder is over the limit
    /// 4. Pack the top-level files and move them into numbered subfolders
    /// 5. Remove empty directories left behind
    ///
    /// A nested subfolder is detected before anything is moved. Under the
    /// reject policy an oversized file is detected before any flattening or
    /// partition folder is touched; only segregation may already have run.
    /// Moves never replace an existing file.
    pub fn run(
        &self,
        source: &Path,
        target: &Path,
        limit: SizeLimit,
        sink: &dyn EventSink,
    ) -> Result<DistributeResult, Error> {
        let start = Instant::now();
        let source = resolve_source(source)?;
        let target = absolute(target)?;
        let matcher = self.config.file_matcher()?;
        debug!(
            "Distributing {} into {} with limit {}",
            source.display(),
            target.display(),
            limit
        );

        // Segregation keeps the byte total, so the nesting rule assess applies
        // later can be enforced before the tree changes.
        if limit.is_exceeded_by(scanner::tree_size(&source, &SilentSink)) {
            reconcile::check_nesting(&FsListing, &source)?;
        }

        let segregated = segregate::segregate(
            &FsListing,
            &source,
            &matcher,
            &self.config.holding_folder,
            sink,
        )?;

        let assessment = reconcile::assess(&FsListing, &source, limit, sink)?;

        let mut flattened = 0;
        let outcome = match assessment.action {
            Action::None => DistributeOutcome::WithinLimit,
            Action::Cleanup => DistributeOutcome::AlreadyOrganized,
            Action::Repack | Action::FlattenAndRepack => {
                if assessment.action == Action::FlattenAndRepack {
                    if self.config.on_oversized_file == OversizePolicy::Reject {
                        packer::reject_oversized(&scanner::files_under(&source, sink), limit)?;
                    }
                    flattened = reconcile::flatten(&source, sink);
                }
                let files = scanner::top_level_files(&source, sink)?;
                let partitions =
                    packer::pack(files, limit, self.config.on_oversized_file, sink)?;
                let report = materialize::distribute(
                    &partitions,
                    &target,
                    &self.config.subfolder_prefix,
                    sink,
                )?;
                DistributeOutcome::Distributed(report)
            }
        };

        let removed_dirs = cleanup::remove_empty_dirs(&source, sink);

        Ok(DistributeResult {
            source,
            target,
            assessment,
            outcome,
            segregated,
            flattened,
            removed_dirs,
            duration: start.elapsed(),
        })
    }

    /// Classify `source` without changing anything on disk. Segregation is
    /// not simulated, so loose data files next to subfolders show up as
    /// `Mixed` here.
    pub fn inspect(
        &self,
        source: &Path,
        limit: SizeLimit,
        sink: &dyn EventSink,
    ) -> Result<Assessment, Error> {
        let source = resolve_source(source)?;
        reconcile::assess(&FsListing, &source, limit, sink)
    }
}

/// Scans a tree for data files and records their grouping in a JSON
/// manifest without moving anything.
pub struct ManifestEngine {
    config: AppConfig,
}

impl ManifestEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_policy(mut self, policy: OversizePolicy) -> Self {
        self.config.on_oversized_file = policy;
        self
    }

    /// Write `<output_dir>/<manifest_file_name>`; `output_dir` defaults to the
    /// current working directory. Duplicate file names and (under the reject
    /// policy) oversized files abort before anything is written.
    pub fn run(
        &self,
        source: &Path,
        output_dir: Option<&Path>,
        limit: SizeLimit,
        sink: &dyn EventSink,
    ) -> Result<ManifestResult, Error> {
        let start = Instant::now();
        let source = resolve_source(source)?;
        let matcher = self.config.file_matcher()?;

        let files = scanner::collect_matching_files(&source, &matcher, sink)?;
        let total_files = files.len();
        let total_size: u64 = files.iter().map(|f| f.size).sum();
        sink.emit(Event::FilesDiscovered {
            count: total_files,
            bytes: total_size,
        });

        if files.is_empty() {
            sink.emit(Event::NoMatchingFiles {
                root: source.clone(),
            });
            return Ok(ManifestResult {
                source,
                outcome: ManifestOutcome::NoFilesFound,
                total_files,
                total_size,
                duration: start.elapsed(),
            });
        }

        let partitions = packer::pack(files, limit, self.config.on_oversized_file, sink)?;

        let output_dir = match output_dir {
            Some(dir) => absolute(dir)?,
            None => env::current_dir()?,
        };
        let path = output_dir.join(&self.config.manifest_file_name);
        materialize::write_manifest(&partitions, &path, sink)?;

        Ok(ManifestResult {
            source,
            outcome: ManifestOutcome::Written { path, partitions },
            total_files,
            total_size,
            duration: start.elapsed(),
        })
    }
}

fn resolve_source(source: &Path) -> Result<PathBuf, Error> {
    if !source.is_dir() {
        return Err(Error::SourceNotFound(source.to_path_buf()));
    }
    Ok(fs::canonicalize(source)?)
}

fn absolute(path: &Path) -> Result<PathBuf, Error> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
