//! Library-level synchronization: pick the conventions, plan, then walk every
//! movie through [`hardlinks::process_movie`].

use crate::convention::Convention;
use crate::detect;
use crate::error::{Result, SyncError};
use crate::fsops;
use crate::hardlinks::{self, MovieStats};
use crate::library::MediaLibrary;
use crate::reconcile;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Ask a running synchronization to stop before the next movie.
pub fn request_interrupt() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Switches that change how the synchronizer treats the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Log every mutation instead of performing it.
    pub dry_run: bool,
    /// Remove target entries without a source counterpart.
    pub delete: bool,
    /// Create the target root when it is missing.
    pub create: bool,
    /// Log skipped and unchanged items as well.
    pub verbose: bool,
    /// Rename stale hardlinks to their expected name instead of keeping them.
    pub rename_stale: bool,
}

/// What part of the source library to synchronize.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Library,
    /// A single movie folder, or any path inside one.
    Movie(PathBuf),
}

/// Totals of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub movies: usize,
    pub files_updated: usize,
    pub files_removed: usize,
    pub failures: usize,
}

impl SyncSummary {
    fn add(&mut self, stats: &MovieStats) {
        self.files_updated += stats.files_updated();
        self.files_removed += stats.files_removed();
        self.failures += stats.failures;
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Summary: {} movies found, {} files updated, {} files removed.",
            self.movies, self.files_updated, self.files_removed
        )
    }
}

/// Source and target conventions, either forced or detected from `source`.
///
/// Forcing a target convention makes the source the other one.
pub fn resolve_conventions(
    source: &Path,
    convert_to: Option<Convention>,
) -> Result<(Convention, Convention)> {
    let target = match convert_to {
        Some(target) => target,
        None => {
            let detected =
                detect::detect_convention(source).ok_or(SyncError::UndetectableConvention)?;
            info!("Detected {} library in '{}'", detected, source.display());
            detected.counterpart()
        }
    };
    Ok((target.counterpart(), target))
}

/// Mirror `source` into `target`, converting between naming conventions.
///
/// `convert_to` selects the target convention; `None` detects the source
/// convention and converts into the other one.
pub fn sync(
    source: &Path,
    target: &Path,
    convert_to: Option<Convention>,
    scope: &Scope,
    options: &SyncOptions,
) -> Result<SyncSummary> {
    if !source.is_dir() {
        return Err(SyncError::MissingSource(source.to_path_buf()));
    }
    if !target.is_dir() && !options.create {
        return Err(SyncError::MissingTarget(target.to_path_buf()));
    }

    reconcile::ensure_distinct_paths(source, target)?;

    let (source_kind, target_kind) = resolve_conventions(source, convert_to)?;
    let source_lib = MediaLibrary::new(source_kind, source);
    let target_lib = MediaLibrary::new(target_kind, target);

    if options.dry_run {
        info!("SOURCE: {}", source.display());
        info!("TARGET: {}", target.display());
        info!("CONVERTING {} TO {}", source_kind, target_kind);
    } else {
        info!(
            "Syncing {} library '{}' into {} library '{}'",
            source_kind,
            source.display(),
            target_kind,
            target.display()
        );
    }

    let summary = match scope {
        Scope::Library => sync_library(&source_lib, &target_lib, options)?,
        Scope::Movie(folder) => sync_movie(&source_lib, &target_lib, folder, options)?,
    };

    if summary.failures > 0 {
        warn!("{} item(s) could not be synchronized", summary.failures);
    }
    info!("{}", summary);
    Ok(summary)
}

fn sync_library(
    source: &MediaLibrary,
    target: &MediaLibrary,
    options: &SyncOptions,
) -> Result<SyncSummary> {
    // An unmounted share looks like an empty library.
    if options.delete && source.count_folders()? == 0 {
        return Err(SyncError::EmptySource(source.base_dir().to_path_buf()));
    }

    let plan = reconcile::plan(source, target)?;
    fsops::create_dir(target.base_dir(), options.dry_run)?;

    let mut summary = SyncSummary {
        movies: plan.len(),
        ..Default::default()
    };
    for (source_path, _, movie) in plan.movies() {
        if is_interrupted() {
            return Err(SyncError::Interrupted);
        }
        match hardlinks::process_movie(source, target, source_path, movie, options) {
            Ok(stats) => summary.add(&stats),
            // One broken movie folder must not stop the others.
            Err(e) => {
                error!("{}", e);
                summary.failures += 1;
            }
        }
    }

    // Nothing to clean up in a root that only exists in a dry run.
    if target.base_dir().is_dir() {
        summary.files_removed += plan.finalize(options.delete, options.dry_run)?;
    }
    Ok(summary)
}

fn sync_movie(
    source: &MediaLibrary,
    target: &MediaLibrary,
    folder: &Path,
    options: &SyncOptions,
) -> Result<SyncSummary> {
    let (source_path, _, movie) = reconcile::plan_single(source, target, folder)?;
    fsops::create_dir(target.base_dir(), options.dry_run)?;

    if is_interrupted() {
        return Err(SyncError::Interrupted);
    }
    let stats = hardlinks::process_movie(source, target, &source_path, &movie, options)?;
    let mut summary = SyncSummary {
        movies: 1,
        ..Default::default()
    };
    summary.add(&stats);
    Ok(summary)
}
