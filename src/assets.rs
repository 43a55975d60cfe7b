//! Mirrors non-video subfolders (extras, artwork, ...) of a movie folder.
//!
//! Files are hardlinked with the same rule as videos: skip when the target is
//! already the same inode, replace when it differs, link when it is missing.
//! Names are kept as they are.

use crate::error::{FsError, Result, SyncError};
use crate::fsops::{self, LinkOutcome};
use crate::sync::SyncOptions;
use std::path::Path;
use tracing::{error, info};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetStats {
    pub files_total: usize,
    pub files_linked: usize,
    pub items_removed: usize,
    pub failures: usize,
}

impl AssetStats {
    pub fn add(&mut self, other: &AssetStats) {
        self.files_total += other.files_total;
        self.files_linked += other.files_linked;
        self.items_removed += other.items_removed;
        self.failures += other.failures;
    }
}

/// Recursively mirror `source_path` into `target_path`, depth first.
///
/// With `options.delete`, entries of the target tree without a source
/// counterpart are removed afterwards.
pub fn process_assets_folder(
    source_path: &Path,
    target_path: &Path,
    options: &SyncOptions,
) -> Result<AssetStats> {
    if !source_path.is_dir() {
        return Err(SyncError::io(
            source_path,
            std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a folder"),
        ));
    }

    let mut stats = AssetStats::default();
    fsops::create_dir(target_path, options.dry_run)?;

    let walker = WalkDir::new(source_path)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(source_path, e))?;
        let Ok(relative) = entry.path().strip_prefix(source_path) else {
            continue;
        };
        let dest = target_path.join(relative);

        let result = if entry.file_type().is_dir() {
            fsops::create_dir(&dest, options.dry_run)
        } else if entry.file_type().is_file() {
            stats.files_total += 1;
            link_asset(entry.path(), &dest, options, &mut stats)
        } else {
            Ok(())
        };

        if let Err(e) = result {
            error!("{}", e);
            stats.failures += 1;
        }
    }

    if options.delete {
        remove_strays(source_path, target_path, options, &mut stats)?;
    }

    Ok(stats)
}

fn link_asset(
    source: &Path,
    dest: &Path,
    options: &SyncOptions,
    stats: &mut AssetStats,
) -> Result<(), FsError> {
    // A directory where a file belongs has to go first.
    if dest.is_dir() && !dest.is_symlink() {
        fsops::remove_item(dest, options.dry_run)?;
    }
    match fsops::link_file(source, dest, options.dry_run)? {
        LinkOutcome::Unchanged => {
            if options.verbose {
                info!("Target file '{}' already exists, skipping", dest.display());
            }
        }
        LinkOutcome::Replaced | LinkOutcome::Created => stats.files_linked += 1,
    }
    Ok(())
}

fn remove_strays(
    source_path: &Path,
    target_path: &Path,
    options: &SyncOptions,
    stats: &mut AssetStats,
) -> Result<()> {
    if !target_path.is_dir() {
        return Ok(());
    }

    let mut walker = WalkDir::new(target_path)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| walk_error(target_path, e))?;
        let Ok(relative) = entry.path().strip_prefix(target_path) else {
            continue;
        };
        let counterpart = source_path.join(relative);
        let source_kind = std::fs::symlink_metadata(&counterpart)
            .ok()
            .map(|m| m.is_dir());
        let target_is_dir = entry.file_type().is_dir();
        // Missing in the source, or a file where the source has a folder.
        if source_kind == Some(target_is_dir) {
            continue;
        }

        info!(
            "Removing stray item '{}' in target folder",
            relative.display()
        );
        match fsops::remove_item(entry.path(), options.dry_run) {
            Ok(()) => stats.items_removed += 1,
            Err(e) => {
                error!("{}", e);
                stats.failures += 1;
            }
        }
        if target_is_dir {
            walker.skip_current_dir();
        }
    }
    Ok(())
}

fn walk_error(root: &Path, e: walkdir::Error) -> SyncError {
    let path = e.path().unwrap_or(root).to_path_buf();
    SyncError::io(path, e.into())
}
