//! Single filesystem mutations shared by the movie and asset synchronizers.
//!
//! Each helper performs one atomic operation (link, unlink, rename, remove)
//! and turns the `io::Error` into a classified [`FsError`]. Dry runs log the
//! intended action and return without touching anything.

use crate::error::{FsError, FsOp};
use std::fs::Metadata;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Identity of the data a directory entry points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    dev: u64,
    ino: u64,
}

#[cfg(unix)]
pub fn file_id(metadata: &Metadata) -> Option<FileId> {
    use std::os::unix::fs::MetadataExt;
    Some(FileId {
        dev: metadata.dev(),
        ino: metadata.ino(),
    })
}

#[cfg(not(unix))]
pub fn file_id(_metadata: &Metadata) -> Option<FileId> {
    None
}

/// Whether `a` and `b` are hardlinks of the same file.
///
/// Unknown identity counts as "different", which makes callers relink.
pub fn same_file(a: &Metadata, b: &Metadata) -> bool {
    match (file_id(a), file_id(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// What [`link_file`] did to bring `dest` in line with `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// `dest` already was a hardlink of `source`.
    Unchanged,
    /// A different file at `dest` was replaced.
    Replaced,
    /// `dest` did not exist and was linked.
    Created,
}

/// Skip if same inode, replace if different inode, create if absent.
pub fn link_file(source: &Path, dest: &Path, dry_run: bool) -> Result<LinkOutcome, FsError> {
    let source_meta =
        std::fs::metadata(source).map_err(|e| FsError::classify(FsOp::Link, source, e))?;

    match std::fs::symlink_metadata(dest) {
        Ok(dest_meta) => {
            if same_file(&source_meta, &dest_meta) {
                debug!("Target file '{}' already exists, skipping", dest.display());
                return Ok(LinkOutcome::Unchanged);
            }
            if dry_run {
                info!("RELINK {}", dest.display());
                return Ok(LinkOutcome::Replaced);
            }
            remove_item(dest, false)?;
            hard_link(source, dest, false)?;
            Ok(LinkOutcome::Replaced)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            hard_link(source, dest, dry_run)?;
            Ok(LinkOutcome::Created)
        }
        Err(e) => Err(FsError::classify(FsOp::Link, dest, e)),
    }
}

pub fn hard_link(source: &Path, dest: &Path, dry_run: bool) -> Result<(), FsError> {
    if dry_run {
        info!("LINK   {}", dest.display());
        return Ok(());
    }
    std::fs::hard_link(source, dest).map_err(|e| FsError::classify(FsOp::Link, dest, e))
}

pub fn rename(from: &Path, to: &Path, dry_run: bool) -> Result<(), FsError> {
    if dry_run {
        info!("RENAME {} → {}", from.display(), to.display());
        return Ok(());
    }
    std::fs::rename(from, to).map_err(|e| FsError::classify(FsOp::Rename, from, e))
}

pub fn create_dir(path: &Path, dry_run: bool) -> Result<(), FsError> {
    if path.is_dir() {
        return Ok(());
    }
    if dry_run {
        info!("MKDIR  {}", path.display());
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|e| FsError::classify(FsOp::CreateDir, path, e))
}

/// Remove a file, symlink or whole directory tree.
///
/// An entry that is already gone counts as removed. Sockets, FIFOs and
/// device nodes are refused with an error.
pub fn remove_item(path: &Path, dry_run: bool) -> Result<(), FsError> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(FsError::classify(FsOp::Remove, path, e)),
    };

    let file_type = metadata.file_type();
    if !(file_type.is_dir() || file_type.is_file() || file_type.is_symlink()) {
        return Err(FsError::Other {
            op: FsOp::Remove,
            path: path.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::Unsupported,
                "not a regular file, symlink or directory",
            ),
        });
    }

    if dry_run {
        info!("DELETE {}", path.display());
        return Ok(());
    }

    let (op, result) = if file_type.is_dir() {
        (FsOp::Remove, std::fs::remove_dir_all(path))
    } else {
        (FsOp::Unlink, std::fs::remove_file(path))
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FsError::classify(op, path, e)),
    }
}
