use crate::convention::Convention;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = SyncError> = std::result::Result<T, E>;

/// Exit code for configuration and validation failures.
pub const EXIT_CONFIG: u8 = 1;
/// Exit code when the user interrupted the run.
pub const EXIT_INTERRUPTED: u8 = 10;
/// Exit code for anything unexpected.
pub const EXIT_UNEXPECTED: u8 = 99;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Can not transfer library into itself: '{}'", .0.display())]
    SameLibrary(PathBuf),

    #[error("Source directory '{}' does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("Target directory '{}' does not exist (pass --create to create it)", .0.display())]
    MissingTarget(PathBuf),

    #[error("Unable to determine source library type, please provide --convert-to option")]
    UndetectableConvention,

    #[error(
        "Source library '{}' contains no movie folders; refusing to delete anything in the target. Is it mounted?",
        .0.display()
    )]
    EmptySource(PathBuf),

    #[error("{0}")]
    Conflicts(ConflictReport),

    #[error("Conflicting video files in '{movie}': '{first}' and '{second}' both map to '{target}'")]
    VideoConflict {
        movie: String,
        first: String,
        second: String,
        target: String,
    },

    #[error(
        "'{}' is not located inside the source library '{}'",
        .path.display(),
        .root.display()
    )]
    OutsideSource { path: PathBuf, root: PathBuf },

    #[error("Folder name '{name}' does not follow the {convention} naming convention")]
    UnparsableFolder { name: String, convention: Convention },

    #[error("Interrupted")]
    Interrupted,

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::Interrupted => EXIT_INTERRUPTED,
            SyncError::Fs(_) | SyncError::Io { .. } => EXIT_UNEXPECTED,
            _ => EXIT_CONFIG,
        }
    }
}

/// Target names claimed by more than one source folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    conflicts: BTreeMap<String, Vec<String>>,
}

impl ConflictReport {
    pub(crate) fn insert(&mut self, target: String, mut sources: Vec<String>) {
        sources.sort();
        self.conflicts.insert(target, sources);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// Source folder names competing for `target`.
    pub fn sources(&self, target: &str) -> Option<&[String]> {
        self.conflicts.get(target).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.conflicts
            .iter()
            .map(|(target, sources)| (target.as_str(), sources.as_slice()))
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} conflicting target folder(s), solve them first to proceed:",
            self.conflicts.len()
        )?;
        for (target, sources) in &self.conflicts {
            let quoted = sources
                .iter()
                .map(|s| format!("'{s}'"))
                .collect::<Vec<String>>()
                .join(", ");
            write!(f, "\n  - {quoted} → '{target}'")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Link,
    Unlink,
    Rename,
    Remove,
    CreateDir,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FsOp::Link => "hardlink",
            FsOp::Unlink => "unlink",
            FsOp::Rename => "rename",
            FsOp::Remove => "remove",
            FsOp::CreateDir => "create directory",
        })
    }
}

/// A failed filesystem mutation, classified by cause.
#[derive(Error, Debug)]
pub enum FsError {
    #[error(
        "Failed to {op} '{}': source and target are on different filesystems, hardlinks can not cross devices", .path.display()
    )]
    CrossDevice { op: FsOp, path: PathBuf },

    #[error("Failed to {op} '{}': permission denied", .path.display())]
    PermissionDenied { op: FsOp, path: PathBuf },

    #[error("Failed to {op} '{}': file not found", .path.display())]
    NotFound { op: FsOp, path: PathBuf },

    #[error("Failed to {op} '{}': target already exists", .path.display())]
    AlreadyExists { op: FsOp, path: PathBuf },

    #[error("Failed to {op} '{}': device or resource busy", .path.display())]
    Busy { op: FsOp, path: PathBuf },

    #[error("Failed to {op} '{}': {source}", .path.display())]
    Other {
        op: FsOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    pub(crate) fn classify(op: FsOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::CrossesDevices => FsError::CrossDevice { op, path },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { op, path },
            io::ErrorKind::NotFound => FsError::NotFound { op, path },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists { op, path },
            io::ErrorKind::ResourceBusy => FsError::Busy { op, path },
            _ => FsError::Other { op, path, source },
        }
    }
}
