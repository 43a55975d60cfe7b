//! Maps a whole source library onto the target library's namespace.
//!
//! [`plan`] scans the source once, computes the target folder name of every
//! movie and refuses to continue when two source folders claim the same
//! target name. A [`LibraryPlan`] then hands out the movies to synchronize
//! and finally cleans up target entries that no source folder produced.

use crate::error::{ConflictReport, Result, SyncError};
use crate::fsops;
use crate::library::MediaLibrary;
use crate::model::MovieInfo;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Conflict-free mapping of target folder names to source folders.
#[derive(Debug)]
pub struct LibraryPlan<'a> {
    source: &'a MediaLibrary,
    target: &'a MediaLibrary,
    movies: BTreeMap<String, (PathBuf, MovieInfo)>,
}

/// Fail when both libraries point at the same directory.
pub fn ensure_distinct(source: &MediaLibrary, target: &MediaLibrary) -> Result<()> {
    if std::ptr::eq(source, target) {
        return Err(SyncError::SameLibrary(source.base_dir().to_path_buf()));
    }
    ensure_distinct_paths(source.base_dir(), target.base_dir())
}

/// Fail when `source` and `target` name the same directory.
///
/// Only compares paths, so it can run before anything is scanned.
pub fn ensure_distinct_paths(source: &Path, target: &Path) -> Result<()> {
    if source == target {
        return Err(SyncError::SameLibrary(source.to_path_buf()));
    }
    if let (Ok(a), Ok(b)) = (std::fs::canonicalize(source), std::fs::canonicalize(target))
        && a == b
    {
        return Err(SyncError::SameLibrary(a));
    }
    Ok(())
}

/// Scan `source` and resolve every movie into `target`'s namespace.
pub fn plan<'a>(source: &'a MediaLibrary, target: &'a MediaLibrary) -> Result<LibraryPlan<'a>> {
    ensure_distinct(source, target)?;

    let mut claims: BTreeMap<String, Vec<(PathBuf, MovieInfo)>> = BTreeMap::new();
    for (path, movie) in source.scan()? {
        let target_name = target.convention().movie_name(&movie);
        claims.entry(target_name).or_default().push((path, movie));
    }

    let mut conflicts = ConflictReport::default();
    let mut movies = BTreeMap::new();
    for (target_name, mut sources) in claims {
        if sources.len() > 1 {
            let names = sources.iter().map(|(path, _)| folder_name(path)).collect();
            conflicts.insert(target_name, names);
        } else if let Some(item) = sources.pop() {
            movies.insert(target_name, item);
        }
    }

    if !conflicts.is_empty() {
        for (target_name, sources) in conflicts.iter() {
            let quoted = sources
                .iter()
                .map(|s| format!("'{s}'"))
                .collect::<Vec<String>>()
                .join(", ");
            error!("Conflicting folders: {} → '{}'", quoted, target_name);
        }
        info!("You have to solve the conflicts first to proceed");
        return Err(SyncError::Conflicts(conflicts));
    }

    Ok(LibraryPlan {
        source,
        target,
        movies,
    })
}

/// Resolve the single movie folder `folder` without touching the rest.
///
/// The folder still has to be the only source of its target name.
pub fn plan_single(
    source: &MediaLibrary,
    target: &MediaLibrary,
    folder: &Path,
) -> Result<(PathBuf, PathBuf, MovieInfo)> {
    ensure_distinct(source, target)?;

    let folder = locate_movie_folder(source.base_dir(), folder)?;
    let movie = source
        .parse_movie_path(&folder)
        .ok_or_else(|| SyncError::UnparsableFolder {
            name: folder_name(&folder),
            convention: source.convention(),
        })?;
    let target_name = target.convention().movie_name(&movie);

    let rivals: Vec<String> = source
        .scan()?
        .filter(|(path, other)| {
            path.file_name() != folder.file_name()
                && target.convention().movie_name(other) == target_name
        })
        .map(|(path, _)| folder_name(&path))
        .collect();
    if !rivals.is_empty() {
        let mut conflicts = ConflictReport::default();
        let mut names = rivals;
        names.push(folder_name(&folder));
        conflicts.insert(target_name, names);
        return Err(SyncError::Conflicts(conflicts));
    }

    let target_path = target.base_dir().join(&target_name);
    Ok((folder, target_path, movie))
}

/// Find the first-level folder of `root` that contains `path`.
fn locate_movie_folder(root: &Path, path: &Path) -> Result<PathBuf> {
    let outside = || SyncError::OutsideSource {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    let resolved = std::fs::canonicalize(&absolute).map_err(|_| outside())?;
    let root = std::fs::canonicalize(root).map_err(|e| SyncError::io(root, e))?;

    let relative = resolved.strip_prefix(&root).map_err(|_| outside())?;
    let first = relative.components().next().ok_or_else(outside)?;
    let folder = root.join(first);
    if !folder.is_dir() {
        return Err(outside());
    }
    Ok(folder)
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl<'a> LibraryPlan<'a> {
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn source(&self) -> &'a MediaLibrary {
        self.source
    }

    pub fn target(&self) -> &'a MediaLibrary {
        self.target
    }

    /// `(source folder, target folder, movie)` for every resolved movie.
    pub fn movies(&self) -> impl Iterator<Item = (&Path, PathBuf, &MovieInfo)> + '_ {
        self.movies.iter().map(|(target_name, (path, movie))| {
            (
                path.as_path(),
                self.target.base_dir().join(target_name),
                movie,
            )
        })
    }

    /// Top-level target entries that no source folder maps to.
    pub fn stray_entries(&self) -> Result<Vec<PathBuf>> {
        let base_dir = self.target.base_dir();
        let entries = std::fs::read_dir(base_dir).map_err(|e| SyncError::io(base_dir, e))?;
        let expected: HashSet<&str> = self.movies.keys().map(String::as_str).collect();

        let mut strays = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SyncError::io(base_dir, e))?;
            let name = entry.file_name();
            let known = name.to_str().is_some_and(|n| expected.contains(n));
            if !known {
                strays.push(entry.path());
            }
        }
        strays.sort();
        Ok(strays)
    }

    /// Report stray entries, or remove them when `delete` is set.
    ///
    /// Returns the number of removed entries; failures are logged and
    /// skipped.
    pub fn finalize(&self, delete: bool, dry_run: bool) -> Result<usize> {
        let mut removed = 0;
        for entry in self.stray_entries()? {
            let name = folder_name(&entry);
            if !delete {
                info!("Stray item '{}' found", name);
                continue;
            }
            if !dry_run {
                info!("Removing stray item '{}' in target library", name);
            }
            match fsops::remove_item(&entry, dry_run) {
                Ok(()) => removed += 1,
                Err(e) => warn!("{}", e),
            }
        }
        Ok(removed)
    }
}
