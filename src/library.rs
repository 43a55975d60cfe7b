use crate::convention::Convention;
use crate::error::{Result, SyncError};
use crate::model::{MovieInfo, VideoInfo};
use std::path::{Path, PathBuf};
use tracing::warn;

/// File suffixes treated as movie videos.
pub const ACCEPTED_VIDEO_SUFFIXES: &[&str] = &[
    ".mkv", ".m4v", ".mp4", ".avi", ".mov", ".ts", ".m2ts", ".webm", ".wmv", ".mpg", ".mpeg",
];

/// File suffixes that travel along with the video sharing their stem.
pub const ACCEPTED_SIDECAR_SUFFIXES: &[&str] = &[
    ".srt", ".ass", ".ssa", ".sub", ".idx", ".vtt", ".sup", ".edl", ".nfo", ".xml",
];

/// Lower-cased final suffix of `name` including the dot, if any.
pub(crate) fn suffix_of(name: &str) -> Option<String> {
    match name.rfind('.') {
        Some(idx) if idx > 0 => Some(name[idx..].to_lowercase()),
        _ => None,
    }
}

pub fn is_video_name(name: &str) -> bool {
    suffix_of(name).is_some_and(|s| ACCEPTED_VIDEO_SUFFIXES.contains(&s.as_str()))
}

pub fn is_sidecar_name(name: &str) -> bool {
    suffix_of(name).is_some_and(|s| ACCEPTED_SIDECAR_SUFFIXES.contains(&s.as_str()))
}

/// Hidden entries (`.grab`, `.DS_Store`, ...) are never movie content.
pub(crate) fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// A library root together with the convention its folders follow.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    convention: Convention,
    base_dir: PathBuf,
}

impl MediaLibrary {
    pub fn new(convention: Convention, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            convention,
            base_dir: base_dir.into(),
        }
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn movie_path(&self, movie: &MovieInfo) -> PathBuf {
        self.base_dir.join(self.convention.movie_name(movie))
    }

    pub fn video_path(&self, movie: &MovieInfo, video: &VideoInfo) -> PathBuf {
        self.movie_path(movie).join(self.convention.video_name(movie, video))
    }

    /// Parse a movie folder; the name is taken from the last path component.
    pub fn parse_movie_path(&self, path: &Path) -> Option<MovieInfo> {
        let name = path.file_name()?.to_str()?;
        self.convention.parse_movie_name(name)
    }

    pub fn parse_video_path(&self, path: &Path) -> Option<VideoInfo> {
        let name = path.file_name()?.to_str()?;
        self.convention.parse_video_name(name)
    }

    /// Lazily walk the first-level movie folders of the library.
    ///
    /// Folders whose names do not parse are logged and left out. Each call
    /// starts a fresh directory listing.
    pub fn scan(&self) -> Result<impl Iterator<Item = (PathBuf, MovieInfo)> + '_> {
        let entries =
            std::fs::read_dir(&self.base_dir).map_err(|e| SyncError::io(&self.base_dir, e))?;

        Ok(entries.filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(
                        "Failed to read entry in '{}': {}",
                        self.base_dir.display(),
                        e
                    );
                    return None;
                }
            };
            let path = entry.path();
            if !path.is_dir() {
                return None;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                warn!("Ignoring folder with non UTF-8 name: {}", path.display());
                return None;
            };
            if is_hidden(name) {
                return None;
            }
            match self.convention.parse_movie_name(name) {
                Some(movie) => Some((path, movie)),
                None => {
                    warn!("Ignoring folder with unparsable name: {}", name);
                    None
                }
            }
        }))
    }

    /// Number of first-level directories, hidden ones excluded.
    pub fn count_folders(&self) -> Result<usize> {
        let entries =
            std::fs::read_dir(&self.base_dir).map_err(|e| SyncError::io(&self.base_dir, e))?;
        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|e| SyncError::io(&self.base_dir, e))?;
            let hidden = entry.file_name().to_str().is_some_and(is_hidden);
            if !hidden && entry.path().is_dir() {
                count += 1;
            }
        }
        Ok(count)
    }
}
