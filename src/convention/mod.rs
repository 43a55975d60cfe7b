//! The two naming conventions a movie library can follow.
//!
//! Both conventions expose the same four operations: generate a folder name,
//! generate a video file name, and parse either of them back into
//! [`MovieInfo`] / [`VideoInfo`]. The set is closed, so dispatch is a plain
//! `match` over [`Convention`].

mod jellyfin;
mod plex;
mod variant;

use crate::model::{MovieInfo, VideoInfo};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// A bare resolution label such as `1080p` or `576i`.
pub(crate) static RESOLUTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}[pi]$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// `Title (Year) [imdbid-tt123] - BD Director's Cut.mkv`
    Jellyfin,
    /// `Title (Year) {imdb-tt123} {edition-Director's Cut} [1080p].mkv`
    Plex,
}

impl Convention {
    pub fn kind(self) -> &'static str {
        match self {
            Convention::Jellyfin => "jellyfin",
            Convention::Plex => "plex",
        }
    }

    /// The convention a library of this kind gets converted into.
    pub fn counterpart(self) -> Convention {
        match self {
            Convention::Jellyfin => Convention::Plex,
            Convention::Plex => Convention::Jellyfin,
        }
    }

    /// Exact folder name this convention expects for `movie`.
    pub fn movie_name(self, movie: &MovieInfo) -> String {
        match self {
            Convention::Jellyfin => jellyfin::movie_name(movie),
            Convention::Plex => plex::movie_name(movie),
        }
    }

    /// Exact file name (extension included) for one video of `movie`.
    pub fn video_name(self, movie: &MovieInfo, video: &VideoInfo) -> String {
        match self {
            Convention::Jellyfin => jellyfin::video_name(movie, video),
            Convention::Plex => plex::video_name(movie, video),
        }
    }

    /// `None` means the folder name does not follow this convention's grammar.
    pub fn parse_movie_name(self, name: &str) -> Option<MovieInfo> {
        match self {
            Convention::Jellyfin => jellyfin::parse_movie_name(name),
            Convention::Plex => plex::parse_movie_name(name),
        }
    }

    pub fn parse_video_name(self, name: &str) -> Option<VideoInfo> {
        match self {
            Convention::Jellyfin => jellyfin::parse_video_name(name),
            Convention::Plex => plex::parse_video_name(name),
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Jellyfin => f.write_str("Jellyfin"),
            Convention::Plex => f.write_str("Plex"),
        }
    }
}

/// Split a file name into stem and lower-cased extension (with dot).
///
/// A leading dot does not start an extension, so `.mkv` is all stem.
pub(crate) fn split_extension(name: &str) -> (&str, String) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], name[idx..].to_lowercase()),
        _ => (name, String::new()),
    }
}

/// Collapse whitespace runs into single spaces and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
