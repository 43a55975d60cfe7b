//! Guess which naming convention a library follows from its video names.

use crate::convention::Convention;
use crate::library;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;
use walkdir::WalkDir;

/// Upper bound of video files looked at before deciding.
pub const DETECTION_SAMPLE_SIZE: usize = 500;

static JELLYFIN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[[a-z]+id-[^\]]+\]").unwrap());
static PLEX_META_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{[a-z]+-[^}]+\}").unwrap());
static YEAR_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([0-9]{4}\)").unwrap());
static PLEX_RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\d{3,4}[pi]\]").unwrap());
static PLEX_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[[a-z0-9.,]+\]").unwrap());

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Hints {
    jellyfin: usize,
    plex: usize,
}

/// What a single video stem says about its convention.
enum Evidence {
    Decisive(Convention),
    Hints(Hints),
}

fn inspect(stem: &str) -> Evidence {
    if JELLYFIN_ID.is_match(stem) {
        return Evidence::Decisive(Convention::Jellyfin);
    }
    if PLEX_META_BLOCK.is_match(stem) {
        return Evidence::Decisive(Convention::Plex);
    }

    let mut hints = Hints::default();
    if let Some((_, variant)) = stem.rsplit_once(" - ")
        && !YEAR_BLOCK.is_match(variant)
    {
        hints.jellyfin += 1;
    }
    if PLEX_RESOLUTION.is_match(stem) {
        hints.plex += 1;
    }
    if PLEX_LABEL.is_match(stem) {
        hints.plex += 1;
    }
    Evidence::Hints(hints)
}

/// Sample video names below `root` and pick the convention they follow.
///
/// Returns `None` when the sample gives no signal or a tie.
pub fn detect_convention(root: &Path) -> Option<Convention> {
    let videos = WalkDir::new(root)
        .max_depth(3)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| library::is_video_name(name))
        .take(DETECTION_SAMPLE_SIZE);

    detect_from_names(videos)
}

/// Same as [`detect_convention`], for names that were already collected.
pub fn detect_from_names<I, S>(names: I) -> Option<Convention>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut total = Hints::default();
    for name in names {
        let name = name.as_ref();
        let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        match inspect(stem) {
            Evidence::Decisive(convention) => {
                debug!("'{}' looks like a {} name", name, convention);
                return Some(convention);
            }
            Evidence::Hints(hints) => {
                total.jellyfin += hints.jellyfin;
                total.plex += hints.plex;
            }
        }
    }

    debug!(
        "Convention hints: {} Jellyfin, {} Plex",
        total.jellyfin, total.plex
    );
    match total.plex.cmp(&total.jellyfin) {
        std::cmp::Ordering::Greater => Some(Convention::Plex),
        std::cmp::Ordering::Less => Some(Convention::Jellyfin),
        std::cmp::Ordering::Equal => None,
    }
}
