use super::{split_extension, variant};
use crate::model::{ExternalId, MovieInfo, VideoInfo};
use regex::Regex;
use std::sync::LazyLock;

/// A provider id block at the start of a variant, e.g. `[imdbid-tt123456]`.
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[a-zA-Z]+id-[^\]]+\]").unwrap());

/// Folder name patterns, most specific first. The first match wins.
static MOVIE_PATTERNS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        r"^(?P<title>.+?)\s+\((?P<year>[0-9]{4})\)\s* - \s*\[(?P<provider_id>[a-zA-Z]+id-[^\]]+)\]",
        r"^(?P<title>.+?)\s+\((?P<year>[0-9]{4})\)\s+\[(?P<provider_id>[a-zA-Z]+id-[^\]]+)\]",
        r"^(?P<title>.+?)\s+\((?P<year>[0-9]{4})\)$",
        r"^(?P<title>.+?)\s+\[(?P<provider_id>[a-zA-Z]+id-[^\]]+)\]",
        r"^(?P<title>.+?)$",
    ]
    .map(|pattern| Regex::new(pattern).unwrap())
});

pub(super) fn movie_name(movie: &MovieInfo) -> String {
    let mut parts = vec![movie.title.clone()];
    if let Some(year) = &movie.year {
        parts.push(format!("({year})"));
    }
    if let Some(ExternalId { provider, id }) = &movie.external_id {
        parts.push(format!("[{provider}id-{id}]"));
    }
    parts.join(" ")
}

pub(super) fn video_name(movie: &MovieInfo, video: &VideoInfo) -> String {
    let variant = variant::render(video);
    if variant.is_empty() {
        format!("{}{}", movie_name(movie), video.extension)
    } else {
        format!(
            "{} - {}{}",
            movie_name(movie),
            variant.join(" "),
            video.extension
        )
    }
}

pub(super) fn parse_movie_name(name: &str) -> Option<MovieInfo> {
    let caps = MOVIE_PATTERNS.iter().find_map(|re| re.captures(name))?;

    let title = caps.name("title")?.as_str().trim();
    if title.is_empty() {
        return None;
    }

    Some(MovieInfo {
        title: title.to_string(),
        year: caps.name("year").map(|m| m.as_str().to_string()),
        external_id: caps
            .name("provider_id")
            .and_then(|m| split_provider_id(m.as_str())),
    })
}

/// `imdbid-tt123` -> `imdb` / `tt123`
fn split_provider_id(block: &str) -> Option<ExternalId> {
    let (key, id) = block.split_once('-')?;
    let provider = key.strip_suffix("id").unwrap_or(key).to_lowercase();
    Some(ExternalId::new(provider, id))
}

pub(super) fn parse_video_name(name: &str) -> Option<VideoInfo> {
    if name.is_empty() {
        return None;
    }
    let (stem, extension) = split_extension(name);
    let video = VideoInfo::new(extension);

    // Jellyfin requires " - " in front of the variant.
    let Some((_, variant)) = stem.rsplit_once(" - ") else {
        return Some(video);
    };
    if ID_PATTERN.is_match(variant) {
        // "Title (1984) - [imdbid-tt123]" carries an id, not an edition
        return Some(video);
    }

    let variant = variant
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    Some(variant::parse(variant, video))
}
