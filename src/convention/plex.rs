use super::{RESOLUTION_PATTERN, collapse_whitespace, split_extension};
use crate::model::{ExternalId, MovieInfo, VideoInfo};
use regex::Regex;
use std::sync::LazyLock;

static MOVIE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<title>.+?)\s+\((?P<year>[0-9]{4})\)").unwrap());

/// `{KEY-VALUE}` blocks: provider ids and editions.
static META_BLOCK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z]+)-([^}]+)\}").unwrap());

/// `[LABEL]` blocks: resolution and free tags.
static INFO_BLOCK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

const METADATA_PROVIDERS: [&str; 3] = ["imdb", "tmdb", "tvdb"];

fn known_provider(key: &str) -> Option<String> {
    let key = key.trim().to_lowercase();
    METADATA_PROVIDERS.contains(&key.as_str()).then_some(key)
}

pub(super) fn movie_name(movie: &MovieInfo) -> String {
    let mut parts = vec![movie.title.clone()];
    if let Some(year) = &movie.year {
        parts.push(format!("({year})"));
    }
    if let Some(external_id) = &movie.external_id {
        parts.push(format!("{{{external_id}}}"));
    }
    parts.join(" ")
}

pub(super) fn video_name(movie: &MovieInfo, video: &VideoInfo) -> String {
    let mut parts = vec![movie_name(movie)];

    let own_id = movie.external_id.as_ref().map(ExternalId::to_string);
    parts.extend(
        video
            .providers
            .iter()
            .filter(|p| own_id.as_ref() != Some(*p))
            .map(|p| format!("{{{p}}}")),
    );

    if let Some(edition) = video.edition.as_deref().filter(|e| !e.is_empty()) {
        parts.push(format!("{{edition-{edition}}}"));
    }

    let tags: String = video
        .tags
        .iter()
        .filter(|t| video.resolution.as_ref() != Some(*t))
        .map(|t| format!("[{t}]"))
        .collect();
    if !tags.is_empty() {
        parts.push(tags);
    }

    if let Some(resolution) = &video.resolution {
        parts.push(format!("[{resolution}]"));
    }

    format!("{}{}", parts.join(" "), video.extension)
}

pub(super) fn parse_movie_name(name: &str) -> Option<MovieInfo> {
    let mut external_id = None;
    for caps in META_BLOCK_PATTERN.captures_iter(name) {
        if let Some(provider) = known_provider(&caps[1]) {
            external_id = Some(ExternalId::new(provider, caps[2].trim()));
        }
    }

    // Unknown `{key-value}` blocks are dropped together with the known ones.
    let leftover = META_BLOCK_PATTERN.replace_all(name, "");
    let leftover = INFO_BLOCK_PATTERN.replace_all(&leftover, "");
    let leftover = collapse_whitespace(&leftover);

    let (title, year) = match MOVIE_PATTERN.captures(&leftover) {
        Some(caps) => (
            caps["title"].trim().to_string(),
            Some(caps["year"].to_string()),
        ),
        None => (leftover.clone(), None),
    };

    if title.is_empty() {
        return None;
    }

    Some(MovieInfo {
        title,
        year,
        external_id,
    })
}

pub(super) fn parse_video_name(name: &str) -> Option<VideoInfo> {
    if name.is_empty() {
        return None;
    }
    let (stem, extension) = split_extension(name);
    let mut video = VideoInfo::new(extension);

    for caps in META_BLOCK_PATTERN.captures_iter(stem) {
        if caps[1].eq_ignore_ascii_case("edition") {
            video.edition = Some(caps[2].to_string());
        } else if let Some(provider) = known_provider(&caps[1]) {
            video = video.with_provider(provider, caps[2].trim());
        }
    }

    let leftover = META_BLOCK_PATTERN.replace_all(stem, "");
    for caps in INFO_BLOCK_PATTERN.captures_iter(&leftover) {
        let label = caps[1].trim();
        if label.is_empty() {
            continue;
        }
        if RESOLUTION_PATTERN.is_match(label) {
            video.resolution = Some(label.to_string());
        } else {
            video.tags.insert(label.to_string());
        }
    }
    if let Some(resolution) = &video.resolution {
        video.tags.remove(resolution);
    }

    Some(video)
}
