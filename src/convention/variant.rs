//! The free-text variant suffix of Jellyfin video names.
//!
//! In `Das Boot (1981) - BD Director's Cut.mkv` the variant is
//! `BD Director's Cut`: a resolution shorthand plus the edition text. The
//! shorthand may sit at either end of the variant, so parsing checks the first
//! word, then the last word, and treats everything else as the edition.

use super::RESOLUTION_PATTERN;
use crate::model::VideoInfo;
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Resolution and extra tags recognized in a single variant word.
#[derive(Debug, Default, PartialEq, Eq)]
struct ResolutionMatch {
    resolution: Option<String>,
    tags: BTreeSet<String>,
}

impl ResolutionMatch {
    fn from_shorthand(resolution: Option<&str>, tag: Option<&str>, caps: &Captures<'_>) -> Self {
        let mut tags = BTreeSet::new();
        if let Some(tag) = tag {
            tags.insert(tag.to_string());
        }
        if let Some(extra) = caps.get(1) {
            tags.insert(extra.as_str().to_string());
        }
        Self {
            resolution: resolution.map(str::to_string),
            tags,
        }
    }
}

type Resolve = fn(&Captures<'_>) -> ResolutionMatch;

fn uhd(caps: &Captures<'_>) -> ResolutionMatch {
    ResolutionMatch::from_shorthand(Some("2160p"), None, caps)
}

fn blu_ray(caps: &Captures<'_>) -> ResolutionMatch {
    ResolutionMatch::from_shorthand(Some("1080p"), None, caps)
}

fn dvd(caps: &Captures<'_>) -> ResolutionMatch {
    ResolutionMatch::from_shorthand(None, Some("DVD"), caps)
}

fn literal(caps: &Captures<'_>) -> ResolutionMatch {
    ResolutionMatch {
        resolution: Some(caps[0].to_string()),
        tags: BTreeSet::new(),
    }
}

/// Ordered: the shorthands must be tried before the generic digit pattern.
static RESOLUTION_RULES: LazyLock<Vec<(Regex, Resolve)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"^4k(?:[.\-](\w+))?$").unwrap(), uhd as Resolve),
        (Regex::new(r"^BD(?:[.\-](\w+))?$").unwrap(), blu_ray as Resolve),
        (Regex::new(r"^DVD(?:[.\-](\w+))?$").unwrap(), dvd as Resolve),
        (RESOLUTION_PATTERN.clone(), literal as Resolve),
    ]
});

static RESOLUTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{3,4})[pi]$").unwrap());

fn match_resolution(word: &str) -> Option<ResolutionMatch> {
    RESOLUTION_RULES
        .iter()
        .find_map(|(pattern, resolve)| pattern.captures(word).map(|caps| resolve(&caps)))
}

/// Parse `variant` into edition, resolution and tags on top of `video`.
pub(super) fn parse(variant: &str, video: VideoInfo) -> VideoInfo {
    let words: Vec<&str> = variant.split(' ').collect();
    let last = words.len() - 1;

    let (found, edition) = match match_resolution(words[0]) {
        Some(found) => (Some(found), words[1..].join(" ")),
        None if last > 0 => match match_resolution(words[last]) {
            Some(found) => (Some(found), words[..last].join(" ")),
            None => (None, variant.to_string()),
        },
        None => (None, variant.to_string()),
    };

    let mut video = video;
    let edition = edition.trim();
    video.edition = (!edition.is_empty()).then(|| edition.to_string());
    if let Some(found) = found {
        video.tags.extend(found.tags);
        if let Some(resolution) = found.resolution {
            video = video.with_resolution(resolution);
        }
    }
    video
}

/// Tokens of the variant suffix for `video`; empty means "no suffix".
pub(super) fn render(video: &VideoInfo) -> Vec<String> {
    let mut tokens = Vec::new();
    if let Some(resolution) = &video.resolution {
        tokens.push(shorthand(resolution));
    } else if video.has_tag("DVD") {
        tokens.push("DVD".to_string());
    }
    if let Some(edition) = video.edition.as_deref().filter(|e| !e.is_empty()) {
        tokens.push(edition.to_string());
    }
    tokens
}

fn shorthand(resolution: &str) -> String {
    let number = RESOLUTION_NUMBER
        .captures(resolution)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    match number {
        Some("1080") => "BD".to_string(),
        Some("2160") => "4k".to_string(),
        Some("480") | Some("576") => "DVD".to_string(),
        _ => resolution.to_string(),
    }
}
