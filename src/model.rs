//! Plain value records produced and consumed by the naming conventions.
//!
//! A [`MovieInfo`] identifies a movie folder, a [`VideoInfo`] describes one
//! video file inside it. Both are created fresh by every parse call and carry
//! no references to the filesystem.

use std::collections::BTreeSet;
use std::fmt;

/// External metadata id of a movie, e.g. `imdb` / `tt0082096`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalId {
    pub provider: String,
    pub id: String,
}

impl ExternalId {
    pub fn new(provider: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.provider, self.id)
    }
}

/// Metadata for the whole movie.
///
/// Equality over all fields is what the reconciler uses to decide whether
/// two source folders collide in the target library.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieInfo {
    pub title: String,
    pub year: Option<String>,
    pub external_id: Option<ExternalId>,
}

impl MovieInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            external_id: None,
        }
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_external_id(mut self, provider: impl Into<String>, id: impl Into<String>) -> Self {
        self.external_id = Some(ExternalId::new(provider, id));
        self
    }

    pub fn provider(&self) -> Option<&str> {
        self.external_id.as_ref().map(|e| e.provider.as_str())
    }

    pub fn movie_id(&self) -> Option<&str> {
        self.external_id.as_ref().map(|e| e.id.as_str())
    }
}

/// Metadata for a single video file.
///
/// `tags` and `providers` are ordered so that generated names are stable
/// from run to run. An empty set means "absent".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoInfo {
    /// Lower-cased, including the leading dot (`.mkv`). Empty when the file
    /// name has no extension.
    pub extension: String,
    pub edition: Option<String>,
    pub resolution: Option<String>,
    pub tags: BTreeSet<String>,
    /// `"<provider>-<id>"` entries; only Plex names can carry them.
    pub providers: BTreeSet<String>,
}

impl VideoInfo {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ..Default::default()
        }
    }

    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into());
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        let resolution = resolution.into();
        self.tags.remove(&resolution);
        self.resolution = Some(resolution);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if self.resolution.as_deref() != Some(tag.as_str()) {
            self.tags.insert(tag);
        }
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>, id: impl Into<String>) -> Self {
        self.providers.insert(ExternalId::new(provider, id).to_string());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
