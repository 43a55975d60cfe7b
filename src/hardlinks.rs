//! Per-movie synchronization of video files and their sidecars.
//!
//! Every video of the source folder gets the name the target convention
//! expects. Existing target files are matched by inode: a correct link is left
//! alone, a wrong file under the expected name is replaced, and a correct
//! file under an outdated name (a stale hardlink) is renamed or preserved
//! instead of being linked a second time.

use crate::assets::{self, AssetStats};
use crate::error::{FsError, FsOp, Result, SyncError};
use crate::fsops::{self, FileId};
use crate::library::{self, MediaLibrary};
use crate::model::{MovieInfo, VideoInfo};
use crate::sync::SyncOptions;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieStats {
    pub videos_total: usize,
    pub videos_linked: usize,
    pub videos_renamed: usize,
    pub sidecars_linked: usize,
    pub stale_preserved: usize,
    pub items_removed: usize,
    pub failures: usize,
    pub assets: AssetStats,
}

impl MovieStats {
    /// New links, replaced links and renames.
    pub fn files_updated(&self) -> usize {
        self.videos_linked + self.videos_renamed + self.sidecars_linked + self.assets.files_linked
    }

    pub fn files_removed(&self) -> usize {
        self.items_removed + self.assets.items_removed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Video,
    Sidecar,
}

#[derive(Debug)]
struct LinkJob {
    kind: FileKind,
    source: PathBuf,
    target: PathBuf,
}

/// Existing files of one target movie folder, keyed by inode.
///
/// Built once per movie and dropped with it.
#[derive(Debug, Default)]
struct InodeIndex {
    by_id: HashMap<FileId, Vec<PathBuf>>,
}

impl InodeIndex {
    fn build(dir: &Path) -> Result<Self> {
        let mut index = InodeIndex::default();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(index),
            Err(e) => return Err(SyncError::io(dir, e)),
        };
        for entry in entries {
            let entry = entry.map_err(|e| SyncError::io(dir, e))?;
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            if let Some(id) = fsops::file_id(&metadata) {
                index.by_id.entry(id).or_default().push(entry.path());
            }
        }
        for paths in index.by_id.values_mut() {
            paths.sort();
        }
        Ok(index)
    }

    fn paths(&self, id: FileId) -> &[PathBuf] {
        self.by_id.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    fn moved(&mut self, from: &Path, to: &Path) {
        for path in self.by_id.values_mut().flatten() {
            if path.as_path() == from {
                *path = to.to_path_buf();
            }
        }
    }
}

/// Synchronize one movie folder from `source_path` into the target library.
///
/// A video name collision inside the folder aborts this movie with
/// [`SyncError::VideoConflict`] before anything is touched. Failures of single
/// files are logged and counted in [`MovieStats::failures`].
pub fn process_movie(
    source: &MediaLibrary,
    target: &MediaLibrary,
    source_path: &Path,
    movie: &MovieInfo,
    options: &SyncOptions,
) -> Result<MovieStats> {
    let target_path = target.movie_path(movie);

    if options.verbose {
        info!(
            "Processing '{}' → '{}'",
            display_name(source_path),
            display_name(&target_path)
        );
    }

    let listing = SourceListing::read(source_path)?;
    let jobs = plan_jobs(source, target, source_path, movie, &target_path, &listing)?;

    let mut sync = MovieSync {
        options,
        target_path: &target_path,
        index: InodeIndex::build(&target_path)?,
        jobs: &jobs,
        preserved: HashSet::new(),
        renamed: HashMap::new(),
        stats: MovieStats {
            videos_total: listing.videos.len(),
            ..Default::default()
        },
    };

    fsops::create_dir(&target_path, options.dry_run)?;

    for kind in [FileKind::Video, FileKind::Sidecar] {
        for job in jobs.values().filter(|job| job.kind == kind) {
            if let Err(e) = sync.sync_job(job) {
                error!("{}", e);
                sync.stats.failures += 1;
            }
        }
    }

    if options.delete {
        sync.remove_strays(&listing.assets)?;
    }

    let mut stats = sync.stats;
    for (name, asset_dir) in &listing.assets {
        match assets::process_assets_folder(asset_dir, &target_path.join(name), options) {
            Ok(asset_stats) => stats.assets.add(&asset_stats),
            Err(e) => {
                error!("{}", e);
                stats.failures += 1;
            }
        }
    }

    Ok(stats)
}

/// Direct children of a source movie folder, sorted by name.
#[derive(Debug, Default)]
struct SourceListing {
    videos: Vec<(String, PathBuf)>,
    files: Vec<(String, PathBuf)>,
    assets: Vec<(String, PathBuf)>,
}

impl SourceListing {
    fn read(dir: &Path) -> Result<Self> {
        let mut listing = SourceListing::default();
        let entries = std::fs::read_dir(dir).map_err(|e| SyncError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SyncError::io(dir, e))?;
            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!("Ignoring entry with non UTF-8 name: {}", path.display());
                continue;
            };
            if path.is_dir() {
                if library::is_hidden(&name) {
                    debug!("Ignoring asset folder '{}'", name);
                    continue;
                }
                listing.assets.push((name, path));
            } else if path.is_file() {
                if library::is_video_name(&name) {
                    listing.videos.push((name, path));
                } else {
                    listing.files.push((name, path));
                }
            }
        }
        listing.videos.sort();
        listing.files.sort();
        listing.assets.sort();
        Ok(listing)
    }
}

/// Compute the target name of every video and sidecar.
fn plan_jobs(
    source: &MediaLibrary,
    target: &MediaLibrary,
    source_path: &Path,
    movie: &MovieInfo,
    target_path: &Path,
    listing: &SourceListing,
) -> Result<BTreeMap<String, LinkJob>> {
    let mut jobs: BTreeMap<String, LinkJob> = BTreeMap::new();
    let mut stems: Vec<(&str, String)> = Vec::new();

    for (name, path) in &listing.videos {
        let video = source.parse_video_path(path).unwrap_or_else(|| {
            VideoInfo::new(library::suffix_of(name).unwrap_or_default())
        });
        let target_name = target.convention().video_name(movie, &video);

        if let Some(existing) = jobs.get(&target_name) {
            return Err(SyncError::VideoConflict {
                movie: display_name(source_path),
                first: display_name(&existing.source),
                second: name.clone(),
                target: target_name,
            });
        }

        let source_stem = strip_suffix(name);
        let target_stem = target_name
            .strip_suffix(video.extension.as_str())
            .unwrap_or(&target_name)
            .to_string();
        stems.push((source_stem, target_stem));

        jobs.insert(
            target_name.clone(),
            LinkJob {
                kind: FileKind::Video,
                source: path.clone(),
                target: target_path.join(&target_name),
            },
        );
    }

    for (name, path) in &listing.files {
        if !library::is_sidecar_name(name) {
            continue;
        }
        // The longest matching video stem owns the sidecar.
        let owner = stems
            .iter()
            .filter(|(stem, _)| name.len() > stem.len() && name.starts_with(stem))
            .filter(|(stem, _)| name[stem.len()..].starts_with('.'))
            .max_by_key(|(stem, _)| stem.len());
        let Some((source_stem, target_stem)) = owner else {
            continue;
        };

        let target_name = format!("{}{}", target_stem, &name[source_stem.len()..]);
        if jobs.contains_key(&target_name) {
            warn!(
                "Skipping sidecar '{}': '{}' is already taken",
                name, target_name
            );
            continue;
        }
        jobs.insert(
            target_name.clone(),
            LinkJob {
                kind: FileKind::Sidecar,
                source: path.clone(),
                target: target_path.join(&target_name),
            },
        );
    }

    Ok(jobs)
}

struct MovieSync<'a> {
    options: &'a SyncOptions,
    target_path: &'a Path,
    index: InodeIndex,
    jobs: &'a BTreeMap<String, LinkJob>,
    /// Stale names kept in place; never treated as strays.
    preserved: HashSet<String>,
    /// Target paths produced by a rename in this run, with their old path.
    renamed: HashMap<PathBuf, PathBuf>,
    stats: MovieStats,
}

impl MovieSync<'_> {
    fn sync_job(&mut self, job: &LinkJob) -> Result<(), FsError> {
        let dry_run = self.options.dry_run;
        let source_meta = std::fs::metadata(&job.source)
            .map_err(|e| FsError::classify(FsOp::Link, &job.source, e))?;

        // A dry run never performed the rename, so look at the old path.
        let existing = match self.renamed.get(&job.target) {
            Some(old) if dry_run => old.as_path(),
            _ => job.target.as_path(),
        };

        match std::fs::symlink_metadata(existing) {
            Ok(target_meta) => {
                if fsops::same_file(&source_meta, &target_meta) {
                    if self.options.verbose {
                        info!("Target file '{}' already exists", display_name(&job.target));
                    }
                    return Ok(());
                }
                info!(
                    "Replacing file '{}' → '{}'",
                    display_name(&job.source),
                    display_name(&job.target)
                );
                fsops::remove_item(&job.target, dry_run)?;
                fsops::hard_link(&job.source, &job.target, dry_run)?;
                self.count_linked(job.kind);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match self.stale_candidate(&source_meta, &job.target) {
                    Some(stale) if self.options.rename_stale => self.repair_stale(job, &stale),
                    Some(stale) => {
                        self.preserve_stale(job, &stale);
                        Ok(())
                    }
                    None => {
                        if !dry_run {
                            info!(
                                "Linking file '{}' → '{}'",
                                display_name(&job.source),
                                display_name(&job.target)
                            );
                        }
                        fsops::hard_link(&job.source, &job.target, dry_run)?;
                        self.count_linked(job.kind);
                        Ok(())
                    }
                }
            }
            Err(e) => Err(FsError::classify(FsOp::Link, &job.target, e)),
        }
    }

    fn count_linked(&mut self, kind: FileKind) {
        match kind {
            FileKind::Video => self.stats.videos_linked += 1,
            FileKind::Sidecar => self.stats.sidecars_linked += 1,
        }
    }

    /// A target file sharing the source's inode under a name nothing maps to.
    fn stale_candidate(&self, source_meta: &std::fs::Metadata, target: &Path) -> Option<PathBuf> {
        let id = fsops::file_id(source_meta)?;
        self.index
            .paths(id)
            .iter()
            .filter(|path| path.as_path() != target)
            .find(|path| !self.jobs.contains_key(&display_name(path)))
            .cloned()
    }

    fn repair_stale(&mut self, job: &LinkJob, stale: &Path) -> Result<(), FsError> {
        info!(
            "Renaming stale hardlink '{}' → '{}'",
            display_name(stale),
            display_name(&job.target)
        );
        fsops::rename(stale, &job.target, self.options.dry_run)?;
        self.index.moved(stale, &job.target);
        self.renamed.insert(job.target.clone(), stale.to_path_buf());
        self.preserved.insert(display_name(stale));

        match job.kind {
            FileKind::Video => {
                self.stats.videos_renamed += 1;
                let old_stem = strip_suffix_owned(stale);
                let new_stem = strip_suffix_owned(&job.target);
                for (old, rest) in self.target_sidecars(&old_stem) {
                    let new = self.target_path.join(format!("{new_stem}{rest}"));
                    if new.exists() || self.renamed.contains_key(&new) {
                        continue;
                    }
                    fsops::rename(&old, &new, self.options.dry_run)?;
                    self.index.moved(&old, &new);
                    self.preserved.insert(display_name(&old));
                    self.renamed.insert(new, old);
                    self.stats.videos_renamed += 1;
                }
            }
            FileKind::Sidecar => self.stats.sidecars_linked += 1,
        }
        Ok(())
    }

    fn preserve_stale(&mut self, job: &LinkJob, stale: &Path) {
        warn!(
            "Stale hardlink '{}' should be named '{}' (use --rename-stale to fix it)",
            display_name(stale),
            display_name(&job.target)
        );
        self.preserved.insert(display_name(stale));
        self.stats.stale_preserved += 1;
        if job.kind == FileKind::Video {
            for (old, _) in self.target_sidecars(&strip_suffix_owned(stale)) {
                self.preserved.insert(display_name(&old));
            }
        }
    }

    /// Sidecars in the target folder named `<stem>.<rest>`, with `.<rest>`.
    fn target_sidecars(&self, stem: &str) -> Vec<(PathBuf, String)> {
        let Ok(entries) = std::fs::read_dir(self.target_path) else {
            return Vec::new();
        };
        let mut sidecars: Vec<(PathBuf, String)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                let rest = name.strip_prefix(stem)?;
                (rest.starts_with('.') && library::is_sidecar_name(&name))
                    .then(|| (entry.path(), rest.to_string()))
            })
            .collect();
        sidecars.sort();
        sidecars
    }

    fn remove_strays(&mut self, assets: &[(String, PathBuf)]) -> Result<()> {
        let entries = match std::fs::read_dir(self.target_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(SyncError::io(self.target_path, e)),
        };

        let mut strays = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SyncError::io(self.target_path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let known = self.jobs.contains_key(&name)
                || self.preserved.contains(&name)
                || assets.iter().any(|(asset, _)| *asset == name);
            if !known {
                strays.push((name, entry.path()));
            }
        }
        strays.sort();

        for (name, path) in strays {
            if !self.options.dry_run {
                info!(
                    "Removing stray item '{}' in movie folder '{}'",
                    name,
                    display_name(self.target_path)
                );
            }
            match fsops::remove_item(&path, self.options.dry_run) {
                Ok(()) => self.stats.items_removed += 1,
                Err(e) => {
                    error!("{}", e);
                    self.stats.failures += 1;
                }
            }
        }
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name without its final suffix; names starting with a dot keep it.
fn strip_suffix(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

fn strip_suffix_owned(path: &Path) -> String {
    strip_suffix(&display_name(path)).to_string()
}
