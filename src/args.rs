//! Command-line arguments and their translation into library calls.

use crate::convention::Convention;
use crate::sync::{Scope, SyncOptions};
use anyhow::{Context, Error, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;

/// Environment variable Radarr sets to the event that triggered the script.
pub const RADARR_EVENT_VAR: &str = "radarr_eventtype";
/// Environment variable Radarr sets to the imported movie's folder.
pub const RADARR_MOVIE_PATH_VAR: &str = "radarr_movie_path";

pub fn validate_arguments(args: Vec<String>) -> Result<Args, Error> {
    Args::try_parse_from(args).context("Failed attempt at parsing args")
}

pub fn print_usage() {
    if let Err(e) = Args::command().print_help() {
        eprintln!("Failed to print usage: {e}");
    }
}

#[derive(clap::Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Mirror a Jellyfin movie library into a Plex one (or the other way round)
/// using hardlinks.
pub struct Args {
    /// Root folder of the library to read from.
    pub source: PathBuf,

    /// Root folder of the library to write to.
    pub target: PathBuf,

    /// Naming convention of the target library.
    #[arg(long, value_enum, default_value_t = ConvertTo::Auto)]
    pub convert_to: ConvertTo,

    /// Log every change but leave the filesystem untouched.
    #[arg(short = 'n', long, default_value_t = false)]
    pub dry_run: bool,

    /// Remove files and folders in the target that have no source counterpart.
    #[arg(long, default_value_t = false)]
    pub delete: bool,

    /// Create the target folder when it does not exist.
    #[arg(long, default_value_t = false)]
    pub create: bool,

    /// Also report items that are already up to date.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Enable debug logging.
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Rename hardlinks found under an outdated name instead of keeping them.
    #[arg(long, default_value_t = false)]
    pub rename_stale: bool,

    /// Only synchronize the movie folder containing PATH.
    #[arg(long, value_name = "PATH", conflicts_with = "radarr_hook")]
    pub movie: Option<PathBuf>,

    /// Take the movie folder from the Radarr custom script environment.
    #[arg(long, default_value_t = false)]
    pub radarr_hook: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
/// Which naming convention the target library follows.
pub enum ConvertTo {
    /// Detect the source convention and convert into the other one.
    Auto,
    /// Target uses Jellyfin names.
    Jellyfin,
    /// Target uses Plex names.
    Plex,
}

impl ConvertTo {
    pub fn convention(self) -> Option<Convention> {
        match self {
            ConvertTo::Auto => None,
            ConvertTo::Jellyfin => Some(Convention::Jellyfin),
            ConvertTo::Plex => Some(Convention::Plex),
        }
    }
}

impl Args {
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            dry_run: self.dry_run,
            delete: self.delete,
            create: self.create,
            verbose: self.verbose,
            rename_stale: self.rename_stale,
        }
    }

    /// Work requested by the flags; `None` when there is nothing to do.
    pub fn resolve_scope(&self) -> Result<Option<Scope>, Error> {
        self.resolve_scope_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Args::resolve_scope`], reading variables through `env`.
    pub fn resolve_scope_with<F>(&self, env: F) -> Result<Option<Scope>, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(movie) = &self.movie {
            return Ok(Some(Scope::Movie(movie.clone())));
        }
        if !self.radarr_hook {
            return Ok(Some(Scope::Library));
        }

        let event = env(RADARR_EVENT_VAR)
            .with_context(|| format!("{RADARR_EVENT_VAR} is not set, was this run by Radarr?"))?;
        if event.eq_ignore_ascii_case("test") {
            return Ok(None);
        }
        let path = env(RADARR_MOVIE_PATH_VAR)
            .filter(|path| !path.is_empty())
            .with_context(|| format!("{RADARR_MOVIE_PATH_VAR} is not set for event '{event}'"))?;
        Ok(Some(Scope::Movie(PathBuf::from(path))))
    }
}
