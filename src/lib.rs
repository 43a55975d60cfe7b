//! # jellyplex-sync
//!
//! Keeps a Plex movie library in step with a Jellyfin one (or the other way
//! round) without copying a single byte: every video, subtitle and extra in the
//! target is a hardlink to its source file, renamed to what the target
//! server's naming convention expects.
//!
//! ## When to use this crate
//! - Run the **CLI** after every library change, or from Radarr as a custom
//!   script (`--radarr-hook`) to update just the imported movie.
//! - Embed the **library** to parse or generate Jellyfin/Plex names, or to
//!   drive a synchronization from your own tooling.
//!
//! ## Quick start (CLI)
//! ```text
//! jellyplex-sync /srv/media/jellyfin /srv/media/plex --create --delete
//! ```
//!
//! Add `--dry-run` to see every `MKDIR`, `LINK`, `RELINK`, `RENAME` and
//! `DELETE` without touching the filesystem.
//!
//! ## Quick start (library)
//! ```no_run
//! use jellyplex_sync::{Convention, Scope, SyncOptions, sync};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = SyncOptions {
//!     create: true,
//!     ..Default::default()
//! };
//! let summary = sync(
//!     Path::new("/srv/media/jellyfin"),
//!     Path::new("/srv/media/plex"),
//!     Some(Convention::Plex),
//!     &Scope::Library,
//!     &options,
//! )?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Naming
//! ```
//! use jellyplex_sync::{Convention, MovieInfo, VideoInfo};
//!
//! let movie = MovieInfo::new("Heat")
//!     .with_year("1995")
//!     .with_external_id("imdb", "tt0113277");
//! let video = VideoInfo::new(".mkv").with_resolution("1080p");
//!
//! assert_eq!(
//!     Convention::Jellyfin.video_name(&movie, &video),
//!     "Heat (1995) [imdbid-tt0113277] - BD.mkv"
//! );
//! assert_eq!(
//!     Convention::Plex.video_name(&movie, &video),
//!     "Heat (1995) {imdb-tt0113277} [1080p].mkv"
//! );
//! ```
//!
//! ## Safety guardrails
//! - Two source folders that map to the same target name stop the run before
//!   anything is written.
//! - `--delete` refuses to run against a source without movie folders, which
//!   is what an unmounted share looks like.
//! - A library is never synchronized into itself.
//! - Existing hardlinks are recognized by inode, so repeated runs only touch
//!   what changed.
//!
//! ## Exit semantics
//! | Code | Meaning |
//! |------|---------|
//! | `0` | Synchronization finished (single file failures are logged). |
//! | `1` | Invalid arguments or configuration, conflicting folders. |
//! | `10` | Interrupted with Ctrl-C. |
//! | `99` | Unexpected error. |

mod args;
mod assets;
mod convention;
mod detect;
mod error;
mod fsops;
mod hardlinks;
mod library;
mod logging;
mod model;
mod reconcile;
mod sync;

pub use args::{Args, ConvertTo, RADARR_EVENT_VAR, RADARR_MOVIE_PATH_VAR, validate_arguments};
pub use assets::{AssetStats, process_assets_folder};
pub use convention::Convention;
pub use detect::{DETECTION_SAMPLE_SIZE, detect_convention, detect_from_names};
pub use error::{
    ConflictReport, EXIT_CONFIG, EXIT_INTERRUPTED, EXIT_UNEXPECTED, FsError, FsOp, SyncError,
};
pub use hardlinks::{MovieStats, process_movie};
pub use library::{
    ACCEPTED_SIDECAR_SUFFIXES, ACCEPTED_VIDEO_SUFFIXES, MediaLibrary, is_sidecar_name,
    is_video_name,
};
pub use logging::init_logging;
pub use model::{ExternalId, MovieInfo, VideoInfo};
pub use reconcile::{LibraryPlan, ensure_distinct, ensure_distinct_paths, plan, plan_single};
pub use sync::{
    Scope, SyncOptions, SyncSummary, is_interrupted, request_interrupt, resolve_conventions, sync,
};

use std::process::ExitCode;
use tracing::{error, info};

/// Run the CLI entrypoint.
///
/// This is what `src/main.rs` calls: parse the command line, set up logging
/// and the Ctrl-C handler, synchronize, and map the outcome to an exit code.
pub fn start() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let valid_args = match args::validate_arguments(args) {
        Ok(valid_args) => valid_args,
        Err(e) => {
            if let Some(clap_error) = e.downcast_ref::<clap::Error>()
                && !clap_error.use_stderr()
            {
                // --help and --version
                clap_error.exit();
            }
            eprintln!("Invalid arguments provided.");
            eprintln!("{e:#}");
            args::print_usage();
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(e) = logging::init_logging(valid_args.debug) {
        eprintln!("{e:#}");
        return ExitCode::from(EXIT_UNEXPECTED);
    }

    if let Err(e) = ctrlc::set_handler(sync::request_interrupt) {
        error!("Failed to install Ctrl-C handler: {}", e);
        return ExitCode::from(EXIT_UNEXPECTED);
    }

    let scope = match valid_args.resolve_scope() {
        Ok(Some(scope)) => scope,
        Ok(None) => {
            info!("Radarr test event received, nothing to do");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match sync::sync(
        &valid_args.source,
        &valid_args.target,
        valid_args.convert_to.convention(),
        &scope,
        &valid_args.sync_options(),
    ) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
