use std::fs;
use std::path::Path;

use jellyplex_sync::{
    Convention, Scope, SyncError, SyncOptions, detect_convention, detect_from_names, sync,
};
use tempfile::TempDir;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, b"").expect("write file");
}

#[test]
fn id_blocks_decide_immediately() {
    assert_eq!(
        detect_from_names(["Heat (1995) [imdbid-tt0113277].mkv"]),
        Some(Convention::Jellyfin)
    );
    assert_eq!(
        detect_from_names(["Heat (1995) {tmdb-949}.mkv"]),
        Some(Convention::Plex)
    );
    // The first decisive name wins over everything after it.
    assert_eq!(
        detect_from_names([
            "Heat (1995) {imdb-tt0113277}.mkv",
            "Alien (1979) [imdbid-tt0078748].mkv",
        ]),
        Some(Convention::Plex)
    );
}

#[test]
fn hints_are_counted() {
    assert_eq!(
        detect_from_names([
            "Heat (1995) - BD.mkv",
            "Alien (1979) - 4k Director's Cut.mkv",
        ]),
        Some(Convention::Jellyfin)
    );
    assert_eq!(
        detect_from_names(["Heat (1995) [1080p].mkv", "Alien (1979).mkv"]),
        Some(Convention::Plex)
    );
}

#[test]
fn no_signal_is_undecided() {
    assert_eq!(detect_from_names(["Heat (1995).mkv"]), None);
    assert_eq!(detect_from_names(Vec::<String>::new()), None);
    // One hint each way.
    assert_eq!(
        detect_from_names(["Heat (1995) - Extended.mkv", "Alien (1979) [remux].mkv"]),
        None
    );
}

#[test]
fn detects_from_a_library_tree() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    touch(&root.join("Heat (1995)").join("Heat (1995) - BD.mkv"));
    touch(&root.join("Heat (1995)").join("Heat (1995) - BD.en.srt"));
    touch(
        &root
            .join("Alien (1979) [imdbid-tt0078748]")
            .join("Alien (1979) [imdbid-tt0078748].mkv"),
    );

    assert_eq!(detect_convention(root), Some(Convention::Jellyfin));
}

#[test]
fn auto_sync_without_signal_is_a_configuration_error() {
    let temp = TempDir::new().expect("tempdir");
    let source = temp.path().join("movies");
    let target = temp.path().join("other");
    touch(&source.join("Heat (1995)").join("Heat (1995).mkv"));
    fs::create_dir(&target).expect("create target");

    let err = sync(
        &source,
        &target,
        None,
        &Scope::Library,
        &SyncOptions::default(),
    )
    .expect_err("undetectable");
    assert!(matches!(err, SyncError::UndetectableConvention));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn auto_sync_converts_into_the_other_convention() {
    let temp = TempDir::new().expect("tempdir");
    let source = temp.path().join("movies");
    let target = temp.path().join("other");
    touch(
        &source
            .join("Heat (1995) {imdb-tt0113277}")
            .join("Heat (1995) {imdb-tt0113277} [1080p].mkv"),
    );
    fs::create_dir(&target).expect("create target");

    sync(
        &source,
        &target,
        None,
        &Scope::Library,
        &SyncOptions::default(),
    )
    .expect("sync");

    assert!(
        target
            .join("Heat (1995) [imdbid-tt0113277]")
            .join("Heat (1995) [imdbid-tt0113277] - BD.mkv")
            .exists()
    );
}
