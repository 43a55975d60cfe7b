use jellyplex_sync::{Convention, MediaLibrary};
use std::path::Path;

/// Convert `movie_folder/video_file` from `from` into `to`, as the
/// synchronizer does for a single video.
fn convert_path(from: Convention, to: Convention, path: &str) -> String {
    let source = MediaLibrary::new(from, "/source");
    let target = MediaLibrary::new(to, "/target");

    let full = Path::new("/source").join(path.trim_start_matches('/'));
    let folder = full.parent().expect("movie folder");
    let movie = source.parse_movie_path(folder).expect("parse folder");
    let video = source.parse_video_path(&full).expect("parse video");

    format!(
        "/{}/{}",
        target.convention().movie_name(&movie),
        target.convention().video_name(&movie, &video)
    )
}

/// Convert a bare file name, using its stem as the movie folder name.
fn convert_file(from: Convention, to: Convention, file: &str) -> String {
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    let movie = from.parse_movie_name(stem).expect("parse folder");
    let video = from.parse_video_name(file).expect("parse video");
    to.video_name(&movie, &video)
}

#[test]
fn jellyfin_to_plex_full_paths() {
    let samples = [
        (
            "/First movie (1984)/First movie (1984).mkv",
            "/First movie (1984)/First movie (1984).mkv",
        ),
        (
            "/A Bridge Too Far (1977) [imdbid-tt0075784]/A Bridge Too Far (1977) [imdbid-tt0075784].mkv",
            "/A Bridge Too Far (1977) {imdb-tt0075784}/A Bridge Too Far (1977) {imdb-tt0075784}.mkv",
        ),
        (
            "/Das Boot (1981) [imdbid-tt0082096]/Das Boot (1981) [imdbid-tt0082096] - Director's Cut.mkv",
            "/Das Boot (1981) {imdb-tt0082096}/Das Boot (1981) {imdb-tt0082096} {edition-Director's Cut}.mkv",
        ),
        (
            "/Das Boot (1981) [imdbid-tt0082096]/Das Boot (1981) [imdbid-tt0082096] - Theatrical Cut.mkv",
            "/Das Boot (1981) {imdb-tt0082096}/Das Boot (1981) {imdb-tt0082096} {edition-Theatrical Cut}.mkv",
        ),
    ];

    for (path, expected) in samples {
        assert_eq!(
            convert_path(Convention::Jellyfin, Convention::Plex, path),
            expected,
            "Failed on path: {path}"
        );
    }
}

#[test]
fn jellyfin_to_plex_file_names() {
    let samples = [
        ("First movie.mkv", "First movie.mkv"),
        ("First movie (1984).mkv", "First movie (1984).mkv"),
        (
            "A Bridge Too Far (1977) [imdbid-tt0075784].mkv",
            "A Bridge Too Far (1977) {imdb-tt0075784}.mkv",
        ),
        (
            "A Bridge Too Far [imdbid-tt0075784].mkv",
            "A Bridge Too Far {imdb-tt0075784}.mkv",
        ),
        (
            "A Bridge Too Far (1977) - [imdbid-tt0075784].mkv",
            "A Bridge Too Far (1977) {imdb-tt0075784}.mkv",
        ),
        (
            "Das Boot (1981) [imdbid-tt0082096] - Director's Cut.mkv",
            "Das Boot (1981) {imdb-tt0082096} {edition-Director's Cut}.mkv",
        ),
        (
            "Das Boot (1981) - [imdbid-tt0082096] - Director's Cut.mkv",
            "Das Boot (1981) {imdb-tt0082096} {edition-Director's Cut}.mkv",
        ),
        (
            "Das Boot (1981) [imdbid-tt0082096] - 4k Theatrical Cut.mkv",
            "Das Boot (1981) {imdb-tt0082096} {edition-Theatrical Cut} [2160p].mkv",
        ),
        (
            "Das Boot (1981) [imdbid-tt0082096] - BD Theatrical Cut.mkv",
            "Das Boot (1981) {imdb-tt0082096} {edition-Theatrical Cut} [1080p].mkv",
        ),
        (
            "Das Boot (1981) [imdbid-tt0082096] - Theatrical Cut BD.mkv",
            "Das Boot (1981) {imdb-tt0082096} {edition-Theatrical Cut} [1080p].mkv",
        ),
        (
            "Das Boot (1981) [imdbid-tt0082096] - DVD Theatrical Cut.mkv",
            "Das Boot (1981) {imdb-tt0082096} {edition-Theatrical Cut} [DVD].mkv",
        ),
        (
            "Das Boot (1981) [imdbid-tt0082096] - Theatrical Cut DVD.mkv",
            "Das Boot (1981) {imdb-tt0082096} {edition-Theatrical Cut} [DVD].mkv",
        ),
    ];

    for (file, expected) in samples {
        assert_eq!(
            convert_file(Convention::Jellyfin, Convention::Plex, file),
            expected,
            "Failed on file: {file}"
        );
    }
}

#[test]
fn plex_to_jellyfin_full_paths() {
    let samples = [
        (
            "/First movie (1984)/First movie (1984).mkv",
            "/First movie (1984)/First movie (1984).mkv",
        ),
        (
            "/A Bridge Too Far (1977) {imdb-tt0075784}/A Bridge Too Far (1977) {imdb-tt0075784}.mkv",
            "/A Bridge Too Far (1977) [imdbid-tt0075784]/A Bridge Too Far (1977) [imdbid-tt0075784].mkv",
        ),
        (
            "/Das Boot (1981) {imdb-tt0082096}/Das Boot (1981) {imdb-tt0082096} {edition-Director's Cut}.mkv",
            "/Das Boot (1981) [imdbid-tt0082096]/Das Boot (1981) [imdbid-tt0082096] - Director's Cut.mkv",
        ),
    ];

    for (path, expected) in samples {
        assert_eq!(
            convert_path(Convention::Plex, Convention::Jellyfin, path),
            expected,
            "Failed on path: {path}"
        );
    }
}

#[test]
fn plex_to_jellyfin_file_names() {
    let samples = [
        ("First movie.mkv", "First movie.mkv"),
        ("First movie (1984).mkv", "First movie (1984).mkv"),
        (
            "A Bridge Too Far (1977) {imdb-tt0075784}.mkv",
            "A Bridge Too Far (1977) [imdbid-tt0075784].mkv",
        ),
        (
            "A Bridge Too Far {imdb-tt0075784}.mkv",
            "A Bridge Too Far [imdbid-tt0075784].mkv",
        ),
        (
            "Das Boot (1981) {imdb-tt0082096} {edition-Theatrical Cut} [2160p].mkv",
            "Das Boot (1981) [imdbid-tt0082096] - 4k Theatrical Cut.mkv",
        ),
        (
            "Das Boot (1981) {imdb-tt0082096} {edition-Theatrical Cut} [1080p].mkv",
            "Das Boot (1981) [imdbid-tt0082096] - BD Theatrical Cut.mkv",
        ),
        (
            "Das Boot (1981) {imdb-tt0082096} {edition-Theatrical Cut} [DVD].mkv",
            "Das Boot (1981) [imdbid-tt0082096] - DVD Theatrical Cut.mkv",
        ),
        (
            "Das Boot (1981) {imdb-tt0082096}[1080p]{edition-Theatrical Cut}.mkv",
            "Das Boot (1981) [imdbid-tt0082096] - BD Theatrical Cut.mkv",
        ),
        (
            "First movie (1984) [1080p] {edition-Yeah}.mkv",
            "First movie (1984) - BD Yeah.mkv",
        ),
    ];

    for (file, expected) in samples {
        assert_eq!(
            convert_file(Convention::Plex, Convention::Jellyfin, file),
            expected,
            "Failed on file: {file}"
        );
    }
}

#[test]
fn plex_labels_are_lost_in_jellyfin_names() {
    let samples = [
        (
            "First movie (1984) {imdb-tt123456}{edition-Director's Cut}[remux][1080p].mkv",
            "First movie (1984) [imdbid-tt123456] - BD Director's Cut.mkv",
        ),
        (
            "First movie (1984) [hello world] {imdb-tt123456}[DVD][remux].mkv",
            "First movie (1984) [imdbid-tt123456] - DVD.mkv",
        ),
        (
            "First movie (1984) {youtube-y12345678} [1080p].mkv",
            "First movie (1984) - BD.mkv",
        ),
        (
            "First movie (1984) {fancy-stuff} {hello world} [1080p].mkv",
            "First movie (1984) - BD.mkv",
        ),
    ];

    for (file, expected) in samples {
        assert_eq!(
            convert_file(Convention::Plex, Convention::Jellyfin, file),
            expected,
            "Failed on file: {file}"
        );
    }
}

#[test]
fn folder_names_survive_a_round_trip() {
    let names = [
        "Das Boot (1981) [imdbid-tt0082096]",
        "Heat (1995)",
        "Alien [tmdbid-348]",
    ];
    for name in names {
        let movie = Convention::Jellyfin
            .parse_movie_name(name)
            .expect("parse jellyfin");
        let plex = Convention::Plex.movie_name(&movie);
        let back = Convention::Plex.parse_movie_name(&plex).expect("parse plex");
        assert_eq!(Convention::Jellyfin.movie_name(&back), name);
    }
}
