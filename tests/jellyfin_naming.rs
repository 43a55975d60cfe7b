use jellyplex_sync::{Convention, MovieInfo, VideoInfo};

const JELLYFIN: Convention = Convention::Jellyfin;

fn movie(title: &str, year: Option<&str>, id: Option<(&str, &str)>) -> MovieInfo {
    let mut movie = MovieInfo::new(title);
    if let Some(year) = year {
        movie = movie.with_year(year);
    }
    if let Some((provider, id)) = id {
        movie = movie.with_external_id(provider, id);
    }
    movie
}

#[test]
fn parses_well_formed_folder_names() {
    let samples = [
        ("First movie", movie("First movie", None, None)),
        ("First movie (1970)", movie("First movie", Some("1970"), None)),
        (
            "First movie (1970) [imdbid-tt123456]",
            movie("First movie", Some("1970"), Some(("imdb", "tt123456"))),
        ),
        (
            "First movie [imdbid-tt123456]",
            movie("First movie", None, Some(("imdb", "tt123456"))),
        ),
        (
            "Series – A movie (1984) [imdbid-tt654321]",
            movie("Series – A movie", Some("1984"), Some(("imdb", "tt654321"))),
        ),
        (
            "Heat (1995) [tmdbid-949]",
            movie("Heat", Some("1995"), Some(("tmdb", "949"))),
        ),
    ];

    for (name, expected) in samples {
        assert_eq!(
            JELLYFIN.parse_movie_name(name),
            Some(expected),
            "Failed on folder: {name}"
        );
    }
}

#[test]
fn parses_hyphenated_titles_and_dashed_ids() {
    assert_eq!(
        JELLYFIN.parse_movie_name("Series - A movie (1984)"),
        Some(movie("Series - A movie", Some("1984"), None))
    );
    assert_eq!(
        JELLYFIN.parse_movie_name("Series - A movie (1984) - [imdbid-tt654321]"),
        Some(movie(
            "Series - A movie",
            Some("1984"),
            Some(("imdb", "tt654321"))
        ))
    );
}

#[test]
fn malformed_folder_names_fall_back_to_the_whole_title() {
    let samples = [
        ("New_movie_(1998)", movie("New_movie_(1998)", None, None)),
        (
            "New movie (1998)-[imdbid-tt654321]",
            movie("New movie (1998)-[imdbid-tt654321]", None, None),
        ),
        (
            "New movie [imdbid-tt654321] (1998)",
            movie("New movie [imdbid-tt654321]", Some("1998"), None),
        ),
        (
            "New movie (1998) - [youtube-y12345678]",
            movie("New movie (1998) - [youtube-y12345678]", None, None),
        ),
    ];

    for (name, expected) in samples {
        assert_eq!(
            JELLYFIN.parse_movie_name(name),
            Some(expected),
            "Failed on folder: {name}"
        );
    }
}

#[test]
fn empty_folder_name_does_not_parse() {
    assert_eq!(JELLYFIN.parse_movie_name(""), None);
}

#[test]
fn parses_video_variants() {
    let base = "Series – A movie (1984) [imdbid-tt654321]";
    let samples = [
        ("First movie.mkv".to_string(), VideoInfo::new(".mkv")),
        ("First movie (1970).mkv".to_string(), VideoInfo::new(".mkv")),
        (format!("{base}.mkv"), VideoInfo::new(".mkv")),
        (
            format!("{base} - Director's Cut.mkv"),
            VideoInfo::new(".mkv").with_edition("Director's Cut"),
        ),
        (
            format!("{base} - DVD Director's Cut.mkv"),
            VideoInfo::new(".mkv")
                .with_edition("Director's Cut")
                .with_tag("DVD"),
        ),
        (
            format!("{base} - BD Director's Cut.mkv"),
            VideoInfo::new(".mkv")
                .with_edition("Director's Cut")
                .with_resolution("1080p"),
        ),
        (
            format!("{base} - Director's Cut BD.mkv"),
            VideoInfo::new(".mkv")
                .with_edition("Director's Cut")
                .with_resolution("1080p"),
        ),
        (
            format!("{base} - 4k.mkv"),
            VideoInfo::new(".mkv").with_resolution("2160p"),
        ),
        (
            format!("{base} - 720p Extended.MKV"),
            VideoInfo::new(".mkv")
                .with_edition("Extended")
                .with_resolution("720p"),
        ),
        (
            "Series – A movie (1984) - [imdbid-tt654321].mkv".to_string(),
            VideoInfo::new(".mkv"),
        ),
    ];

    for (name, expected) in samples {
        assert_eq!(
            JELLYFIN.parse_video_name(&name),
            Some(expected),
            "Failed on video: {name}"
        );
    }
}

#[test]
fn shorthand_suffix_becomes_a_tag() {
    let video = JELLYFIN
        .parse_video_name("Heat (1995) - BD-remux.mkv")
        .expect("parse video");
    assert_eq!(video.resolution.as_deref(), Some("1080p"));
    assert!(video.has_tag("remux"));
    assert_eq!(video.edition, None);
}

#[test]
fn dvd_is_never_a_resolution() {
    let video = JELLYFIN
        .parse_video_name("Heat (1995) - DVD.mkv")
        .expect("parse video");
    assert_eq!(video.resolution, None);
    assert!(video.has_tag("DVD"));
}

#[test]
fn empty_video_name_does_not_parse() {
    assert_eq!(JELLYFIN.parse_video_name(""), None);
}

#[test]
fn generates_folder_names() {
    assert_eq!(
        JELLYFIN.movie_name(&movie("Heat", Some("1995"), Some(("imdb", "tt0113277")))),
        "Heat (1995) [imdbid-tt0113277]"
    );
    assert_eq!(JELLYFIN.movie_name(&movie("Heat", None, None)), "Heat");
    assert_eq!(
        JELLYFIN.movie_name(&movie("Heat", None, Some(("tmdb", "949")))),
        "Heat [tmdbid-949]"
    );
}

#[test]
fn generates_video_names_with_shorthands() {
    let heat = movie("Heat", Some("1995"), None);
    let samples = [
        (VideoInfo::new(".mkv"), "Heat (1995).mkv"),
        (
            VideoInfo::new(".mkv").with_resolution("1080p"),
            "Heat (1995) - BD.mkv",
        ),
        (
            VideoInfo::new(".mkv").with_resolution("2160p"),
            "Heat (1995) - 4k.mkv",
        ),
        (
            VideoInfo::new(".mkv").with_resolution("576p"),
            "Heat (1995) - DVD.mkv",
        ),
        (
            VideoInfo::new(".mkv").with_resolution("720p"),
            "Heat (1995) - 720p.mkv",
        ),
        (
            VideoInfo::new(".mkv").with_tag("DVD").with_edition("Extended"),
            "Heat (1995) - DVD Extended.mkv",
        ),
        (
            VideoInfo::new(".mp4").with_edition("Director's Cut"),
            "Heat (1995) - Director's Cut.mp4",
        ),
    ];

    for (video, expected) in samples {
        assert_eq!(JELLYFIN.video_name(&heat, &video), expected);
    }
}

#[test]
fn generated_names_parse_back() {
    let heat = movie("Heat", Some("1995"), Some(("imdb", "tt0113277")));
    let video = VideoInfo::new(".mkv")
        .with_resolution("2160p")
        .with_edition("Director's Cut");

    let folder = JELLYFIN.movie_name(&heat);
    let file = JELLYFIN.video_name(&heat, &video);

    assert_eq!(JELLYFIN.parse_movie_name(&folder), Some(heat));
    assert_eq!(JELLYFIN.parse_video_name(&file), Some(video));
}
