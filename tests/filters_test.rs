use spexcli::filters::*;
use spexcli::types::{AudioFeatures, Feature, Song};

fn create_test_song(name: &str, artist: &str, release_date: &str, genres: &[&str]) -> Song {
    Song {
        id: format!("{}_id", name),
        name: name.to_string(),
        artist: artist.to_string(),
        artist_id: format!("{}_id", artist),
        release_date: release_date.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        cover: None,
        audio_features: AudioFeatures {
            tempo: Some(120.0),
            energy: Some(0.8),
            key: Some(5.0),
            mode: Some(1.0),
            loudness: Some(-6.5),
            ..AudioFeatures::default()
        },
    }
}

fn names(songs: &[Song]) -> Vec<&str> {
    songs.iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn test_in_range() {
    // No bounds: everything passes, even a missing value
    assert!(in_range(None, None, None));
    assert!(in_range(Some(5.0), None, None));

    // Bounds are inclusive
    assert!(in_range(Some(5.0), Some(5.0), Some(5.0)));
    assert!(in_range(Some(5.0), Some(1.0), None));
    assert!(in_range(Some(5.0), None, Some(9.0)));
    assert!(!in_range(Some(0.5), Some(1.0), None));
    assert!(!in_range(Some(9.5), None, Some(9.0)));

    // Any bound set: a missing value fails
    assert!(!in_range(None, Some(1.0), None));
    assert!(!in_range(None, None, Some(1.0)));
}

#[test]
fn test_contains_text() {
    assert!(contains_text("Basket Case", Some("basket")));
    assert!(contains_text("Basket Case", None));
    assert!(!contains_text("Basket Case", Some("longview")));
}

#[test]
fn test_contains_any() {
    let genres = vec!["pop punk".to_string(), "skate punk".to_string()];

    assert!(contains_any(&genres, Some("SKATE")));
    assert!(!contains_any(&genres, Some("metal")));
    assert!(!contains_any(&[], Some("punk")));
    assert!(contains_any(&[], None));
}

#[test]
fn test_release_year() {
    assert_eq!(release_year("1994-02-01"), Some(1994));
    assert_eq!(release_year("1994-02"), Some(1994));
    assert_eq!(release_year("1994"), Some(1994));
    assert_eq!(release_year("unknown"), None);
    assert_eq!(release_year(""), None);
}

#[test]
fn test_year_in_range_is_inclusive() {
    let range = Some(YearRange {
        first: 1990,
        last: 1999,
    });

    assert!(year_in_range("1990-01-01", range));
    assert!(year_in_range("1999-12-31", range));
    assert!(!year_in_range("1989-12-31", range));
    assert!(!year_in_range("2000-01-01", range));

    // Unparseable dates fail a set range and pass an unset one
    assert!(!year_in_range("n/a", range));
    assert!(year_in_range("n/a", None));
}

#[test]
fn test_year_matches_uses_year_component() {
    // The month must not be mistaken for the year
    assert!(year_matches("2004-09-21", Some(2004)));
    assert!(!year_matches("2004-09-21", Some(9)));
    assert!(year_matches("anything", None));
}

#[test]
fn test_empty_filter_keeps_everything() {
    let songs = vec![
        create_test_song("a", "x", "2001-01-01", &[]),
        create_test_song("b", "y", "", &["pop"]),
    ];

    let filtered = SongFilter::default().apply(songs.clone());

    assert_eq!(filtered, songs);
}

#[test]
fn test_filter_combines_criteria() {
    let songs = vec![
        create_test_song("Basket Case", "Green Day", "1994-02-01", &["pop punk"]),
        create_test_song("Longview", "Green Day", "1994-02-01", &["punk"]),
        create_test_song("Holiday", "Green Day", "2004-09-21", &["pop punk"]),
        create_test_song("Dammit", "blink-182", "1997-09-23", &["pop punk"]),
    ];

    let filter = SongFilter {
        artist: Some("green".to_string()),
        genre: Some("pop".to_string()),
        release_year_range: Some(YearRange {
            first: 1990,
            last: 1999,
        }),
        ..SongFilter::default()
    };

    assert_eq!(names(&filter.apply(songs)), vec!["Basket Case"]);
}

#[test]
fn test_filter_key_is_exact() {
    let mut other_key = create_test_song("other", "x", "2000", &[]);
    other_key.audio_features.key = Some(15.0);
    let songs = vec![create_test_song("five", "x", "2000", &[]), other_key];

    let filter = SongFilter {
        key: Some(5.0),
        ..SongFilter::default()
    };

    // 15 contains the digit 5 but is a different key
    assert_eq!(names(&filter.apply(songs)), vec!["five"]);
}

#[test]
fn test_filter_feature_ranges() {
    let mut quiet = create_test_song("quiet", "x", "2000", &[]);
    quiet.audio_features.loudness = Some(-20.0);
    let mut unknown = create_test_song("unknown", "x", "2000", &[]);
    unknown.audio_features.loudness = None;
    let songs = vec![create_test_song("loud", "x", "2000", &[]), quiet, unknown];

    let filter = SongFilter {
        ranges: vec![FeatureRange {
            feature: Feature::Loudness,
            min: Some(-10.0),
            max: None,
        }],
        ..SongFilter::default()
    };

    // Missing values fail a set range
    assert_eq!(names(&filter.apply(songs)), vec!["loud"]);
}

#[test]
fn test_feature_range_is_set() {
    let unset = FeatureRange {
        feature: Feature::Tempo,
        min: None,
        max: None,
    };
    let set = FeatureRange {
        max: Some(140.0),
        ..unset
    };

    assert!(!unset.is_set());
    assert!(set.is_set());
}
