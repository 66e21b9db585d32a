use spexcli::cli::{self, CandidateSource, SimilarOptions};
use spexcli::filters::SongFilter;
use spexcli::management::{LIKED_SONGS_CACHE, SONGS_CACHE, SongCache};
use spexcli::output::{BufferedOutput, Level};
use spexcli::similarity::Weights;
use spexcli::types::{AudioFeatures, Feature, SortAttribute, Song};
use tempfile::TempDir;

fn create_test_song(id: &str, name: &str, genres: &[&str], tempo: f64) -> Song {
    Song {
        id: id.to_string(),
        name: name.to_string(),
        artist: "Green Day".to_string(),
        artist_id: "gd".to_string(),
        release_date: "1994-02-01".to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        cover: None,
        audio_features: AudioFeatures {
            tempo: Some(tempo),
            ..AudioFeatures::default()
        },
    }
}

fn library() -> Vec<Song> {
    vec![
        create_test_song("1", "Basket Case", &["pop"], 170.0),
        create_test_song("2", "Longview", &["rock"], 145.0),
        create_test_song("3", "When I Come Around", &["pop", "rock"], 98.0),
    ]
}

async fn setup(songs: &[Song]) -> (TempDir, SongCache) {
    let dir = TempDir::new().unwrap();
    let cache = SongCache::new(dir.path());
    cache.save(LIKED_SONGS_CACHE, songs).await.unwrap();
    (dir, cache)
}

fn ids(songs: &[Song]) -> Vec<&str> {
    songs.iter().map(|s| s.id.as_str()).collect()
}

fn genre_only(songs: Option<Vec<String>>, source: Option<CandidateSource>, threshold: f64) -> SimilarOptions {
    SimilarOptions {
        songs,
        source,
        weights: Weights {
            genre: 1.0,
            audio: 0.0,
        },
        threshold,
    }
}

#[tokio::test]
async fn test_explore_writes_matches() {
    let (_dir, cache) = setup(&library()).await;
    let mut out = BufferedOutput::new();
    let filter = SongFilter {
        genre: Some("rock".to_string()),
        ..SongFilter::default()
    };

    let found = cli::explore(&cache, &filter, &mut out).await.unwrap();

    assert_eq!(found, 2);
    assert!(out.contains("Found 2 songs matching filters"));
    assert!(out.contains("Longview"));

    let working = cache.load(SONGS_CACHE).await.unwrap().unwrap();
    assert_eq!(ids(&working), vec!["2", "3"]);
}

#[tokio::test]
async fn test_explore_without_liked_songs() {
    let dir = TempDir::new().unwrap();
    let cache = SongCache::new(dir.path());
    let mut out = BufferedOutput::new();

    let found = cli::explore(&cache, &SongFilter::default(), &mut out)
        .await
        .unwrap();

    assert_eq!(found, 0);
    assert_eq!(out.messages(Level::Warning).len(), 1);
    // Nothing to work on, nothing written
    assert_eq!(cache.load(SONGS_CACHE).await.unwrap(), None);
}

#[tokio::test]
async fn test_sort_rewrites_working_set() {
    let (_dir, cache) = setup(&library()).await;
    cache.save(SONGS_CACHE, &library()).await.unwrap();
    let mut out = BufferedOutput::new();

    cli::sort(&cache, SortAttribute::Feature(Feature::Tempo), &mut out)
        .await
        .unwrap();

    let working = cache.load(SONGS_CACHE).await.unwrap().unwrap();
    assert_eq!(ids(&working), vec!["3", "2", "1"]);
    assert!(out.contains("Songs sorted by tempo"));
}

#[tokio::test]
async fn test_similar_by_genre() {
    let (_dir, cache) = setup(&library()).await;
    let mut out = BufferedOutput::new();
    let opts = genre_only(
        Some(vec!["basket case".to_string()]),
        Some(CandidateSource::LikedSongs),
        0.99,
    );

    let found = cli::similar(&cache, &opts, &mut out).await.unwrap();

    assert_eq!(found, 1);
    assert!(out.contains("Total similar songs found: 1"));
    let working = cache.load(SONGS_CACHE).await.unwrap().unwrap();
    assert_eq!(ids(&working), vec!["1"]);
}

#[tokio::test]
async fn test_similar_defaults_to_liked_songs() {
    let (_dir, cache) = setup(&library()).await;
    let mut out = BufferedOutput::new();
    let opts = genre_only(Some(vec!["Basket Case".to_string()]), None, 0.7);

    let found = cli::similar(&cache, &opts, &mut out).await.unwrap();

    // Exact genre match and the pop/rock song at 1/sqrt(2)
    assert_eq!(found, 2);
    let working = cache.load(SONGS_CACHE).await.unwrap().unwrap();
    assert_eq!(ids(&working), vec!["1", "3"]);
}

#[tokio::test]
async fn test_similar_uses_working_set_as_query() {
    let (_dir, cache) = setup(&library()).await;
    cache
        .save(SONGS_CACHE, &library()[1..2])
        .await
        .unwrap();
    let mut out = BufferedOutput::new();
    let opts = genre_only(None, Some(CandidateSource::LikedSongs), 0.99);

    let found = cli::similar(&cache, &opts, &mut out).await.unwrap();

    assert_eq!(found, 1);
    let working = cache.load(SONGS_CACHE).await.unwrap().unwrap();
    assert_eq!(ids(&working), vec!["2"]);
}

#[tokio::test]
async fn test_similar_with_named_candidates() {
    let (_dir, cache) = setup(&library()).await;
    let mut out = BufferedOutput::new();
    let opts = genre_only(
        Some(vec!["Longview".to_string()]),
        Some("Basket Case, When I Come Around".parse().unwrap()),
        0.5,
    );

    let found = cli::similar(&cache, &opts, &mut out).await.unwrap();

    assert_eq!(found, 1);
    let working = cache.load(SONGS_CACHE).await.unwrap().unwrap();
    assert_eq!(ids(&working), vec!["3"]);
}

#[tokio::test]
async fn test_similar_unknown_query_song() {
    let (_dir, cache) = setup(&library()).await;
    cache.save(SONGS_CACHE, &library()).await.unwrap();
    let mut out = BufferedOutput::new();
    let opts = genre_only(Some(vec!["Wonderwall".to_string()]), None, 0.7);

    let result = cli::similar(&cache, &opts, &mut out).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Wonderwall"));
    // The working set is left alone
    assert_eq!(cache.load(SONGS_CACHE).await.unwrap().unwrap().len(), 3);
}

#[tokio::test]
async fn test_similar_requires_input() {
    let (_dir, cache) = setup(&library()).await;
    let mut out = BufferedOutput::new();

    let result = cli::similar(&cache, &genre_only(None, None, 0.7), &mut out).await;

    assert!(result.is_err());
}

#[test]
fn test_candidate_source_from_str() {
    assert_eq!(
        "liked_songs".parse::<CandidateSource>(),
        Ok(CandidateSource::LikedSongs)
    );
    assert_eq!("cache".parse::<CandidateSource>(), Ok(CandidateSource::Cache));
    assert_eq!(
        "Longview , Basket Case".parse::<CandidateSource>(),
        Ok(CandidateSource::Songs(vec![
            "Longview".to_string(),
            "Basket Case".to_string()
        ]))
    );
    assert!(" , ".parse::<CandidateSource>().is_err());
}
