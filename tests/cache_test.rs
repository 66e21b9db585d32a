use spexcli::management::{CacheError, LIKED_SONGS_CACHE, SONGS_CACHE, SongCache};
use spexcli::types::{AudioFeatures, Song};
use tempfile::TempDir;

fn create_test_song(id: &str, genres: &[&str]) -> Song {
    Song {
        id: id.to_string(),
        name: format!("Song {}", id),
        artist: "Artist".to_string(),
        artist_id: "artist".to_string(),
        release_date: "2011-11-11".to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        cover: Some(format!("https://i.scdn.co/image/{}", id)),
        audio_features: AudioFeatures {
            tempo: Some(128.0),
            duration: Some(201.5),
            happiness: Some(0.33),
            valence: Some(0.33),
            ..AudioFeatures::default()
        },
    }
}

#[tokio::test]
async fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let cache = SongCache::new(dir.path());
    let songs = vec![create_test_song("1", &["pop"]), create_test_song("2", &[])];

    cache.save(LIKED_SONGS_CACHE, &songs).await.unwrap();
    let loaded = cache.load(LIKED_SONGS_CACHE).await.unwrap();

    assert_eq!(loaded, Some(songs));
}

#[tokio::test]
async fn test_missing_cache_is_none() {
    let dir = TempDir::new().unwrap();
    let cache = SongCache::new(dir.path().join("not-created-yet"));

    assert_eq!(cache.load(SONGS_CACHE).await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_cache_is_not_missing() {
    let dir = TempDir::new().unwrap();
    let cache = SongCache::new(dir.path());

    cache.save(SONGS_CACHE, &[]).await.unwrap();

    assert_eq!(cache.load(SONGS_CACHE).await.unwrap(), Some(vec![]));
}

#[tokio::test]
async fn test_save_replaces_document() {
    let dir = TempDir::new().unwrap();
    let cache = SongCache::new(dir.path());

    cache
        .save(SONGS_CACHE, &[create_test_song("old", &[])])
        .await
        .unwrap();
    cache
        .save(SONGS_CACHE, &[create_test_song("new", &[])])
        .await
        .unwrap();

    let loaded = cache.load(SONGS_CACHE).await.unwrap().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "new");

    // Only the final document remains, no temporary file
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, vec!["songs_cache.json".to_string()]);
}

#[tokio::test]
async fn test_caches_are_independent() {
    let dir = TempDir::new().unwrap();
    let cache = SongCache::new(dir.path());

    cache
        .save(LIKED_SONGS_CACHE, &[create_test_song("1", &[])])
        .await
        .unwrap();

    assert_eq!(cache.load(SONGS_CACHE).await.unwrap(), None);
}

#[tokio::test]
async fn test_malformed_document() {
    let dir = TempDir::new().unwrap();
    let cache = SongCache::new(dir.path());
    std::fs::write(dir.path().join("songs_cache.json"), "{not json").unwrap();

    let result = cache.load(SONGS_CACHE).await;

    assert!(matches!(result, Err(CacheError::SerdeError(_))));
}

#[tokio::test]
async fn test_documents_without_optional_fields() {
    let dir = TempDir::new().unwrap();
    let cache = SongCache::new(dir.path());
    let json = r#"[{
        "id": "abc",
        "name": "Old entry",
        "artist": "Someone",
        "artist_id": "someone",
        "release_date": "1999",
        "audio_features": {"tempo": 99.0, "energy": null}
    }]"#;
    std::fs::write(dir.path().join("liked_songs_cache.json"), json).unwrap();

    let loaded = cache.load(LIKED_SONGS_CACHE).await.unwrap().unwrap();

    assert!(loaded[0].genres.is_empty());
    assert_eq!(loaded[0].cover, None);
    assert_eq!(loaded[0].audio_features.tempo, Some(99.0));
    assert_eq!(loaded[0].audio_features.energy, None);
    assert_eq!(loaded[0].audio_features.loudness, None);
}

#[test]
fn test_invalid_cache_names() {
    let cache = SongCache::new("/tmp/spexcli");

    for name in ["", "../escape", "nested/name", ".hidden"] {
        assert!(matches!(cache.path(name), Err(CacheError::InvalidName(_))));
    }

    assert_eq!(
        cache.path(SONGS_CACHE).unwrap(),
        std::path::Path::new("/tmp/spexcli/songs_cache.json")
    );
}
