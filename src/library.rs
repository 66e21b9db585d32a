//! Fetching liked songs into the local library.
//!
//! The fetcher pages through the user's saved tracks, skips everything the
//! cache already holds, looks up genres per artist and enriches each batch
//! with audio features. The two remote services sit behind
//! [`LibrarySource`] and [`FeatureSource`].

use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

use crate::{
    output::Output,
    types::{AudioFeatures, SavedTracksPage, Song, SpotifyTrack},
};

/// Saved tracks requested per page, which is also the analysis batch size.
pub const PAGE_SIZE: u32 = 40;

/// Where liked tracks and artist genres come from.
#[allow(async_fn_in_trait)]
pub trait LibrarySource {
    type Error: Display;

    async fn saved_tracks(
        &mut self,
        limit: u32,
        offset: u32,
    ) -> Result<SavedTracksPage, Self::Error>;

    async fn artist_genres(&mut self, artist_id: &str) -> Result<Vec<String>, Self::Error>;
}

/// Where audio features come from. Implementations return exactly one record
/// per requested ID, in order.
#[allow(async_fn_in_trait)]
pub trait FeatureSource {
    type Error: Display;

    async fn audio_features(&mut self, ids: &[String]) -> Result<Vec<AudioFeatures>, Self::Error>;
}

#[derive(Debug)]
pub struct FetchOutcome {
    /// Previously cached songs followed by the newly fetched ones.
    pub songs: Vec<Song>,
    pub added: usize,
    /// Set when the fetch stopped early on an API error.
    pub error: Option<String>,
}

/// Builds a song from a saved track, without genres or analysis data.
/// Tracks without a Spotify ID (local files) are skipped.
pub fn song_from_track(track: SpotifyTrack, genres: Vec<String>) -> Option<Song> {
    let id = track.id?;
    let first_artist = track.artists.into_iter().next();

    let mut song = Song {
        id,
        name: track.name,
        artist: first_artist
            .as_ref()
            .map(|a| a.name.clone())
            .unwrap_or_default(),
        artist_id: first_artist.and_then(|a| a.id).unwrap_or_default(),
        release_date: track.album.release_date.unwrap_or_default(),
        genres,
        cover: track.album.images.into_iter().next().map(|i| i.url),
        audio_features: AudioFeatures::default(),
    };
    song.audio_features.popularity = track.popularity.map(f64::from);
    song.audio_features.duration = track.duration_ms.map(|ms| ms as f64 / 1000.0);
    Some(song)
}

/// Fetches up to `limit` liked songs that are not in `cached` yet.
///
/// Errors are reported through `out` and end the loop. Everything fetched
/// before the error is still returned.
pub async fn fetch_liked_songs<L, F>(
    library: &mut L,
    features: &mut F,
    cached: Vec<Song>,
    limit: usize,
    out: &mut impl Output,
) -> FetchOutcome
where
    L: LibrarySource,
    F: FeatureSource,
{
    let mut known: HashSet<String> = cached.iter().map(|s| s.id.clone()).collect();
    let mut songs = cached;
    let mut genres_by_artist: HashMap<String, Vec<String>> = HashMap::new();
    let mut offset = 0;
    let mut added = 0;
    let mut error = None;

    for batch_num in 0.. {
        if added >= limit {
            break;
        }

        out.progress(&format!(
            "Fetching batch {} ({} new songs so far)...",
            batch_num, added
        ));

        let page = match library.saved_tracks(PAGE_SIZE, offset).await {
            Ok(page) => page,
            Err(e) => {
                error = Some(format!("Error fetching liked songs: {}", e));
                break;
            }
        };

        if page.items.is_empty() {
            out.info("No more songs to fetch.");
            break;
        }

        let page_len = page.items.len() as u32;
        let has_next = page.next.is_some();

        let fresh: Vec<SpotifyTrack> = page
            .items
            .into_iter()
            .map(|item| item.track)
            .filter(|track| match &track.id {
                Some(id) => known.insert(id.clone()),
                None => false,
            })
            .take(limit - added)
            .collect();

        if fresh.is_empty() {
            out.info("All songs in this batch are already cached. Skipping...");
        } else {
            match enrich_batch(library, features, fresh, &mut genres_by_artist).await {
                Ok(batch) => {
                    added += batch.len();
                    songs.extend(batch);
                }
                Err(e) => {
                    error = Some(e);
                    break;
                }
            }
        }

        offset += page_len;
        if !has_next {
            break;
        }
    }

    out.finish_progress();
    if let Some(e) = &error {
        out.failure(e);
    }

    FetchOutcome {
        songs,
        added,
        error,
    }
}

async fn enrich_batch<L, F>(
    library: &mut L,
    features: &mut F,
    tracks: Vec<SpotifyTrack>,
    genres_by_artist: &mut HashMap<String, Vec<String>>,
) -> Result<Vec<Song>, String>
where
    L: LibrarySource,
    F: FeatureSource,
{
    let mut batch = Vec::with_capacity(tracks.len());

    for track in tracks {
        let artist_id = track.artists.first().and_then(|a| a.id.clone());
        let genres = match artist_id {
            Some(artist_id) => match genres_by_artist.get(&artist_id) {
                Some(genres) => genres.clone(),
                None => {
                    let genres = library
                        .artist_genres(&artist_id)
                        .await
                        .map_err(|e| format!("Error fetching artist {}: {}", artist_id, e))?;
                    genres_by_artist.insert(artist_id, genres.clone());
                    genres
                }
            },
            None => Vec::new(),
        };

        if let Some(song) = song_from_track(track, genres) {
            batch.push(song);
        }
    }

    let ids: Vec<String> = batch.iter().map(|s| s.id.clone()).collect();
    let analysis = features
        .audio_features(&ids)
        .await
        .map_err(|e| format!("HTTP error while fetching audio features: {}", e))?;

    for (song, analysed) in batch.iter_mut().zip(&analysis) {
        song.audio_features.merge_analysis(analysed);
    }

    Ok(batch)
}
