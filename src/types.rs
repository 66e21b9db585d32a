use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// A liked track as stored in the cache documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_id: String,
    pub release_date: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub audio_features: AudioFeatures,
}

/// Per-track audio descriptors. `None` means the analysis service had no
/// data for the track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioFeatures {
    pub popularity: Option<f64>,
    pub tempo: Option<f64>,
    pub duration: Option<f64>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub happiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub speechiness: Option<f64>,
    pub loudness: Option<f64>,
    pub key: Option<f64>,
    pub mode: Option<f64>,
    pub valence: Option<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Popularity,
    Tempo,
    Duration,
    Energy,
    Danceability,
    Happiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Speechiness,
    Loudness,
    Key,
    Mode,
    Valence,
}

impl Feature {
    pub const ALL: [Feature; 14] = [
        Feature::Popularity,
        Feature::Tempo,
        Feature::Duration,
        Feature::Energy,
        Feature::Danceability,
        Feature::Happiness,
        Feature::Acousticness,
        Feature::Instrumentalness,
        Feature::Liveness,
        Feature::Speechiness,
        Feature::Loudness,
        Feature::Key,
        Feature::Mode,
        Feature::Valence,
    ];

    /// Component order of audio-feature vectors.
    pub const VECTOR_ORDER: [Feature; 11] = [
        Feature::Tempo,
        Feature::Duration,
        Feature::Popularity,
        Feature::Energy,
        Feature::Danceability,
        Feature::Happiness,
        Feature::Acousticness,
        Feature::Instrumentalness,
        Feature::Liveness,
        Feature::Speechiness,
        Feature::Loudness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Popularity => "popularity",
            Feature::Tempo => "tempo",
            Feature::Duration => "duration",
            Feature::Energy => "energy",
            Feature::Danceability => "danceability",
            Feature::Happiness => "happiness",
            Feature::Acousticness => "acousticness",
            Feature::Instrumentalness => "instrumentalness",
            Feature::Liveness => "liveness",
            Feature::Speechiness => "speechiness",
            Feature::Loudness => "loudness",
            Feature::Key => "key",
            Feature::Mode => "mode",
            Feature::Valence => "valence",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| format!("unknown audio feature '{}'", s.trim()))
    }
}

impl AudioFeatures {
    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Popularity => self.popularity,
            Feature::Tempo => self.tempo,
            Feature::Duration => self.duration,
            Feature::Energy => self.energy,
            Feature::Danceability => self.danceability,
            Feature::Happiness => self.happiness,
            Feature::Acousticness => self.acousticness,
            Feature::Instrumentalness => self.instrumentalness,
            Feature::Liveness => self.liveness,
            Feature::Speechiness => self.speechiness,
            Feature::Loudness => self.loudness,
            Feature::Key => self.key,
            Feature::Mode => self.mode,
            Feature::Valence => self.valence,
        }
    }

    pub fn set(&mut self, feature: Feature, value: Option<f64>) {
        let slot = match feature {
            Feature::Popularity => &mut self.popularity,
            Feature::Tempo => &mut self.tempo,
            Feature::Duration => &mut self.duration,
            Feature::Energy => &mut self.energy,
            Feature::Danceability => &mut self.danceability,
            Feature::Happiness => &mut self.happiness,
            Feature::Acousticness => &mut self.acousticness,
            Feature::Instrumentalness => &mut self.instrumentalness,
            Feature::Liveness => &mut self.liveness,
            Feature::Speechiness => &mut self.speechiness,
            Feature::Loudness => &mut self.loudness,
            Feature::Key => &mut self.key,
            Feature::Mode => &mut self.mode,
            Feature::Valence => &mut self.valence,
        };
        *slot = value;
    }

    /// Copies the fields owned by the analysis service from `analysis`,
    /// leaving the Spotify-sourced popularity and duration alone.
    pub fn merge_analysis(&mut self, analysis: &AudioFeatures) {
        for feature in Feature::ALL {
            if matches!(feature, Feature::Popularity | Feature::Duration) {
                continue;
            }
            self.set(feature, analysis.get(feature));
        }
    }
}

/// Attribute a song list can be sorted by.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortAttribute {
    Id,
    Name,
    Artist,
    ArtistId,
    ReleaseDate,
    Feature(Feature),
}

impl fmt::Display for SortAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortAttribute::Id => f.write_str("id"),
            SortAttribute::Name => f.write_str("name"),
            SortAttribute::Artist => f.write_str("artist"),
            SortAttribute::ArtistId => f.write_str("artist_id"),
            SortAttribute::ReleaseDate => f.write_str("release_date"),
            SortAttribute::Feature(feature) => feature.fmt(f),
        }
    }
}

impl FromStr for SortAttribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "id" => Ok(SortAttribute::Id),
            "name" => Ok(SortAttribute::Name),
            "artist" => Ok(SortAttribute::Artist),
            "artist_id" => Ok(SortAttribute::ArtistId),
            "release_date" => Ok(SortAttribute::ReleaseDate),
            other => other
                .parse::<Feature>()
                .map(SortAttribute::Feature)
                .map_err(|_| {
                    format!(
                        "invalid attribute '{}'. Expected one of: id, name, artist, artist_id, release_date, {}",
                        s.trim(),
                        Feature::ALL.map(|f| f.as_str()).join(", ")
                    )
                }),
        }
    }
}

#[derive(Tabled)]
pub struct SongTableRow {
    pub artist: String,
    pub name: String,
    pub release_date: String,
    pub genres: String,
}

#[derive(Tabled)]
pub struct SortedSongTableRow {
    pub artist: String,
    pub name: String,
    pub value: String,
}

#[derive(Tabled)]
pub struct ScoredSongTableRow {
    pub artist: String,
    pub name: String,
    pub similarity: String,
}

// Spotify Web API payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracksPage {
    pub items: Vec<SavedTrackItem>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrackItem {
    pub track: SpotifyTrack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    /// Local files in a library have no Spotify ID.
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<TrackArtist>,
    pub album: TrackAlbum,
    pub popularity: Option<u32>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

// ReccoBeats payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub content: Vec<AnalysisEntry>,
}

/// One entry of a ReccoBeats audio-features response. `id` is the
/// ReccoBeats identifier; the Spotify ID is the last segment of `href`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEntry {
    pub id: String,
    pub href: String,
    pub acousticness: Option<f64>,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub key: Option<f64>,
    pub liveness: Option<f64>,
    pub loudness: Option<f64>,
    pub mode: Option<f64>,
    pub speechiness: Option<f64>,
    pub tempo: Option<f64>,
    pub valence: Option<f64>,
}

impl AnalysisEntry {
    /// Spotify track ID this entry describes.
    pub fn spotify_id(&self) -> Option<&str> {
        self.href
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
    }

    pub fn to_features(&self) -> AudioFeatures {
        AudioFeatures {
            acousticness: self.acousticness,
            danceability: self.danceability,
            energy: self.energy,
            instrumentalness: self.instrumentalness,
            key: self.key,
            liveness: self.liveness,
            loudness: self.loudness,
            mode: self.mode,
            speechiness: self.speechiness,
            tempo: self.tempo,
            valence: self.valence,
            happiness: self.valence,
            ..AudioFeatures::default()
        }
    }
}
