//! Song similarity ranking.
//!
//! Songs are turned into one combined vector each: a one-hot genre block
//! followed by a min-max normalized audio-feature block, each scaled by its
//! weight. The query songs are averaged into a single centroid and every
//! candidate is scored by cosine similarity against it.
//!
//! Two values pin the vector layout and must be shared by everything that is
//! compared: the [`GenreUniverse`] fixes the genre components and the
//! [`FeatureScale`] fixes the normalization of the audio components.

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    types::{Feature, Song},
    utils::natural_cmp,
};

#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("song '{0}' not found in liked songs")]
    SongNotFound(String),
}

/// Finds a song by exact, case-insensitive name. The first match wins.
pub fn find_song_by_name(songs: &[Song], name: &str) -> Result<Song, LookupError> {
    let wanted = name.trim().to_lowercase();
    songs
        .iter()
        .find(|s| s.name.trim().to_lowercase() == wanted)
        .cloned()
        .ok_or_else(|| LookupError::SongNotFound(name.trim().to_string()))
}

/// Resolves every name or fails on the first one that is unknown.
pub fn resolve_songs(songs: &[Song], names: &[String]) -> Result<Vec<Song>, LookupError> {
    names
        .iter()
        .map(|name| find_song_by_name(songs, name))
        .collect()
}

/// Distinct genres of a song collection in natural order. The position of a
/// genre is its component index in genre vectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenreUniverse {
    genres: Vec<String>,
}

impl GenreUniverse {
    pub fn from_songs(songs: &[Song]) -> Self {
        let mut seen = HashSet::new();
        let mut genres: Vec<String> = songs
            .iter()
            .flat_map(|s| s.genres.iter())
            .filter(|g| seen.insert(g.as_str()))
            .cloned()
            .collect();
        genres.sort_by(|a, b| natural_cmp(a, b));
        Self { genres }
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// Binary vector of `song` over this universe. Genres outside the
    /// universe are ignored.
    pub fn vector(&self, song: &Song) -> Vec<f64> {
        self.genres
            .iter()
            .map(|g| if song.genres.contains(g) { 1.0 } else { 0.0 })
            .collect()
    }

    pub fn vectorize(&self, songs: &[Song]) -> Vec<Vec<f64>> {
        songs.iter().map(|s| self.vector(s)).collect()
    }
}

/// Observed range of one feature in a reference population.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FeatureBounds {
    pub min: f64,
    pub max: f64,
}

impl FeatureBounds {
    const EMPTY: FeatureBounds = FeatureBounds {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// `(value - min) / (max - min)`, or 0.0 when the range is empty or
    /// zero-width.
    pub fn scale(&self, value: f64) -> f64 {
        if self.max > self.min {
            (value - self.min) / (self.max - self.min)
        } else {
            0.0
        }
    }
}

/// Min-max normalization parameters for [`Feature::VECTOR_ORDER`], fitted on
/// a reference population.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScale {
    bounds: Vec<(Feature, FeatureBounds)>,
}

impl FeatureScale {
    /// Absent values do not contribute. A feature no reference song has keeps
    /// the empty `+inf..-inf` bounds and scales everything to 0.0.
    pub fn fit<'a, I>(reference: I) -> Self
    where
        I: IntoIterator<Item = &'a Song>,
    {
        let mut bounds: Vec<(Feature, FeatureBounds)> = Feature::VECTOR_ORDER
            .iter()
            .map(|f| (*f, FeatureBounds::EMPTY))
            .collect();

        for song in reference {
            for (feature, range) in bounds.iter_mut() {
                if let Some(value) = song.audio_features.get(*feature) {
                    range.include(value);
                }
            }
        }

        Self { bounds }
    }

    pub fn bounds(&self, feature: Feature) -> Option<FeatureBounds> {
        self.bounds
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, b)| *b)
    }

    /// Returns copies of `songs` with every scaled feature rescaled. Absent
    /// values stay absent; everything else on the song is untouched.
    pub fn normalize(&self, songs: &[Song]) -> Vec<Song> {
        songs
            .iter()
            .map(|song| {
                let mut song = song.clone();
                for (feature, range) in &self.bounds {
                    let scaled = song.audio_features.get(*feature).map(|v| range.scale(v));
                    song.audio_features.set(*feature, scaled);
                }
                song
            })
            .collect()
    }
}

/// Normalized audio vectors in [`Feature::VECTOR_ORDER`].
///
/// Missing features become 0.0, which is indistinguishable from the
/// reference minimum.
pub fn feature_vectors(songs: &[Song], scale: &FeatureScale) -> Vec<Vec<f64>> {
    scale
        .normalize(songs)
        .iter()
        .map(|song| {
            Feature::VECTOR_ORDER
                .iter()
                .map(|f| song.audio_features.get(*f).unwrap_or(0.0))
                .collect()
        })
        .collect()
}

/// [`feature_vectors`] with `songs` as their own reference population.
pub fn self_scaled_feature_vectors(songs: &[Song]) -> Vec<Vec<f64>> {
    feature_vectors(songs, &FeatureScale::fit(songs))
}

/// `(a·b) / (|a||b|)`, defined as 0.0 when either vector has zero magnitude.
///
/// Identical non-zero vectors score exactly 1.0, so a threshold of 1.0 keeps
/// exact matches.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vector dimensions must match");

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    // A single square root: sqrt(n * n) rounds back to exactly n.
    (dot / (norm_a * norm_b).sqrt()).clamp(-1.0, 1.0)
}

/// Per-component arithmetic mean. Empty input gives an empty vector.
pub fn centroid(vectors: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };

    let mut sum = vec![0.0; first.len()];
    for vector in vectors {
        for (acc, v) in sum.iter_mut().zip(vector) {
            *acc += v;
        }
    }

    let n = vectors.len() as f64;
    sum.into_iter().map(|s| s / n).collect()
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Weights {
    pub genre: f64,
    pub audio: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            genre: 0.5,
            audio: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSong<'a> {
    pub song: &'a Song,
    pub similarity: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Recommender {
    pub weights: Weights,
    pub threshold: f64,
}

impl Default for Recommender {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            threshold: 0.7,
        }
    }
}

impl Recommender {
    pub fn new(weights: Weights, threshold: f64) -> Self {
        Self { weights, threshold }
    }

    /// Weighted genre block followed by the weighted audio block, per song.
    fn combined_vectors(
        &self,
        songs: &[Song],
        universe: &GenreUniverse,
        scale: &FeatureScale,
    ) -> Vec<Vec<f64>> {
        let genres = universe.vectorize(songs);
        let audio = feature_vectors(songs, scale);

        genres
            .into_iter()
            .zip(audio)
            .map(|(g, a)| {
                g.into_iter()
                    .map(|v| v * self.weights.genre)
                    .chain(a.into_iter().map(|v| v * self.weights.audio))
                    .collect()
            })
            .collect()
    }

    /// Similarity of every candidate to the query centroid, in pool order.
    ///
    /// The genre universe comes from the candidates only, so genres that
    /// appear only in the query do not take part in scoring.
    pub fn scores(&self, query: &[Song], candidates: &[Song], scale: &FeatureScale) -> Vec<f64> {
        if query.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let universe = GenreUniverse::from_songs(candidates);
        let target = centroid(&self.combined_vectors(query, &universe, scale));

        self.combined_vectors(candidates, &universe, scale)
            .iter()
            .map(|v| cosine_similarity(v, &target))
            .collect()
    }

    /// Candidates scoring at or above the threshold, in pool order.
    pub fn rank<'a>(
        &self,
        query: &[Song],
        candidates: &'a [Song],
        scale: &FeatureScale,
    ) -> Vec<ScoredSong<'a>> {
        self.scores(query, candidates, scale)
            .into_iter()
            .zip(candidates)
            .filter(|(similarity, _)| *similarity >= self.threshold)
            .map(|(similarity, song)| ScoredSong { song, similarity })
            .collect()
    }
}
