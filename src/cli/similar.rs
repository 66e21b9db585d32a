use std::str::FromStr;

use tabled::Table;

use crate::{
    Res,
    cli::{display_or_unknown, read_cache, write_cache},
    management::{LIKED_SONGS_CACHE, SONGS_CACHE, SongCache},
    output::Output,
    similarity::{FeatureScale, Recommender, Weights, resolve_songs},
    types::{ScoredSongTableRow, Song},
    utils,
};

/// Where the songs to be scored come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// Every liked song.
    LikedSongs,
    /// The working set left by the previous command.
    Cache,
    /// Liked songs picked by name.
    Songs(Vec<String>),
}

impl FromStr for CandidateSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "liked_songs" | "liked-songs" => Ok(CandidateSource::LikedSongs),
            "cache" => Ok(CandidateSource::Cache),
            other => {
                let names = utils::parse_song_names(other);
                if names.is_empty() {
                    Err("candidate source cannot be empty; use liked_songs, cache or a comma-separated list of songs".to_string())
                } else {
                    Ok(CandidateSource::Songs(names))
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimilarOptions {
    /// Query song names. `None` uses the working set as the query.
    pub songs: Option<Vec<String>>,
    /// Candidate pool. `None` means all liked songs.
    pub source: Option<CandidateSource>,
    pub weights: Weights,
    pub threshold: f64,
}

fn require(songs: Option<Vec<Song>>, name: &str) -> Res<Vec<Song>> {
    songs.ok_or_else(|| format!("No usable {}, cannot compute similar songs.", name).into())
}

/// Ranks the candidate pool against the query songs and stores the songs at
/// or above the threshold as the working set. Returns how many were kept.
///
/// Any query or candidate name that is not a liked song aborts the command
/// before anything is scored.
pub async fn similar(cache: &SongCache, opts: &SimilarOptions, out: &mut impl Output) -> Res<usize> {
    if opts.songs.is_none() && opts.source.is_none() {
        return Err(
            "You must provide at least one song or candidate pool for recommendation.".into(),
        );
    }

    let needs_liked = opts.songs.is_some()
        || !matches!(opts.source, Some(CandidateSource::Cache));
    let liked = if needs_liked {
        require(read_cache(cache, LIKED_SONGS_CACHE, out).await, LIKED_SONGS_CACHE)?
    } else {
        Vec::new()
    };

    let query = match &opts.songs {
        Some(names) => resolve_songs(&liked, names)?,
        None => require(read_cache(cache, SONGS_CACHE, out).await, SONGS_CACHE)?,
    };

    let mut candidates = match &opts.source {
        None | Some(CandidateSource::LikedSongs) => liked.clone(),
        Some(CandidateSource::Cache) => {
            require(read_cache(cache, SONGS_CACHE, out).await, SONGS_CACHE)?
        }
        Some(CandidateSource::Songs(names)) => resolve_songs(&liked, names)?,
    };
    utils::remove_duplicate_songs(&mut candidates);

    if query.is_empty() || candidates.is_empty() {
        out.warning("Nothing to compare: the query songs or the candidate pool is empty.");
    }

    out.info(&format!(
        "Comparing {} candidates against {} query songs (genre weight {}, audio weight {}, threshold {})",
        candidates.len(),
        query.len(),
        opts.weights.genre,
        opts.weights.audio,
        opts.threshold
    ));

    let scale = FeatureScale::fit(candidates.iter().chain(query.iter()));
    let ranked = Recommender::new(opts.weights, opts.threshold).rank(&query, &candidates, &scale);

    if !ranked.is_empty() {
        let rows: Vec<ScoredSongTableRow> = ranked
            .iter()
            .map(|r| ScoredSongTableRow {
                artist: display_or_unknown(&r.song.artist),
                name: display_or_unknown(&r.song.name),
                similarity: format!("{:.4}", r.similarity),
            })
            .collect();
        out.line(&Table::new(rows).to_string());
    }
    out.success(&format!("Total similar songs found: {}", ranked.len()));

    let similar_songs: Vec<Song> = ranked.into_iter().map(|r| r.song.clone()).collect();
    write_cache(cache, SONGS_CACHE, &similar_songs, out).await;
    Ok(similar_songs.len())
}
