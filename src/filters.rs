//! Predicates used by the `explore` command.
//!
//! Every predicate treats an unset criterion as a pass, so a [`SongFilter`]
//! with nothing set keeps every song.

use crate::types::{Feature, Song};

/// Inclusive range of release years.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct YearRange {
    pub first: i32,
    pub last: i32,
}

/// Closed range over one audio feature. Either bound may be open.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FeatureRange {
    pub feature: Feature,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FeatureRange {
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn matches(&self, song: &Song) -> bool {
        in_range(song.audio_features.get(self.feature), self.min, self.max)
    }
}

/// Case-insensitive substring match. A missing needle always passes.
pub fn contains_text(value: &str, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Like [`contains_text`], passing when any element of `values` matches.
pub fn contains_any(values: &[String], needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(_) => values.iter().any(|v| contains_text(v, needle)),
    }
}

/// `min <= value <= max` on whichever bounds are set.
///
/// With no bound set everything passes, including a missing value. With any
/// bound set a missing value fails.
pub fn in_range(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

/// Year component of a `YYYY[-MM[-DD]]` release date.
pub fn release_year(release_date: &str) -> Option<i32> {
    release_date.trim().split('-').next()?.parse().ok()
}

pub fn year_matches(release_date: &str, year: Option<i32>) -> bool {
    match year {
        None => true,
        Some(year) => release_year(release_date) == Some(year),
    }
}

/// Inclusive on both ends.
pub fn year_in_range(release_date: &str, range: Option<YearRange>) -> bool {
    match range {
        None => true,
        Some(range) => release_year(release_date)
            .is_some_and(|y| (range.first..=range.last).contains(&y)),
    }
}

/// Conjunction of all `explore` criteria.
#[derive(Debug, Clone, Default)]
pub struct SongFilter {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub release_year_range: Option<YearRange>,
    pub key: Option<f64>,
    pub mode: Option<f64>,
    pub ranges: Vec<FeatureRange>,
}

impl SongFilter {
    pub fn matches(&self, song: &Song) -> bool {
        contains_text(&song.name, self.name.as_deref())
            && contains_text(&song.artist, self.artist.as_deref())
            && contains_any(&song.genres, self.genre.as_deref())
            && contains_text(&song.release_date, self.release_date.as_deref())
            && year_matches(&song.release_date, self.release_year)
            && year_in_range(&song.release_date, self.release_year_range)
            && in_range(song.audio_features.key, self.key, self.key)
            && in_range(song.audio_features.mode, self.mode, self.mode)
            && self.ranges.iter().all(|range| range.matches(song))
    }

    pub fn apply(&self, songs: Vec<Song>) -> Vec<Song> {
        songs.into_iter().filter(|s| self.matches(s)).collect()
    }
}
