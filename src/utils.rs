use std::{cmp::Ordering, collections::HashSet, iter::Peekable, str::Chars};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::{
    filters::YearRange,
    types::{SortAttribute, Song},
};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Compares two strings in natural (human) order.
///
/// Runs of ASCII digits are compared by numeric value, everything else
/// case-insensitively, so `"Track 2"` sorts before `"track 10"`. Strings
/// that are equal under those rules fall back to plain byte order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        let (x, y) = match (left.peek(), right.peek()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(&x), Some(&y)) => (x, y),
        };

        let ord = if x.is_ascii_digit() && y.is_ascii_digit() {
            let l = take_digits(&mut left);
            let r = take_digits(&mut right);
            cmp_digit_runs(&l, &r)
        } else {
            left.next();
            right.next();
            x.to_lowercase().cmp(y.to_lowercase())
        };

        if ord != Ordering::Equal {
            return ord;
        }
    }

    a.cmp(b)
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Value a song is ordered by for one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Missing,
    Number(f64),
    Text(String),
}

impl SortKey {
    /// Missing sorts first, then numbers by value, then text in natural order.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Less,
            (_, SortKey::Missing) => Ordering::Greater,
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => natural_cmp(a, b),
        }
    }
}

pub fn sort_key(song: &Song, attribute: SortAttribute) -> SortKey {
    let text = |s: &str| SortKey::Text(s.to_string());
    match attribute {
        SortAttribute::Id => text(&song.id),
        SortAttribute::Name => text(&song.name),
        SortAttribute::Artist => text(&song.artist),
        SortAttribute::ArtistId => text(&song.artist_id),
        SortAttribute::ReleaseDate => text(&song.release_date),
        SortAttribute::Feature(feature) => song
            .audio_features
            .get(feature)
            .map_or(SortKey::Missing, SortKey::Number),
    }
}

/// Human-readable value of `attribute`, `N/A` when the song has none.
pub fn attribute_value(song: &Song, attribute: SortAttribute) -> String {
    match sort_key(song, attribute) {
        SortKey::Missing => "N/A".to_string(),
        SortKey::Number(n) => n.to_string(),
        SortKey::Text(s) => s,
    }
}

/// Stable natural-order sort by `attribute`.
pub fn sort_songs(songs: &mut [Song], attribute: SortAttribute) {
    songs.sort_by(|a, b| sort_key(a, attribute).compare(&sort_key(b, attribute)));
}

/// Drops later songs sharing an ID with an earlier one.
pub fn remove_duplicate_songs(songs: &mut Vec<Song>) {
    let mut seen_ids = HashSet::new();
    songs.retain(|song| seen_ids.insert(song.id.clone()));
}

/// Splits a comma-separated list of song names, trimming blanks away.
pub fn parse_song_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `YYYY-YYYY` into an inclusive year range.
pub fn parse_year_range(input: &str) -> Result<YearRange, String> {
    let s = input.trim();
    let Some((first, last)) = s.split_once('-') else {
        return Err(format!("invalid year range '{s}'. Expected YYYY-YYYY"));
    };

    let parse = |part: &str| {
        part.trim()
            .parse::<i32>()
            .map_err(|_| format!("invalid year '{}' in range '{s}'", part.trim()))
    };
    let (first, last) = (parse(first)?, parse(last)?);

    if first > last {
        return Err(format!(
            "invalid year range '{s}': {first} is after {last}"
        ));
    }

    Ok(YearRange { first, last })
}

/// Parses a similarity threshold, which must lie in `[0, 1]`.
pub fn parse_threshold(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{}'", input.trim()))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("threshold must be between 0 and 1, got {value}"));
    }
    Ok(value)
}

/// Parses a vector weight, which must be finite and non-negative.
pub fn parse_weight(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{}'", input.trim()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("weight must be a non-negative number, got {value}"));
    }
    Ok(value)
}
