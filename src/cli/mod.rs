//! # CLI Module
//!
//! One function per `spexcli` command. Every command receives the
//! [`SongCache`] it works on and an [`Output`] sink for everything the user
//! sees, and returns an error only for failures that should end the process
//! with a non-zero status.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth 2.0 PKCE login
//! - [`test_auth`] - prints who the cached token belongs to
//! - [`fetch_songs`] - fetches new liked songs into `liked_songs_cache`
//! - [`explore`] - filters `liked_songs_cache` into `songs_cache`
//! - [`sort`] - sorts `songs_cache` in place
//! - [`create_playlist`] - turns `songs_cache` into a Spotify playlist
//! - [`similar`] - ranks a candidate pool against query songs into `songs_cache`
//!
//! ## Typical session
//!
//! ```bash
//! spexcli auth
//! spexcli fetch-songs --limit 500
//! spexcli explore --genre punk --min-energy 0.8
//! spexcli sort --attribute tempo
//! spexcli similar --songs "Basket Case" --source liked_songs -t 0.85
//! spexcli create-playlist --name "Fast punk"
//! ```

mod auth;
mod explore;
mod fetch;
mod playlist;
mod similar;
mod sort;

pub use auth::auth;
pub use auth::test_auth;
pub use explore::explore;
pub use fetch::{fetch_into_cache, fetch_songs};
pub use playlist::create_playlist;
pub use similar::{CandidateSource, SimilarOptions, similar};
pub use sort::sort;

use tabled::Table;

use crate::{
    management::SongCache,
    output::Output,
    types::{Song, SongTableRow},
};

/// Reads cache `name`, reporting problems instead of returning them.
///
/// `None` means there is no usable cache: it was never written or could not
/// be read. `Some(vec![])` is a cache that exists but is empty.
pub async fn read_cache(cache: &SongCache, name: &str, out: &mut impl Output) -> Option<Vec<Song>> {
    match cache.load(name).await {
        Ok(Some(songs)) => {
            out.info(&format!("Read {} cached songs from {}", songs.len(), name));
            Some(songs)
        }
        Ok(None) => {
            out.warning(&format!(
                "No {} found in {}. Run spexcli fetch-songs first.",
                name,
                cache.dir().display()
            ));
            None
        }
        Err(e) => {
            out.failure(&format!("Error reading cached songs from {}: {}", name, e));
            None
        }
    }
}

/// Overwrites cache `name` with `songs`, reporting the outcome.
pub async fn write_cache(cache: &SongCache, name: &str, songs: &[Song], out: &mut impl Output) {
    match cache.save(name, songs).await {
        Ok(()) => out.success(&format!("Cached {} songs to {}", songs.len(), name)),
        Err(e) => out.failure(&format!("Error caching songs to {}: {}", name, e)),
    }
}

/// Renders songs as an artist/name/release/genres table.
pub fn song_table(songs: &[Song]) -> String {
    let rows: Vec<SongTableRow> = songs
        .iter()
        .map(|s| SongTableRow {
            artist: display_or_unknown(&s.artist),
            name: display_or_unknown(&s.name),
            release_date: s.release_date.clone(),
            genres: s
                .genres
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(","),
        })
        .collect();

    Table::new(rows).to_string()
}

pub(crate) fn display_or_unknown(value: &str) -> String {
    if value.trim().is_empty() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}
