//! Spotify Liked Songs Explorer Library
//!
//! Fetches a user's liked songs together with their artist genres and audio
//! analysis, caches them locally and offers filtering, sorting, playlist
//! creation and content-based similarity ranking on top of that cache.
//!
//! # Data Flow
//!
//! ```text
//! fetch-songs ─→ liked_songs_cache ─→ explore / similar ─→ songs_cache
//!                                                               ↓
//!                                           sort / create-playlist
//! ```
//!
//! `liked_songs_cache` is the library snapshot written only by `fetch-songs`.
//! `songs_cache` is the working set: every filtering command replaces it and
//! `sort` and `create-playlist` read it back.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local OAuth callback server
//! - `cli` - one function per command
//! - `config` - environment configuration
//! - `filters` - song filter predicates
//! - `library` - liked songs fetch loop and its source traits
//! - `management` - token and song cache persistence
//! - `output` - user facing output sinks
//! - `reccobeats` - audio analysis client
//! - `server` - local HTTP server for OAuth callbacks
//! - `similarity` - feature vectors and the recommender
//! - `spotify` - Spotify Web API client
//! - `types` - data structures and wire types
//! - `utils` - PKCE, sorting and argument parsing helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod filters;
pub mod library;
pub mod management;
pub mod output;
pub mod reccobeats;
pub mod server;
pub mod similarity;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result type used by the command layer.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a red error line and exits with status 1.
///
/// Only for fatal errors in `main`; everything below the command layer
/// returns its errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow warning line.
///
/// Used by the callback server, which runs detached from any [`output::Output`].
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
