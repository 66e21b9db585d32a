//! # Configuration Module
//!
//! Configuration management for spexcli. Every setting is read from the
//! process environment, optionally seeded from a `.env` file that the build
//! script copies into the application directory as `.env.example`.
//!
//! ## Lookup Order
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in `<local data dir>/spexcli/`
//! 3. Application defaults (endpoints, scope and the data directory)
//!
//! `dotenv` never overwrites a variable that is already set, so an exported
//! value always wins over the file.
//!
//! ## Environment Variables
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `SERVER_ADDRESS` | yes | |
//! | `SPOTIFY_API_AUTH_CLIENT_ID` | yes | |
//! | `SPOTIFY_API_REDIRECT_URI` | yes | |
//! | `SPOTIFY_API_AUTH_SCOPE` | no | [`DEFAULT_SPOTIFY_SCOPE`] |
//! | `SPOTIFY_API_AUTH_URL` | no | [`DEFAULT_SPOTIFY_AUTH_URL`] |
//! | `SPOTIFY_API_TOKEN_URL` | no | [`DEFAULT_SPOTIFY_TOKEN_URL`] |
//! | `SPOTIFY_API_URL` | no | [`DEFAULT_SPOTIFY_API_URL`] |
//! | `RECCOBEATS_API_URL` | no | [`DEFAULT_RECCOBEATS_API_URL`] |
//! | `SPEXCLI_DATA_DIR` | no | `<app dir>/data` |
//!
//! Blank values count as unset. Required values are only checked by the
//! commands that use them, so `explore` or `sort` work offline without any
//! Spotify credentials.
//!
//! ## Files
//!
//! ```text
//! <app dir>/
//! ├── .env              optional settings
//! ├── cache/token.json  OAuth token written by `spexcli auth`
//! └── data/             song caches (see crate::management::SongCache)
//! ```
//!
//! ## Errors
//!
//! [`ConfigError::Missing`] names the variable that has to be set.
//! [`ConfigError::Dotenv`] reports a malformed `.env` file, and
//! [`ConfigError::Io`] a data directory that cannot be created.

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_SCOPE: &str =
    "user-library-read playlist-modify-public user-read-private";
pub const DEFAULT_RECCOBEATS_API_URL: &str = "https://api.reccobeats.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set (see .env.example in the spexcli data directory)")]
    Missing(&'static str),
    #[error("cannot prepare config directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse .env file: {0}")]
    Dotenv(String),
}

/// Root of everything spexcli writes locally.
///
/// - Linux: `~/.local/share/spexcli`
/// - macOS: `~/Library/Application Support/spexcli`
/// - Windows: `%LOCALAPPDATA%/spexcli`
pub fn app_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spexcli");
    path
}

/// Loads `<app dir>/.env` into the process environment.
///
/// A missing file is fine, since every value may also come from the real
/// environment. A malformed file is reported.
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = app_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| ConfigError::Dotenv(e.to_string()))?;
    Ok(())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Address the local OAuth callback server binds to, e.g. `127.0.0.1:8888`.
pub fn server_addr() -> Result<String, ConfigError> {
    required("SERVER_ADDRESS")
}

/// Client ID of the Spotify application used for the PKCE flow.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Redirect URI registered with the Spotify application. Must point at
/// [`server_addr`] with the `/callback` path.
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_API_REDIRECT_URI")
}

pub fn spotify_scope() -> String {
    optional("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    optional("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

pub fn reccobeats_apiurl() -> String {
    optional("RECCOBEATS_API_URL", DEFAULT_RECCOBEATS_API_URL)
}

/// Directory holding the song cache documents.
///
/// `SPEXCLI_DATA_DIR` overrides the default `<app dir>/data`.
pub fn data_dir() -> PathBuf {
    match env::var("SPEXCLI_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => app_dir().join("data"),
    }
}
