//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API spexcli needs. Everything
//! here is request plumbing; deciding what to fetch and what to cache lives
//! in [`crate::library`] and [`crate::cli`].
//!
//! ## Architecture
//!
//! ```text
//! cli commands
//!      ↓
//! library::fetch_liked_songs  (LibrarySource)
//!      ↓
//! SpotifyApi  ── get_json / post_json
//!      ↓
//! send_with_backoff  (RetryPolicy)
//!      ↓
//! reqwest → api.spotify.com/v1
//! ```
//!
//! ## Submodules
//!
//! - [`auth`] - OAuth 2.0 Authorization Code flow with PKCE, token exchange
//!   and refresh
//! - [`library`] - saved tracks (`GET /me/tracks`) and artist genres
//!   (`GET /artists/{id}`)
//! - [`user`] - the current user profile (`GET /me`)
//! - [`playlist`] - playlist creation and track insertion
//!
//! ## Authentication
//!
//! [`SpotifyApi::connect`] loads the token written by `spexcli auth`. Before
//! every request the [`TokenManager`] refreshes it when it expires within
//! four minutes and persists the refreshed token.
//!
//! ## Rate Limiting and Retries
//!
//! Requests are issued one at a time and go through [`send_with_backoff`]:
//!
//! - **429 Too Many Requests**: retried for every request. The wait is the
//!   `Retry-After` header, or [`backoff_delay`] when it is missing. A
//!   `Retry-After` above [`MAX_RETRY_AFTER_SECS`] fails immediately.
//! - **502 / 503**: retried with [`backoff_delay`] only under
//!   [`RetryPolicy::Idempotent`]. GETs use it; POSTs use
//!   [`RetryPolicy::RateLimitOnly`], since a gateway error may arrive after
//!   the playlist was already created or the tracks already added.
//! - At most [`MAX_ATTEMPTS`] attempts; the last response becomes the error.
//!
//! ## Errors
//!
//! [`SpotifyError`] wraps HTTP, configuration and IO failures. Token problems
//! are [`SpotifyError::Auth`] with a hint to run `spexcli auth` again.

pub mod auth;
pub mod library;
pub mod playlist;
pub mod user;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::time::sleep;

use crate::{config, config::ConfigError, management::TokenManager};

/// Attempts per request, including the first one.
pub const MAX_ATTEMPTS: u32 = 5;
/// `Retry-After` values above this are treated as a hard failure.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;
const MAX_BACKOFF_SECS: u64 = 32;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("{0}")]
    Auth(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Delay before retry number `attempt` (1-based): 1s, 2s, 4s, ... capped at 32s.
pub fn backoff_delay(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(5);
    Duration::from_secs((1u64 << exp).min(MAX_BACKOFF_SECS))
}

/// Which failed responses [`send_with_backoff`] may resend.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Reads: retry on 429, 502 and 503.
    Idempotent,
    /// Writes: retry on 429 only, which Spotify rejects before doing anything.
    RateLimitOnly,
}

impl RetryPolicy {
    pub fn retries(self, status: StatusCode) -> bool {
        match self {
            RetryPolicy::Idempotent => {
                status == StatusCode::TOO_MANY_REQUESTS
                    || status == StatusCode::BAD_GATEWAY
                    || status == StatusCode::SERVICE_UNAVAILABLE
            }
            RetryPolicy::RateLimitOnly => status == StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

/// Sends the request built by `build`, resending it on the statuses `policy`
/// allows.
///
/// A response with a `Retry-After` header waits that long. Everything else
/// waits for [`backoff_delay`]. After [`MAX_ATTEMPTS`] the last response is
/// returned as an error.
pub async fn send_with_backoff<F>(
    policy: RetryPolicy,
    mut build: F,
) -> Result<Response, reqwest::Error>
where
    F: FnMut() -> RequestBuilder,
{
    let mut attempt = 1;
    loop {
        let response = build().send().await?;
        if !policy.retries(response.status()) || attempt >= MAX_ATTEMPTS {
            return response.error_for_status();
        }

        let wait = match retry_after(&response) {
            Some(secs) if secs > MAX_RETRY_AFTER_SECS => return response.error_for_status(),
            Some(secs) => Duration::from_secs(secs),
            None => backoff_delay(attempt),
        };

        sleep(wait).await;
        attempt += 1;
    }
}

/// Authenticated Spotify Web API client.
pub struct SpotifyApi {
    client: Client,
    base_url: String,
    tokens: TokenManager,
}

impl SpotifyApi {
    pub fn new(tokens: TokenManager, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Client using the cached token and the configured API URL.
    pub async fn connect() -> Result<Self, SpotifyError> {
        let tokens = TokenManager::load().await.map_err(|e| {
            SpotifyError::Auth(format!(
                "Failed to load token. Please run spexcli auth\n Error: {}",
                e
            ))
        })?;
        Ok(Self::new(tokens, config::spotify_apiurl()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn token(&mut self) -> Result<String, SpotifyError> {
        self.tokens.get_valid_token().await.map_err(SpotifyError::Auth)
    }

    pub(crate) async fn get_json<T>(
        &mut self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SpotifyError>
    where
        T: DeserializeOwned,
    {
        let token = self.token().await?;
        let url = self.url(path);
        let response = send_with_backoff(RetryPolicy::Idempotent, || {
            self.client.get(&url).bearer_auth(&token).query(query)
        })
        .await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn post_json<B, T>(&mut self, path: &str, body: &B) -> Result<T, SpotifyError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let token = self.token().await?;
        let url = self.url(path);
        let response = send_with_backoff(RetryPolicy::RateLimitOnly, || {
            self.client.post(&url).bearer_auth(&token).json(body)
        })
        .await?;
        Ok(response.json::<T>().await?)
    }
}
