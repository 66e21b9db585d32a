//! # Spotify Authentication
//!
//! OAuth 2.0 Authorization Code flow with PKCE. No client secret is involved,
//! only the client ID from `SPOTIFY_API_AUTH_CLIENT_ID`.
//!
//! ## Flow
//!
//! ```text
//! spexcli auth
//!   → verifier + S256 challenge stored in the shared PkceToken
//!   → callback server bound on SERVER_ADDRESS
//!   → browser opens accounts.spotify.com/authorize
//!   → Spotify redirects to /callback?code=...
//!   → api::callback exchanges the code (exchange_code_pkce)
//!   → auth() picks the token up and persists it
//! ```
//!
//! The whole round trip has two minutes. After that `auth` fails and the
//! server task is dropped with the runtime.
//!
//! ## Token Lifetime
//!
//! Tokens are stored with the time they were obtained. [`refresh_token`] is
//! called by [`TokenManager`] before a request once the token is within four
//! minutes of expiring; the refreshed token replaces the stored one.

use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    config,
    management::TokenManager,
    output::Output,
    server,
    spotify::SpotifyError,
    types::{PkceToken, Token},
    utils,
};

/// How long `auth` waits for the browser round trip.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    scope: Option<String>,
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh_token: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Runs the Authorization Code flow with PKCE and persists the token.
///
/// 1. Generates the code verifier and its S256 challenge
/// 2. Binds the local callback server on `SERVER_ADDRESS`
/// 3. Opens the consent page in the browser (or prints the URL)
/// 4. Waits for the callback to exchange the code for a token
/// 5. Saves the token through [`TokenManager`]
pub async fn auth(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    out: &mut impl Output,
) -> Result<(), SpotifyError> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;
    let addr = SocketAddr::from_str(&config::server_addr()?)
        .map_err(|e| SpotifyError::Auth(format!("Failed to parse server address: {}", e)))?;

    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let listener = TcpListener::bind(addr).await?;
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        server::serve(listener, server_state).await;
    });

    let auth_url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri.as_str()),
            ("code_challenge", code_challenge.as_str()),
            ("code_challenge_method", "S256"),
            ("scope", config::spotify_scope().as_str()),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| SpotifyError::Auth(format!("Invalid authorization URL: {}", e)))?;

    if webbrowser::open(auth_url.as_str()).is_err() {
        out.warning(&format!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        ));
    } else {
        out.info("Waiting for Spotify authorization in your browser...");
    }

    let Some(token) = wait_for_token(shared_state).await else {
        return Err(SpotifyError::Auth(
            "Authentication failed or timed out.".to_string(),
        ));
    };

    TokenManager::new(token)
        .persist()
        .await
        .map_err(|e| SpotifyError::Auth(format!("Failed to save token to cache: {}", e)))?;

    out.success("Authentication successful!");
    Ok(())
}

/// Polls the shared state once per second until the callback stored a token
/// or [`CALLBACK_TIMEOUT`] passes.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    let start = std::time::Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
                return Some(token.clone());
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a fresh access token. Spotify may or may not
/// rotate the refresh token; the old one is kept when it does not.
pub async fn refresh_token(refresh_token: &str) -> Result<Token, SpotifyError> {
    let client_id = config::spotify_client_id()?;

    let response = Client::new()
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: TokenResponse = response.json().await?;
    Ok(json.into_token(Some(refresh_token)))
}

/// Exchanges the authorization code received on the callback for a token.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, SpotifyError> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;

    let response = Client::new()
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: TokenResponse = response.json().await?;
    Ok(json.into_token(None))
}
