use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    Res,
    output::Output,
    spotify::{self, SpotifyApi},
};

pub async fn auth(out: &mut impl Output) -> Res<()> {
    let shared_state = Arc::new(Mutex::new(None));
    spotify::auth::auth(shared_state, out).await?;
    Ok(())
}

/// Checks the cached token by fetching the user profile. Fetches no songs.
pub async fn test_auth(out: &mut impl Output) -> Res<()> {
    let mut api = SpotifyApi::connect().await?;
    let user = api.current_user().await?;

    out.success(&format!(
        "Authenticated as: {} ({})",
        user.display_name.as_deref().unwrap_or("unknown"),
        user.id
    ));
    Ok(())
}
