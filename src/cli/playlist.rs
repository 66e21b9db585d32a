use crate::{
    Res,
    cli::read_cache,
    management::{SONGS_CACHE, SongCache},
    output::Output,
    spotify::{SpotifyApi, playlist::MAX_TRACKS_PER_REQUEST},
};

/// Creates a playlist for the current user holding the working set.
pub async fn create_playlist(
    cache: &SongCache,
    name: &str,
    description: &str,
    out: &mut impl Output,
) -> Res<()> {
    let Some(songs) = read_cache(cache, SONGS_CACHE, out).await else {
        return Ok(());
    };

    if songs.is_empty() {
        out.warning("The song cache is empty, no playlist created.");
        return Ok(());
    }

    let mut api = SpotifyApi::connect().await?;
    let user = api.current_user().await?;

    let playlist = api.create_playlist(&user.id, name, description).await?;
    out.success(&format!(
        "Created playlist: {} (ID: {})",
        playlist.name, playlist.id
    ));

    let track_ids: Vec<String> = songs.iter().map(|s| s.id.clone()).collect();
    let mut added = 0;
    for chunk in track_ids.chunks(MAX_TRACKS_PER_REQUEST) {
        match api.add_tracks(&playlist.id, chunk).await {
            Ok(_) => added += chunk.len(),
            Err(e) => out.warning(&format!("Failed to add tracks to playlist: {}", e)),
        }
    }

    out.success(&format!(
        "Added {} of {} songs to playlist {}.",
        added,
        track_ids.len(),
        playlist.name
    ));
    Ok(())
}
