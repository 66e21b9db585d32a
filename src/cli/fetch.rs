use crate::{
    Res,
    cli::write_cache,
    library::{self, FeatureSource, LibrarySource},
    management::{LIKED_SONGS_CACHE, SongCache},
    output::Output,
    reccobeats::ReccoBeats,
    spotify::SpotifyApi,
};

/// Fetches up to `limit` new liked songs and appends them to the liked-songs
/// cache. Partial results are cached even when the fetch stops on an error.
pub async fn fetch_songs(cache: &SongCache, limit: usize, out: &mut impl Output) -> Res<()> {
    let mut api = SpotifyApi::connect().await?;
    let mut analysis = ReccoBeats::from_config();
    fetch_into_cache(cache, &mut api, &mut analysis, limit, out).await?;
    Ok(())
}

/// [`fetch_songs`] with explicit sources. Returns the number of new songs.
///
/// An unreadable liked-songs cache aborts before anything is fetched, since
/// writing the new songs would otherwise replace it.
pub async fn fetch_into_cache<L, F>(
    cache: &SongCache,
    library: &mut L,
    features: &mut F,
    limit: usize,
    out: &mut impl Output,
) -> Res<usize>
where
    L: LibrarySource,
    F: FeatureSource,
{
    let cached = cache.load(LIKED_SONGS_CACHE).await?.unwrap_or_default();
    out.info(&format!(
        "Fetching liked songs from Spotify ({} already cached)...",
        cached.len()
    ));

    let outcome = library::fetch_liked_songs(library, features, cached, limit, out).await;

    if outcome.added > 0 {
        write_cache(cache, LIKED_SONGS_CACHE, &outcome.songs, out).await;
    }

    out.success(&format!(
        "Fetched {} new songs, {} songs cached in total.",
        outcome.added,
        outcome.songs.len()
    ));
    Ok(outcome.added)
}
