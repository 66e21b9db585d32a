use crate::{
    Res,
    cli::{read_cache, song_table, write_cache},
    filters::SongFilter,
    management::{LIKED_SONGS_CACHE, SONGS_CACHE, SongCache},
    output::Output,
};

/// Filters the liked songs and stores the matches as the working set.
/// Returns the number of matches; 0 when there is nothing cached.
pub async fn explore(cache: &SongCache, filter: &SongFilter, out: &mut impl Output) -> Res<usize> {
    let Some(songs) = read_cache(cache, LIKED_SONGS_CACHE, out).await else {
        return Ok(0);
    };

    let filtered = filter.apply(songs);
    out.success(&format!("Found {} songs matching filters", filtered.len()));

    if !filtered.is_empty() {
        out.line(&song_table(&filtered));
    }

    write_cache(cache, SONGS_CACHE, &filtered, out).await;
    Ok(filtered.len())
}
