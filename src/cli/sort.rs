use tabled::Table;

use crate::{
    Res,
    cli::{display_or_unknown, read_cache, write_cache},
    management::{SONGS_CACHE, SongCache},
    output::Output,
    types::{SortAttribute, SortedSongTableRow},
    utils,
};

/// Sorts the working set by `attribute` and writes it back.
pub async fn sort(cache: &SongCache, attribute: SortAttribute, out: &mut impl Output) -> Res<()> {
    let Some(mut songs) = read_cache(cache, SONGS_CACHE, out).await else {
        return Ok(());
    };

    out.info(&format!("Sorting songs by attribute: {}...", attribute));
    utils::sort_songs(&mut songs, attribute);

    let rows: Vec<SortedSongTableRow> = songs
        .iter()
        .map(|s| SortedSongTableRow {
            artist: display_or_unknown(&s.artist),
            name: display_or_unknown(&s.name),
            value: utils::attribute_value(s, attribute),
        })
        .collect();

    out.success(&format!("Songs sorted by {}:", attribute));
    out.line(&Table::new(rows).to_string());

    write_cache(cache, SONGS_CACHE, &songs, out).await;
    Ok(())
}
