use crate::{
    library::LibrarySource,
    spotify::{SpotifyApi, SpotifyError},
    types::{ArtistResponse, SavedTracksPage},
};

impl SpotifyApi {
    pub async fn artist(&mut self, artist_id: &str) -> Result<ArtistResponse, SpotifyError> {
        self.get_json(&format!("artists/{}", artist_id), &[]).await
    }
}

impl LibrarySource for SpotifyApi {
    type Error = SpotifyError;

    /// `GET /me/tracks`, newest first. The API caps `limit` at 50.
    async fn saved_tracks(
        &mut self,
        limit: u32,
        offset: u32,
    ) -> Result<SavedTracksPage, SpotifyError> {
        self.get_json(
            "me/tracks",
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    async fn artist_genres(&mut self, artist_id: &str) -> Result<Vec<String>, SpotifyError> {
        Ok(self.artist(artist_id).await?.genres)
    }
}
