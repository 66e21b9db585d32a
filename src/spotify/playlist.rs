use crate::{
    spotify::{SpotifyApi, SpotifyError},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse,
    },
};

/// Tracks accepted per add-items request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

impl SpotifyApi {
    /// Creates a public, non-collaborative playlist owned by `user_id`.
    pub async fn create_playlist(
        &mut self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: true,
            collaborative: false,
        };
        self.post_json(&format!("users/{}/playlists", user_id), &body)
            .await
    }

    /// Appends tracks to a playlist. Callers chunk to
    /// [`MAX_TRACKS_PER_REQUEST`].
    pub async fn add_tracks(
        &mut self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
        let body = AddTrackToPlaylistRequest {
            uris: track_ids.iter().map(|id| track_uri(id)).collect(),
        };
        self.post_json(&format!("playlists/{}/tracks", playlist_id), &body)
            .await
    }
}
