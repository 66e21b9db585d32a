use crate::{
    spotify::{SpotifyApi, SpotifyError},
    types::CurrentUser,
};

impl SpotifyApi {
    /// Profile of the user the token belongs to.
    pub async fn current_user(&mut self) -> Result<CurrentUser, SpotifyError> {
        self.get_json("me", &[]).await
    }
}
