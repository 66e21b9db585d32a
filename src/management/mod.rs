mod auth;
mod cache;

pub use auth::TokenManager;
pub use cache::CacheError;
pub use cache::LIKED_SONGS_CACHE;
pub use cache::SONGS_CACHE;
pub use cache::SongCache;
