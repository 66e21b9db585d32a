use std::{
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{config, types::Song};

/// Every liked song fetched so far.
pub const LIKED_SONGS_CACHE: &str = "liked_songs_cache";
/// Result of the latest explore/sort/similar command.
pub const SONGS_CACHE: &str = "songs_cache";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    IoError(#[from] Error),
    #[error("malformed cache document: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("invalid cache name '{0}'")]
    InvalidName(String),
}

/// Named JSON song documents below one directory.
///
/// Documents are always replaced as a whole. Writes go to a sibling
/// temporary file that is renamed over the target, so a crash mid-write
/// leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct SongCache {
    dir: PathBuf,
}

impl SongCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache rooted at [`config::data_dir`].
    pub fn from_config() -> Self {
        Self::new(config::data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> Result<PathBuf, CacheError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(CacheError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Reads document `name`. `Ok(None)` means it was never written.
    pub async fn load(&self, name: &str) -> Result<Option<Vec<Song>>, CacheError> {
        let path = self.path(name)?;
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::IoError(e)),
        };

        let songs = serde_json::from_str(&content)?;
        Ok(Some(songs))
    }

    /// Replaces document `name` with `songs`.
    pub async fn save(&self, name: &str, songs: &[Song]) -> Result<(), CacheError> {
        let path = self.path(name)?;
        async_fs::create_dir_all(&self.dir).await?;

        let json = serde_json::to_string_pretty(songs)?;
        let tmp = path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;

        if let Err(e) = async_fs::rename(&tmp, &path).await {
            let _ = async_fs::remove_file(&tmp).await;
            return Err(CacheError::IoError(e));
        }
        Ok(())
    }
}
