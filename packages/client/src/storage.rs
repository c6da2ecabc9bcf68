//! Durable token storage.
//!
//! The persisted pair is the sole source of truth for reconstructing a
//! session on startup. It is read once at launch and written only on
//! login/register, successful refresh, and logout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::types::TokenPair;

#[async_trait]
pub trait BaseTokenStore: Send + Sync {
    /// Read the persisted pair, if any.
    async fn load(&self) -> Result<Option<TokenPair>>;

    /// Persist the pair, replacing whatever was stored.
    async fn save(&self, tokens: &TokenPair) -> Result<()>;

    /// Remove the persisted pair.
    async fn clear(&self) -> Result<()>;
}

/// File-backed token store writing `{"token": …, "refreshToken": …}`.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BaseTokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("Failed to read token file"),
        };

        match serde_json::from_slice::<TokenPair>(&bytes) {
            Ok(pair) => Ok(Some(pair)),
            Err(e) => {
                // Unreadable file is treated as no session rather than a hard
                // failure; the user just signs in again.
                tracing::warn!(error = %e, path = %self.path.display(), "discarding corrupt token file");
                Ok(None)
            }
        }
    }

    async fn save(&self, tokens: &TokenPair) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create token directory")?;
        }
        let bytes = serde_json::to_vec_pretty(tokens)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .context("Failed to write token file")?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove token file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    #[tokio::test]
    async fn save_load_clear_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        assert!(store.load().await.unwrap().is_none());

        store.save(&pair()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(pair()));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = FileTokenStore::new(path);
        assert!(store.load().await.unwrap().is_none());
    }
}
