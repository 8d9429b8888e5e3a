//! Durable storage for the session token pair.
//!
//! The store holds at most one access/refresh pair and keeps the two
//! tokens consistent across session transitions: an access token is
//! never present without its refresh token. Expiry is not tracked here;
//! it is discovered reactively through a 401 response.

use crate::error::{CoreError, CoreResult};
use crate::types::TokenPair;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a full token pair, replacing any previous pair.
    async fn save(&self, pair: &TokenPair) -> CoreResult<()>;

    /// Current access token, if a session exists.
    async fn access(&self) -> CoreResult<Option<String>>;

    /// Current refresh token, if a session exists.
    async fn refresh(&self) -> CoreResult<Option<String>>;

    /// Replace the access token, leaving the refresh token unchanged.
    ///
    /// Fails when no refresh token is stored.
    async fn set_access(&self, access: &str) -> CoreResult<()>;

    /// Remove both tokens.
    async fn clear(&self) -> CoreResult<()>;
}

/// In-process token store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryTokenStore {
    pair: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            pair: RwLock::new(Some(pair)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn save(&self, pair: &TokenPair) -> CoreResult<()> {
        *self.pair.write().await = Some(pair.clone());
        Ok(())
    }

    async fn access(&self) -> CoreResult<Option<String>> {
        Ok(self.pair.read().await.as_ref().map(|p| p.access.clone()))
    }

    async fn refresh(&self) -> CoreResult<Option<String>> {
        Ok(self.pair.read().await.as_ref().map(|p| p.refresh.clone()))
    }

    async fn set_access(&self, access: &str) -> CoreResult<()> {
        let mut guard = self.pair.write().await;
        match guard.as_mut() {
            Some(pair) => {
                pair.access = access.to_string();
                Ok(())
            }
            None => Err(CoreError::token_store(
                "cannot set access token without a stored refresh token",
            )),
        }
    }

    async fn clear(&self) -> CoreResult<()> {
        *self.pair.write().await = None;
        Ok(())
    }
}

/// On-disk representation, keyed by the two fixed token names
#[derive(Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
}

/// Token store backed by a JSON file under the data directory.
///
/// Each mutation rewrites the whole file, so the pair stays consistent
/// with respect to session transitions.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub const FILE_NAME: &'static str = "credentials.json";

    /// Create a store rooted at `data_dir`, creating the directory if needed
    pub fn new(data_dir: impl AsRef<Path>) -> CoreResult<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join(Self::FILE_NAME),
        })
    }

    fn read_pair(&self) -> CoreResult<Option<TokenPair>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let stored: StoredTokens = serde_json::from_str(&content)?;
        Ok(Some(TokenPair::new(
            stored.access_token,
            stored.refresh_token,
        )))
    }

    fn write_pair(&self, pair: &TokenPair) -> CoreResult<()> {
        let stored = StoredTokens {
            access_token: pair.access.clone(),
            refresh_token: pair.refresh.clone(),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, pair: &TokenPair) -> CoreResult<()> {
        self.write_pair(pair)
    }

    async fn access(&self) -> CoreResult<Option<String>> {
        Ok(self.read_pair()?.map(|p| p.access))
    }

    async fn refresh(&self) -> CoreResult<Option<String>> {
        Ok(self.read_pair()?.map(|p| p.refresh))
    }

    async fn set_access(&self, access: &str) -> CoreResult<()> {
        match self.read_pair()? {
            Some(mut pair) => {
                pair.access = access.to_string();
                self.write_pair(&pair)
            }
            None => Err(CoreError::token_store(
                "cannot set access token without a stored refresh token",
            )),
        }
    }

    async fn clear(&self) -> CoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

// Mock implementation for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub TokenStore {}

        #[async_trait]
        impl TokenStore for TokenStore {
            async fn save(&self, pair: &TokenPair) -> CoreResult<()>;
            async fn access(&self) -> CoreResult<Option<String>>;
            async fn refresh(&self) -> CoreResult<Option<String>>;
            async fn set_access(&self, access: &str) -> CoreResult<()>;
            async fn clear(&self) -> CoreResult<()>;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_store_honors_expectations() {
        let mut store = mock::MockTokenStore::new();
        store
            .expect_access()
            .returning(|| Ok(Some("A1".to_string())));
        store.expect_clear().times(1).returning(|| Ok(()));

        assert_eq!(store.access().await.unwrap().as_deref(), Some("A1"));
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.access().await.unwrap(), None);

        store.save(&TokenPair::new("A1", "R1")).await.unwrap();
        assert_eq!(store.access().await.unwrap().as_deref(), Some("A1"));
        assert_eq!(store.refresh().await.unwrap().as_deref(), Some("R1"));

        store.set_access("A2").await.unwrap();
        assert_eq!(store.access().await.unwrap().as_deref(), Some("A2"));
        assert_eq!(store.refresh().await.unwrap().as_deref(), Some("R1"));

        store.clear().await.unwrap();
        assert_eq!(store.access().await.unwrap(), None);
        assert_eq!(store.refresh().await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_rejects_orphan_access_token() {
        let store = MemoryTokenStore::new();
        let result = store.set_access("A1").await;
        assert!(matches!(result, Err(CoreError::TokenStore { .. })));
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileTokenStore::new(dir.path()).unwrap();
        store.save(&TokenPair::new("A1", "R1")).await.unwrap();

        let reopened = FileTokenStore::new(dir.path()).unwrap();
        assert_eq!(reopened.access().await.unwrap().as_deref(), Some("A1"));
        assert_eq!(reopened.refresh().await.unwrap().as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn file_store_set_access_keeps_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();

        store.save(&TokenPair::new("A1", "R1")).await.unwrap();
        store.set_access("A2").await.unwrap();

        assert_eq!(store.access().await.unwrap().as_deref(), Some("A2"));
        assert_eq!(store.refresh().await.unwrap().as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path()).unwrap();

        store.save(&TokenPair::new("A1", "R1")).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.access().await.unwrap(), None);
        assert!(matches!(
            store.set_access("A2").await,
            Err(CoreError::TokenStore { .. })
        ));
    }
}
