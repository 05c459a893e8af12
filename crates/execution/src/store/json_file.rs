use super::{StateSnapshot, StateStore, StoreError};
use crate::ledger::Ledger;
use crate::record::{PoolId, PoolRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Store keeping the whole [`StateSnapshot`] in one JSON file.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash never leaves a half-written state file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    io: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (lazily) the state file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<StateSnapshot, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StateSnapshot::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, snapshot: &StateSnapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), pools = snapshot.pools.len(), "State file written");
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load_pool(&self, id: &PoolId) -> Result<Option<PoolRecord>, StoreError> {
        let _guard = self.io.lock().await;
        Ok(self.read().await?.pools.remove(id))
    }

    async fn list_pools(&self) -> Result<Vec<PoolRecord>, StoreError> {
        let _guard = self.io.lock().await;
        Ok(self.read().await?.pools.into_values().collect())
    }

    async fn load_ledger(&self) -> Result<Ledger, StoreError> {
        let _guard = self.io.lock().await;
        Ok(self.read().await?.ledger)
    }

    async fn save_ledger(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let _guard = self.io.lock().await;
        let mut snapshot = self.read().await?;
        snapshot.ledger = ledger.clone();
        self.write(&snapshot).await
    }

    async fn commit(&self, record: &PoolRecord, ledger: &Ledger) -> Result<(), StoreError> {
        let _guard = self.io.lock().await;
        let mut snapshot = self.read().await?;
        snapshot.pools.insert(record.id, record.clone());
        snapshot.ledger = ledger.clone();
        self.write(&snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountId, AssetId};
    use tswap_domain::config::PoolConfig;
    use tswap_domain::pool::Pool;

    fn record() -> PoolRecord {
        let (pool, _) = Pool::from_config(&PoolConfig::default(), 1_000, 2_000).unwrap();
        let id = PoolId::new();
        PoolRecord {
            id,
            mint_a: AssetId::new("A"),
            mint_b: AssetId::new("B"),
            share_asset: PoolRecord::share_asset_for(&id),
            operator: AccountId::new("operator"),
            pool,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        assert!(store.list_pools().await.unwrap().is_empty());
        assert_eq!(store.load_ledger().await.unwrap(), Ledger::new());
    }

    #[tokio::test]
    async fn test_commit_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let record = record();
        let mut ledger = Ledger::new();
        ledger
            .mint(&AccountId::new("alice"), &AssetId::new("A"), 7)
            .unwrap();

        JsonFileStore::new(&path).commit(&record, &ledger).await.unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_pool(&record.id).await.unwrap(), Some(record));
        assert_eq!(reopened.load_ledger().await.unwrap(), ledger);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"not json").await.unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.list_pools().await,
            Err(StoreError::Serde(_))
        ));
    }
}
