use super::{StateSnapshot, StateStore, StoreError};
use crate::ledger::Ledger;
use crate::record::{PoolId, PoolRecord};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StateSnapshot>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load_pool(&self, id: &PoolId) -> Result<Option<PoolRecord>, StoreError> {
        Ok(self.state.read().await.pools.get(id).cloned())
    }

    async fn list_pools(&self) -> Result<Vec<PoolRecord>, StoreError> {
        Ok(self.state.read().await.pools.values().cloned().collect())
    }

    async fn load_ledger(&self) -> Result<Ledger, StoreError> {
        Ok(self.state.read().await.ledger.clone())
    }

    async fn save_ledger(&self, ledger: &Ledger) -> Result<(), StoreError> {
        self.state.write().await.ledger = ledger.clone();
        Ok(())
    }

    async fn commit(&self, record: &PoolRecord, ledger: &Ledger) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.pools.insert(record.id, record.clone());
        state.ledger = ledger.clone();
        Ok(())
    }
}
