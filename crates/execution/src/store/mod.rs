//! Persistence of pool records and ledger balances.
//!
//! The orchestrator only talks to [`StateStore`]; [`MemoryStore`] backs tests
//! and single-process runs, [`JsonFileStore`] keeps state between CLI calls.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::ledger::Ledger;
use crate::record::{PoolId, PoolRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure of a [`StateStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Everything a store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub pools: BTreeMap<PoolId, PoolRecord>,
    pub ledger: Ledger,
}

/// Storage backend for pool state and balances.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads a pool record, `None` if unknown.
    async fn load_pool(&self, id: &PoolId) -> Result<Option<PoolRecord>, StoreError>;

    /// Lists every pool record.
    async fn list_pools(&self) -> Result<Vec<PoolRecord>, StoreError>;

    /// Loads the ledger; an empty ledger if none was saved.
    async fn load_ledger(&self) -> Result<Ledger, StoreError>;

    /// Persists the ledger alone.
    async fn save_ledger(&self, ledger: &Ledger) -> Result<(), StoreError>;

    /// Persists a pool record and the ledger as one unit.
    async fn commit(&self, record: &PoolRecord, ledger: &Ledger) -> Result<(), StoreError>;
}
