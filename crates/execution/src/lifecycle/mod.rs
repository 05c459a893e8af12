//! Pool lifecycle tracking.
//!
//! Every committed operation is appended to an [`EventLog`]; rejected
//! operations leave no event.

mod events;

pub use events::*;

use crate::record::PoolId;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Append-only log of committed pool events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<RwLock<Vec<PoolEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub async fn record(&self, event: PoolEvent) {
        self.events.write().await.push(event);
    }

    /// All events, oldest first.
    pub async fn all(&self) -> Vec<PoolEvent> {
        self.events.read().await.clone()
    }

    /// Events of one pool, oldest first.
    pub async fn for_pool(&self, pool: PoolId) -> Vec<PoolEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.pool == pool)
            .cloned()
            .collect()
    }
}
