//! Persisted pool state plus the asset bindings the engine does not know about.

use crate::ledger::{AccountId, AssetId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tswap_domain::enums::Side;
use tswap_domain::pool::Pool;
use uuid::Uuid;

/// Unique identifier of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolId(pub Uuid);

impl PoolId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PoolId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PoolId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A pool together with the assets and accounts it is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub id: PoolId,
    /// Asset held in reserve A.
    pub mint_a: AssetId,
    /// Asset held in reserve B.
    pub mint_b: AssetId,
    /// Share unit issued by this pool.
    pub share_asset: AssetId,
    /// Receives owner trading fees and withdraw-fee shares.
    pub operator: AccountId,
    pub pool: Pool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl PoolRecord {
    /// Asset held on `side`.
    #[must_use]
    pub fn mint(&self, side: Side) -> &AssetId {
        match side {
            Side::A => &self.mint_a,
            Side::B => &self.mint_b,
        }
    }

    /// Share asset id derived from the pool id.
    #[must_use]
    pub fn share_asset_for(id: &PoolId) -> AssetId {
        AssetId(format!("{id}:share"))
    }
}
