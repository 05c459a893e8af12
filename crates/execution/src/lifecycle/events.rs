//! Lifecycle events for pool tracking.

use crate::ledger::AccountId;
use crate::record::PoolId;
use serde::{Deserialize, Serialize};
use tswap_domain::value_objects::{
    DepositQuote, SingleDepositQuote, SingleWithdrawQuote, SwapQuote, WithdrawQuote,
};

/// Type of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEventType {
    /// Pool was initialized.
    PoolCreated,
    /// Liquidity was added in both assets.
    Deposited,
    /// Liquidity was removed in both assets.
    Withdrawn,
    /// A swap was executed.
    Swapped,
    /// Liquidity was added in one asset.
    SingleDeposited,
    /// Liquidity was removed in one asset.
    SingleWithdrawn,
}

/// A committed operation on a pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolEvent {
    /// Event ID.
    pub id: String,
    /// Event type.
    pub event_type: PoolEventType,
    /// Pool the operation ran against.
    pub pool: PoolId,
    /// Account that invoked the operation.
    pub account: AccountId,
    /// Timestamp.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Event-specific data.
    pub data: EventData,
}

impl PoolEvent {
    /// Creates a new lifecycle event.
    pub fn new(pool: PoolId, account: AccountId, data: EventData) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type: data.event_type(),
            pool,
            account,
            timestamp: chrono::Utc::now(),
            data,
        }
    }
}

/// Event-specific data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventData {
    /// Pool created data.
    PoolCreated(PoolCreatedData),
    Deposited(DepositQuote),
    Withdrawn(WithdrawQuote),
    Swapped(SwapQuote),
    SingleDeposited(SingleDepositQuote),
    SingleWithdrawn(SingleWithdrawQuote),
}

impl EventData {
    #[must_use]
    pub fn event_type(&self) -> PoolEventType {
        match self {
            EventData::PoolCreated(_) => PoolEventType::PoolCreated,
            EventData::Deposited(_) => PoolEventType::Deposited,
            EventData::Withdrawn(_) => PoolEventType::Withdrawn,
            EventData::Swapped(_) => PoolEventType::Swapped,
            EventData::SingleDeposited(_) => PoolEventType::SingleDeposited,
            EventData::SingleWithdrawn(_) => PoolEventType::SingleWithdrawn,
        }
    }
}

/// Data for pool created event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolCreatedData {
    /// Initial reserve of asset A.
    pub reserve_a: u128,
    /// Initial reserve of asset B.
    pub reserve_b: u128,
    /// Shares minted to the creator.
    pub bootstrap_shares: u128,
    /// Account receiving owner fees.
    pub operator: AccountId,
}
