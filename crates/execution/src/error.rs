//! Errors raised while executing pool operations against the ledger.

use crate::ledger::{AccountId, AssetId};
use crate::store::StoreError;
use crate::PoolId;
use thiserror::Error;
use tswap_domain::PoolError;

/// Failure of an orchestrated operation. Nothing is committed when one is returned.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The engine rejected the operation.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// No pool is registered under this id.
    #[error("pool {0} not found")]
    PoolNotFound(PoolId),

    /// An account cannot cover a debit.
    #[error("account {account} holds {available} of {asset}, needs {needed}")]
    InsufficientFunds {
        account: AccountId,
        asset: AssetId,
        needed: u128,
        available: u128,
    },

    /// A credit would overflow an account balance.
    #[error("balance overflow for account {account} on {asset}")]
    BalanceOverflow { account: AccountId, asset: AssetId },

    /// The state store failed.
    #[error("state store error: {0}")]
    Store(#[from] StoreError),
}
