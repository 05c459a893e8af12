//! Quotes returned by pool operations.
//!
//! A quote is what the pool computed (and, for mutating calls, committed).
//! The orchestrator turns it into ledger transfers.

use crate::enums::Side;
use serde::{Deserialize, Serialize};

/// Result of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    /// Asset the trader pays in.
    pub source: Side,
    /// Full amount taken from the trader.
    pub amount_in: u128,
    /// Input that reached the curve after both trading fees.
    pub amount_in_after_fee: u128,
    /// Amount of the opposite asset paid to the trader.
    pub amount_out: u128,
    /// Liquidity-provider fee, retained in the pool.
    pub trade_fee: u128,
    /// Owner fee kept by the operator (net of the host portion).
    pub owner_fee: u128,
    /// Owner fee redirected to the host, zero when no host was designated.
    pub host_fee: u128,
}

impl SwapQuote {
    /// Amount added to the source reserve: everything except the fees routed
    /// out to the operator and the host.
    #[must_use]
    pub fn reserve_in_delta(&self) -> u128 {
        self.amount_in - self.owner_fee - self.host_fee
    }
}

/// Result of a two-sided deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepositQuote {
    /// Shares minted to the depositor.
    pub shares: u128,
    pub amount_a: u128,
    pub amount_b: u128,
}

/// Result of a two-sided withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WithdrawQuote {
    /// Shares surrendered by the withdrawer, fee included.
    pub shares: u128,
    /// Part of `shares` transferred to the operator instead of being burned.
    pub fee_shares: u128,
    pub amount_a: u128,
    pub amount_b: u128,
}

impl WithdrawQuote {
    /// Shares removed from the supply.
    #[must_use]
    pub fn burned_shares(&self) -> u128 {
        self.shares - self.fee_shares
    }
}

/// Result of depositing a single asset for an exact input amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleDepositQuote {
    pub side: Side,
    pub amount_in: u128,
    /// Shares minted to the depositor.
    pub shares: u128,
    /// Liquidity-provider fee, retained in the pool.
    pub trade_fee: u128,
    /// Owner fee routed to the operator.
    pub owner_fee: u128,
}

impl SingleDepositQuote {
    #[must_use]
    pub fn reserve_delta(&self) -> u128 {
        self.amount_in - self.owner_fee
    }
}

/// Result of withdrawing a single asset for an exact output amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleWithdrawQuote {
    pub side: Side,
    pub amount_out: u128,
    /// Shares surrendered by the withdrawer, fee included.
    pub shares: u128,
    /// Part of `shares` transferred to the operator instead of being burned.
    pub fee_shares: u128,
    /// Liquidity-provider fee, left in the pool.
    pub trade_fee: u128,
    /// Owner fee routed to the operator.
    pub owner_fee: u128,
}

impl SingleWithdrawQuote {
    #[must_use]
    pub fn burned_shares(&self) -> u128 {
        self.shares - self.fee_shares
    }

    /// Amount leaving the reserve: the payout plus the owner fee.
    #[must_use]
    pub fn reserve_delta(&self) -> u128 {
        self.amount_out + self.owner_fee
    }
}
