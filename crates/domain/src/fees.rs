//! Pool fee schedule.
//!
//! Every fee is a `numerator / denominator` pair fixed at pool creation.
//! A zero denominator means the fee is disabled and is never evaluated.

use crate::error::{PoolError, PoolResult};
use crate::math::fixed_point::{add, wide_mul};
use crate::math::mul_div;
use serde::{Deserialize, Serialize};

/// A single fee rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fee {
    pub numerator: u128,
    pub denominator: u128,
}

impl Fee {
    /// Creates a fee of `numerator / denominator`.
    #[must_use]
    pub const fn new(numerator: u128, denominator: u128) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// A disabled fee (0/0).
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Whether this fee ever charges anything.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.numerator != 0 && self.denominator != 0
    }

    fn validate(&self, what: &'static str) -> PoolResult<()> {
        if self.denominator == 0 && self.numerator != 0 {
            return Err(PoolError::InvalidFeeSchedule(what));
        }
        if self.numerator > self.denominator {
            return Err(PoolError::InvalidFeeSchedule(what));
        }
        Ok(())
    }

    /// `floor(amount * numerator / denominator)`, or zero when disabled.
    pub fn apply(&self, amount: u128) -> PoolResult<u128> {
        if !self.is_enabled() {
            return Ok(0);
        }
        mul_div(amount, self.numerator, self.denominator)
    }
}

/// Trading fee split computed on a traded amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradingFee {
    /// Retained in-pool for liquidity providers.
    pub lp_fee: u128,
    /// Routed out of the pool to the operator (and optionally a host).
    pub owner_fee: u128,
}

impl TradingFee {
    /// Sum of both portions.
    pub fn total(&self) -> PoolResult<u128> {
        add(self.lp_fee, self.owner_fee)
    }
}

/// The four fee rates of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub trade_fee: Fee,
    pub owner_trade_fee: Fee,
    pub owner_withdraw_fee: Fee,
    pub host_fee: Fee,
}

impl FeeSchedule {
    /// Builds a validated schedule.
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidFeeSchedule`] if any numerator exceeds its
    /// denominator, if a zero denominator carries a non-zero numerator, or if
    /// the two trading fees together would consume the whole input.
    pub fn new(
        trade_fee: Fee,
        owner_trade_fee: Fee,
        owner_withdraw_fee: Fee,
        host_fee: Fee,
    ) -> PoolResult<Self> {
        let schedule = Self {
            trade_fee,
            owner_trade_fee,
            owner_withdraw_fee,
            host_fee,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// A schedule charging nothing.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            trade_fee: Fee::zero(),
            owner_trade_fee: Fee::zero(),
            owner_withdraw_fee: Fee::zero(),
            host_fee: Fee::zero(),
        }
    }

    /// Re-checks the invariants of [`FeeSchedule::new`]; used after
    /// deserialization.
    pub fn validate(&self) -> PoolResult<()> {
        self.trade_fee.validate("trade fee")?;
        self.owner_trade_fee.validate("owner trade fee")?;
        self.owner_withdraw_fee.validate("owner withdraw fee")?;
        self.host_fee.validate("host fee")?;

        // trade + owner trade must stay below 100%
        if self.trade_fee.is_enabled() && self.owner_trade_fee.is_enabled() {
            let (t, o) = (self.trade_fee, self.owner_trade_fee);
            let whole = wide_mul(t.denominator, o.denominator);
            let combined = wide_mul(t.numerator, o.denominator)
                .checked_add(wide_mul(o.numerator, t.denominator));
            if combined.is_none_or(|c| c >= whole) {
                return Err(PoolError::InvalidFeeSchedule("combined trading fees reach 100%"));
            }
        }
        Ok(())
    }

    /// LP and owner trading fees on `amount`, each computed independently
    /// from the same amount.
    pub fn trading_fee(&self, amount: u128) -> PoolResult<TradingFee> {
        Ok(TradingFee {
            lp_fee: self.trade_fee.apply(amount)?,
            owner_fee: self.owner_trade_fee.apply(amount)?,
        })
    }

    /// Portion of the owner's trading fee redirected to a host.
    pub fn host_fee(&self, owner_fee: u128) -> PoolResult<u128> {
        self.host_fee.apply(owner_fee)
    }

    /// Shares withheld from a withdrawal of `shares`.
    pub fn withdraw_fee(&self, shares: u128) -> PoolResult<u128> {
        self.owner_withdraw_fee.apply(shares)
    }
}

impl Default for FeeSchedule {
    /// Trade 25/10000, owner trade 5/10000, owner withdraw 1/6, host 20/100.
    fn default() -> Self {
        Self {
            trade_fee: Fee::new(25, 10_000),
            owner_trade_fee: Fee::new(5, 10_000),
            owner_withdraw_fee: Fee::new(1, 6),
            host_fee: Fee::new(20, 100),
        }
    }
}
