//! The pool aggregate and its lifecycle operations.
//!
//! Every mutating operation is compute-then-commit: the matching `quote_*`
//! method runs against `&self`, and only a successful quote is applied.
//! A failed call therefore never leaves the pool partially updated.

use crate::config::PoolConfig;
use crate::curve::Curve;
use crate::enums::{PoolStatus, Side};
use crate::error::{PoolError, PoolResult};
use crate::fees::FeeSchedule;
use crate::math::constant_product::calculate_k;
use crate::math::fixed_point::{add, sub};
use crate::value_objects::{
    DepositQuote, SingleDepositQuote, SingleWithdrawQuote, SwapQuote, WithdrawQuote,
};
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Two reserves, a share supply, and the immutable fee schedule and curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    status: PoolStatus,
    reserve_a: u128,
    reserve_b: u128,
    share_supply: u128,
    accumulated_owner_fee_shares: u128,
    fee_schedule: FeeSchedule,
    curve: Curve,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// An uninitialized pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: PoolStatus::Uninitialized,
            reserve_a: 0,
            reserve_b: 0,
            share_supply: 0,
            accumulated_owner_fee_shares: 0,
            fee_schedule: FeeSchedule::free(),
            curve: Curve::ConstantProduct,
        }
    }

    /// Creates and initializes a pool in one step.
    ///
    /// Returns the pool and the bootstrap shares minted to the initializer.
    pub fn from_config(
        config: &PoolConfig,
        reserve_a: u128,
        reserve_b: u128,
    ) -> PoolResult<(Self, u128)> {
        let mut pool = Self::new();
        let shares = pool.initialize(
            reserve_a,
            reserve_b,
            config.fee_schedule,
            config.curve,
            config.bootstrap_shares,
        )?;
        Ok((pool, shares))
    }

    /// Moves the pool from `Uninitialized` to `Active`, seeding both reserves
    /// and minting `bootstrap_shares` to the initial provider.
    ///
    /// # Errors
    /// - [`PoolError::AlreadyInitialized`] if the pool is active.
    /// - [`PoolError::ZeroReserve`] if either reserve is zero.
    /// - Configuration errors from the fee schedule, curve or bootstrap amount.
    pub fn initialize(
        &mut self,
        reserve_a: u128,
        reserve_b: u128,
        fee_schedule: FeeSchedule,
        curve: Curve,
        bootstrap_shares: u128,
    ) -> PoolResult<u128> {
        if self.status == PoolStatus::Active {
            return Err(PoolError::AlreadyInitialized);
        }
        if reserve_a == 0 || reserve_b == 0 {
            return Err(PoolError::ZeroReserve);
        }
        PoolConfig {
            fee_schedule,
            curve,
            bootstrap_shares,
        }
        .validate()?;

        *self = Self {
            status: PoolStatus::Active,
            reserve_a,
            reserve_b,
            share_supply: bootstrap_shares,
            accumulated_owner_fee_shares: 0,
            fee_schedule,
            curve,
        };
        Ok(bootstrap_shares)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn status(&self) -> PoolStatus {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PoolStatus::Active
    }

    #[must_use]
    pub fn reserve_a(&self) -> u128 {
        self.reserve_a
    }

    #[must_use]
    pub fn reserve_b(&self) -> u128 {
        self.reserve_b
    }

    #[must_use]
    pub fn reserve(&self, side: Side) -> u128 {
        match side {
            Side::A => self.reserve_a,
            Side::B => self.reserve_b,
        }
    }

    #[must_use]
    pub fn share_supply(&self) -> u128 {
        self.share_supply
    }

    /// Withdraw-fee shares credited to the operator so far.
    #[must_use]
    pub fn accumulated_owner_fee_shares(&self) -> u128 {
        self.accumulated_owner_fee_shares
    }

    #[must_use]
    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fee_schedule
    }

    #[must_use]
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// `reserve_a * reserve_b` at full width.
    #[must_use]
    pub fn invariant(&self) -> U256 {
        calculate_k(self.reserve_a, self.reserve_b)
    }

    /// Marginal price of one unit of `source` in the opposite asset.
    pub fn spot_price(&self, source: Side) -> PoolResult<Decimal> {
        self.ensure_active()?;
        self.curve
            .spot_price(source, (self.reserve_a, self.reserve_b))
    }

    fn ensure_active(&self) -> PoolResult<()> {
        if self.status != PoolStatus::Active {
            return Err(PoolError::PoolNotInitialized);
        }
        Ok(())
    }

    fn reserve_mut(&mut self, side: Side) -> &mut u128 {
        match side {
            Side::A => &mut self.reserve_a,
            Side::B => &mut self.reserve_b,
        }
    }

    // ------------------------------------------------------------------
    // Deposit
    // ------------------------------------------------------------------

    /// Amounts required to mint `shares`, checked against the caller's maxima.
    ///
    /// Amounts are floored, so a small enough `shares` request quotes zero of
    /// both assets. Callers that must not mint shares for nothing should
    /// reject quotes with `amount_a == 0 && amount_b == 0`.
    ///
    /// # Errors
    /// - [`PoolError::PoolNotInitialized`] before initialization.
    /// - [`PoolError::SlippageExceeded`] if either amount is above its maximum.
    pub fn quote_deposit(
        &self,
        shares: u128,
        max_amount_a: u128,
        max_amount_b: u128,
    ) -> PoolResult<DepositQuote> {
        self.ensure_active()?;
        let (amount_a, amount_b) =
            self.curve
                .quote_deposit(self.reserve_a, self.reserve_b, self.share_supply, shares)?;
        if amount_a > max_amount_a {
            return Err(PoolError::SlippageExceeded {
                computed: amount_a,
                bound: max_amount_a,
            });
        }
        if amount_b > max_amount_b {
            return Err(PoolError::SlippageExceeded {
                computed: amount_b,
                bound: max_amount_b,
            });
        }
        // Surface overflow at quote time so the commit cannot fail halfway.
        add(self.reserve_a, amount_a)?;
        add(self.reserve_b, amount_b)?;
        add(self.share_supply, shares)?;
        Ok(DepositQuote {
            shares,
            amount_a,
            amount_b,
        })
    }

    /// Deposits both assets proportionally and mints `shares`.
    ///
    /// See [`Pool::quote_deposit`] for the rounding of dust requests.
    pub fn deposit(
        &mut self,
        shares: u128,
        max_amount_a: u128,
        max_amount_b: u128,
    ) -> PoolResult<DepositQuote> {
        let quote = self.quote_deposit(shares, max_amount_a, max_amount_b)?;
        self.reserve_a += quote.amount_a;
        self.reserve_b += quote.amount_b;
        self.share_supply += quote.shares;
        Ok(quote)
    }

    // ------------------------------------------------------------------
    // Withdraw
    // ------------------------------------------------------------------

    /// Amounts returned for surrendering `shares`, net of the withdraw fee.
    ///
    /// # Errors
    /// - [`PoolError::PoolNotInitialized`] before initialization.
    /// - [`PoolError::InsufficientLiquidity`] if `shares` exceeds the supply or
    ///   the withdrawal would empty a reserve or the supply.
    /// - [`PoolError::SlippageExceeded`] if either amount is below its minimum.
    pub fn quote_withdraw(
        &self,
        shares: u128,
        min_amount_a: u128,
        min_amount_b: u128,
    ) -> PoolResult<WithdrawQuote> {
        self.ensure_active()?;
        if shares == 0 {
            return Ok(WithdrawQuote::default());
        }
        if shares > self.share_supply {
            return Err(PoolError::InsufficientLiquidity);
        }
        let fee_shares = self.fee_schedule.withdraw_fee(shares)?;
        let effective = sub(shares, fee_shares)?;
        if effective >= self.share_supply {
            return Err(PoolError::InsufficientLiquidity);
        }
        let (amount_a, amount_b) = self.curve.quote_withdraw(
            self.reserve_a,
            self.reserve_b,
            self.share_supply,
            effective,
        )?;
        if amount_a >= self.reserve_a || amount_b >= self.reserve_b {
            return Err(PoolError::InsufficientLiquidity);
        }
        if amount_a < min_amount_a {
            return Err(PoolError::SlippageExceeded {
                computed: amount_a,
                bound: min_amount_a,
            });
        }
        if amount_b < min_amount_b {
            return Err(PoolError::SlippageExceeded {
                computed: amount_b,
                bound: min_amount_b,
            });
        }
        add(self.accumulated_owner_fee_shares, fee_shares)?;
        Ok(WithdrawQuote {
            shares,
            fee_shares,
            amount_a,
            amount_b,
        })
    }

    /// Redeems `shares` for both assets.
    ///
    /// The withdraw fee portion is transferred to the operator rather than
    /// burned, so only [`WithdrawQuote::burned_shares`] leave the supply.
    pub fn withdraw(
        &mut self,
        shares: u128,
        min_amount_a: u128,
        min_amount_b: u128,
    ) -> PoolResult<WithdrawQuote> {
        let quote = self.quote_withdraw(shares, min_amount_a, min_amount_b)?;
        self.reserve_a -= quote.amount_a;
        self.reserve_b -= quote.amount_b;
        self.share_supply -= quote.burned_shares();
        self.accumulated_owner_fee_shares += quote.fee_shares;
        Ok(quote)
    }

    // ------------------------------------------------------------------
    // Swap
    // ------------------------------------------------------------------

    /// Output of trading `amount_in` of `source`.
    ///
    /// # Errors
    /// - [`PoolError::PoolNotInitialized`] before initialization.
    /// - [`PoolError::InsufficientLiquidity`] if the output would reach the
    ///   opposite reserve; checked before slippage.
    /// - [`PoolError::SlippageExceeded`] if the output is below
    ///   `minimum_amount_out`.
    pub fn quote_swap(
        &self,
        amount_in: u128,
        minimum_amount_out: u128,
        source: Side,
        host_fee_requested: bool,
    ) -> PoolResult<SwapQuote> {
        self.ensure_active()?;
        let reserve_in = self.reserve(source);
        let reserve_out = self.reserve(source.opposite());

        let fees = self.fee_schedule.trading_fee(amount_in)?;
        let amount_in_after_fee = sub(amount_in, fees.total()?)?;
        let amount_out =
            self.curve
                .quote_swap(source, reserve_in, reserve_out, amount_in_after_fee)?;
        if amount_out < minimum_amount_out {
            return Err(PoolError::SlippageExceeded {
                computed: amount_out,
                bound: minimum_amount_out,
            });
        }

        let host_fee = if host_fee_requested {
            self.fee_schedule.host_fee(fees.owner_fee)?
        } else {
            0
        };
        let owner_fee = sub(fees.owner_fee, host_fee)?;
        let quote = SwapQuote {
            source,
            amount_in,
            amount_in_after_fee,
            amount_out,
            trade_fee: fees.lp_fee,
            owner_fee,
            host_fee,
        };
        add(reserve_in, quote.reserve_in_delta())?;
        Ok(quote)
    }

    /// Trades `amount_in` of `source` for the opposite asset.
    ///
    /// The LP fee stays in the source reserve; the owner fee (and host
    /// portion, when requested) is routed out of it.
    pub fn swap(
        &mut self,
        amount_in: u128,
        minimum_amount_out: u128,
        source: Side,
        host_fee_requested: bool,
    ) -> PoolResult<SwapQuote> {
        let quote = self.quote_swap(amount_in, minimum_amount_out, source, host_fee_requested)?;
        *self.reserve_mut(source) += quote.reserve_in_delta();
        *self.reserve_mut(source.opposite()) -= quote.amount_out;
        Ok(quote)
    }

    // ------------------------------------------------------------------
    // Single-sided liquidity
    // ------------------------------------------------------------------

    /// Shares minted for depositing exactly `amount_in` of `side`.
    ///
    /// Trading fees apply to half the deposit, the half that is implicitly
    /// swapped into the other asset.
    pub fn quote_deposit_single_exact_in(
        &self,
        side: Side,
        amount_in: u128,
        minimum_shares: u128,
    ) -> PoolResult<SingleDepositQuote> {
        self.ensure_active()?;
        let fees = self.fee_schedule.trading_fee(amount_in / 2)?;
        let amount_after_fee = sub(amount_in, fees.total()?)?;
        let shares = self.curve.shares_for_single_deposit(
            side,
            amount_after_fee,
            (self.reserve_a, self.reserve_b),
            self.share_supply,
        )?;
        if shares < minimum_shares {
            return Err(PoolError::SlippageExceeded {
                computed: shares,
                bound: minimum_shares,
            });
        }
        let quote = SingleDepositQuote {
            side,
            amount_in,
            shares,
            trade_fee: fees.lp_fee,
            owner_fee: fees.owner_fee,
        };
        add(self.reserve(side), quote.reserve_delta())?;
        add(self.share_supply, shares)?;
        Ok(quote)
    }

    /// Deposits exactly `amount_in` of one asset.
    pub fn deposit_single_exact_in(
        &mut self,
        side: Side,
        amount_in: u128,
        minimum_shares: u128,
    ) -> PoolResult<SingleDepositQuote> {
        let quote = self.quote_deposit_single_exact_in(side, amount_in, minimum_shares)?;
        *self.reserve_mut(side) += quote.reserve_delta();
        self.share_supply += quote.shares;
        Ok(quote)
    }

    /// Shares surrendered for withdrawing exactly `amount_out` of `side`.
    ///
    /// Trading fees apply to half the withdrawal and are charged in extra
    /// shares; the withdraw fee is added on top of the burned amount.
    pub fn quote_withdraw_single_exact_out(
        &self,
        side: Side,
        amount_out: u128,
        maximum_shares: u128,
    ) -> PoolResult<SingleWithdrawQuote> {
        self.ensure_active()?;
        let fees = self.fee_schedule.trading_fee(amount_out / 2)?;
        let gross = add(amount_out, fees.total()?)?;
        let burned = self.curve.shares_for_single_withdraw(
            side,
            gross,
            (self.reserve_a, self.reserve_b),
            self.share_supply,
        )?;
        if burned >= self.share_supply {
            return Err(PoolError::InsufficientLiquidity);
        }
        let fee_shares = self.fee_schedule.withdraw_fee(burned)?;
        let shares = add(burned, fee_shares)?;
        if shares > maximum_shares {
            return Err(PoolError::SlippageExceeded {
                computed: shares,
                bound: maximum_shares,
            });
        }
        add(self.accumulated_owner_fee_shares, fee_shares)?;
        Ok(SingleWithdrawQuote {
            side,
            amount_out,
            shares,
            fee_shares,
            trade_fee: fees.lp_fee,
            owner_fee: fees.owner_fee,
        })
    }

    /// Withdraws exactly `amount_out` of one asset.
    pub fn withdraw_single_exact_out(
        &mut self,
        side: Side,
        amount_out: u128,
        maximum_shares: u128,
    ) -> PoolResult<SingleWithdrawQuote> {
        let quote = self.quote_withdraw_single_exact_out(side, amount_out, maximum_shares)?;
        *self.reserve_mut(side) -= quote.reserve_delta();
        self.share_supply -= quote.burned_shares();
        self.accumulated_owner_fee_shares += quote.fee_shares;
        Ok(quote)
    }
}
