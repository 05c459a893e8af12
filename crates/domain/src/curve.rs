//! Pricing strategies.
//!
//! [`Curve`] is a tagged variant: the pool never branches on the curve kind
//! itself, it asks the curve for quotes. Deposits and withdrawals of both
//! assets are reserve-proportional regardless of the variant.

use crate::enums::{CurveType, Side};
use crate::error::{PoolError, PoolResult};
use crate::math::{constant_price, constant_product, mul_div};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pricing strategy of a pool, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    /// x * y = k
    #[default]
    ConstantProduct,
    /// Fixed exchange rate of `numerator / denominator` B per A.
    ConstantPrice { numerator: u128, denominator: u128 },
}

impl Curve {
    /// Fixed-rate curve paying `numerator / denominator` B per A.
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidCurve`] if either side of the rate is zero.
    pub fn constant_price(numerator: u128, denominator: u128) -> PoolResult<Self> {
        let curve = Curve::ConstantPrice {
            numerator,
            denominator,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Checks the curve parameters.
    pub fn validate(&self) -> PoolResult<()> {
        match *self {
            Curve::ConstantProduct => Ok(()),
            Curve::ConstantPrice {
                numerator,
                denominator,
            } => {
                if numerator == 0 || denominator == 0 {
                    return Err(PoolError::InvalidCurve("constant price rate must be non-zero"));
                }
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn curve_type(&self) -> CurveType {
        match self {
            Curve::ConstantProduct => CurveType::ConstantProduct,
            Curve::ConstantPrice { .. } => CurveType::ConstantPrice,
        }
    }

    /// Amount of the opposite asset paid out for `amount_in_after_fee` of
    /// `source`.
    ///
    /// # Errors
    /// Returns [`PoolError::InsufficientLiquidity`] if the output would reach
    /// or exceed `reserve_out`.
    pub fn quote_swap(
        &self,
        source: Side,
        reserve_in: u128,
        reserve_out: u128,
        amount_in_after_fee: u128,
    ) -> PoolResult<u128> {
        let amount_out = match *self {
            Curve::ConstantProduct => {
                constant_product::calculate_out_amount(amount_in_after_fee, reserve_in, reserve_out)?
            }
            Curve::ConstantPrice {
                numerator,
                denominator,
            } => match constant_price::calculate_out_amount(
                amount_in_after_fee,
                source,
                numerator,
                denominator,
            ) {
                // An output wider than 128 bits exceeds any reserve.
                Err(PoolError::ArithmeticOverflow(_)) => {
                    return Err(PoolError::InsufficientLiquidity);
                }
                other => other?,
            },
        };
        if amount_out >= reserve_out {
            return Err(PoolError::InsufficientLiquidity);
        }
        Ok(amount_out)
    }

    /// Amounts of A and B backing `shares` pool shares; used for deposits.
    pub fn quote_deposit(
        &self,
        reserve_a: u128,
        reserve_b: u128,
        supply: u128,
        shares: u128,
    ) -> PoolResult<(u128, u128)> {
        proportional(reserve_a, reserve_b, supply, shares)
    }

    /// Amounts of A and B redeemed by `shares` pool shares.
    pub fn quote_withdraw(
        &self,
        reserve_a: u128,
        reserve_b: u128,
        supply: u128,
        shares: u128,
    ) -> PoolResult<(u128, u128)> {
        proportional(reserve_a, reserve_b, supply, shares)
    }

    /// Shares minted for depositing `amount_after_fee` of `side` alone.
    pub fn shares_for_single_deposit(
        &self,
        side: Side,
        amount_after_fee: u128,
        reserves: (u128, u128),
        supply: u128,
    ) -> PoolResult<u128> {
        match *self {
            Curve::ConstantProduct => {
                let reserve = side_of(reserves, side);
                constant_product::shares_for_deposit(amount_after_fee, reserve, supply)
            }
            Curve::ConstantPrice {
                numerator,
                denominator,
            } => constant_price::shares_for_deposit(
                amount_after_fee,
                side,
                reserves,
                supply,
                (numerator, denominator),
            ),
        }
    }

    /// Shares burned for withdrawing `amount` of `side` alone.
    pub fn shares_for_single_withdraw(
        &self,
        side: Side,
        amount: u128,
        reserves: (u128, u128),
        supply: u128,
    ) -> PoolResult<u128> {
        match *self {
            Curve::ConstantProduct => {
                let reserve = side_of(reserves, side);
                constant_product::shares_for_withdraw(amount, reserve, supply)
            }
            Curve::ConstantPrice {
                numerator,
                denominator,
            } => constant_price::shares_for_withdraw(
                amount,
                side,
                reserves,
                supply,
                (numerator, denominator),
            ),
        }
    }

    /// Marginal price of one unit of `source` in the opposite asset.
    pub fn spot_price(&self, source: Side, reserves: (u128, u128)) -> PoolResult<Decimal> {
        match *self {
            Curve::ConstantProduct => constant_product::calculate_spot_price(
                side_of(reserves, source),
                side_of(reserves, source.opposite()),
            ),
            Curve::ConstantPrice {
                numerator,
                denominator,
            } => constant_price::calculate_spot_price(source, numerator, denominator),
        }
    }
}

fn side_of(reserves: (u128, u128), side: Side) -> u128 {
    match side {
        Side::A => reserves.0,
        Side::B => reserves.1,
    }
}

fn proportional(
    reserve_a: u128,
    reserve_b: u128,
    supply: u128,
    shares: u128,
) -> PoolResult<(u128, u128)> {
    if supply == 0 {
        return Err(PoolError::PoolNotInitialized);
    }
    if shares == 0 {
        return Ok((0, 0));
    }
    Ok((
        mul_div(reserve_a, shares, supply)?,
        mul_div(reserve_b, shares, supply)?,
    ))
}
