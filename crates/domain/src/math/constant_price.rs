//! Fixed-rate pricing for pegged pools.
//!
//! The rate is expressed as `numerator / denominator` units of asset B per
//! unit of asset A. Pool value is measured in asset-B units.

use crate::enums::Side;
use crate::error::{PoolError, PoolResult};
use crate::math::constant_product::to_decimal;
use crate::math::fixed_point::{self, mul_div, mul_div_ceil};
use rust_decimal::Decimal;

/// Output of trading `amount_in` of `source` at the fixed rate, floored.
pub fn calculate_out_amount(
    amount_in: u128,
    source: Side,
    numerator: u128,
    denominator: u128,
) -> PoolResult<u128> {
    match source {
        Side::A => mul_div(amount_in, numerator, denominator),
        Side::B => mul_div(amount_in, denominator, numerator),
    }
}

/// Value of `amount` of `side` in asset-B units, floored.
pub fn value_in_b(amount: u128, side: Side, numerator: u128, denominator: u128) -> PoolResult<u128> {
    match side {
        Side::A => mul_div(amount, numerator, denominator),
        Side::B => Ok(amount),
    }
}

/// Value of `amount` of `side` in asset-B units, rounded up.
fn value_in_b_ceil(amount: u128, side: Side, numerator: u128, denominator: u128) -> PoolResult<u128> {
    match side {
        Side::A => mul_div_ceil(amount, numerator, denominator),
        Side::B => Ok(amount),
    }
}

/// Total pool value in asset-B units.
pub fn pool_value(
    reserve_a: u128,
    reserve_b: u128,
    numerator: u128,
    denominator: u128,
) -> PoolResult<u128> {
    fixed_point::add(value_in_b(reserve_a, Side::A, numerator, denominator)?, reserve_b)
}

/// Shares minted for a single-sided deposit: the deposited value's fraction
/// of the pool value, floored.
pub fn shares_for_deposit(
    amount_in: u128,
    side: Side,
    reserves: (u128, u128),
    supply: u128,
    rate: (u128, u128),
) -> PoolResult<u128> {
    let value = value_in_b(amount_in, side, rate.0, rate.1)?;
    let total = pool_value(reserves.0, reserves.1, rate.0, rate.1)?;
    mul_div(supply, value, total)
}

/// Shares burned for a single-sided withdrawal, rounded up.
pub fn shares_for_withdraw(
    amount_out: u128,
    side: Side,
    reserves: (u128, u128),
    supply: u128,
    rate: (u128, u128),
) -> PoolResult<u128> {
    let reserve = match side {
        Side::A => reserves.0,
        Side::B => reserves.1,
    };
    if amount_out >= reserve {
        return Err(PoolError::InsufficientLiquidity);
    }
    let value = value_in_b_ceil(amount_out, side, rate.0, rate.1)?;
    let total = pool_value(reserves.0, reserves.1, rate.0, rate.1)?;
    mul_div_ceil(supply, value, total)
}

/// Price of one unit of `source` in units of the opposite asset.
pub fn calculate_spot_price(source: Side, numerator: u128, denominator: u128) -> PoolResult<Decimal> {
    let (num, den) = match source {
        Side::A => (numerator, denominator),
        Side::B => (denominator, numerator),
    };
    if den == 0 {
        return Err(PoolError::DivisionByZero);
    }
    to_decimal(num)?
        .checked_div(to_decimal(den)?)
        .ok_or(PoolError::ArithmeticOverflow("spot price out of decimal range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_out_amount_both_directions() {
        // 1 A = 2 B
        assert_eq!(calculate_out_amount(100, Side::A, 2, 1).unwrap(), 200);
        assert_eq!(calculate_out_amount(101, Side::B, 2, 1).unwrap(), 50);
    }

    #[test]
    fn test_pool_value() {
        assert_eq!(pool_value(1_000, 500, 2, 1).unwrap(), 2_500);
    }

    #[test]
    fn test_single_side_shares() {
        // pool worth 2_000 B, depositing 100 A = 200 B -> 10% of supply
        let minted = shares_for_deposit(100, Side::A, (500, 1_000), 1_000, (2, 1)).unwrap();
        assert_eq!(minted, 100);

        // withdrawing 3 B from a 2_000 B pool with supply 1_000 -> 1.5 rounded up
        let burned = shares_for_withdraw(3, Side::B, (500, 1_000), 1_000, (2, 1)).unwrap();
        assert_eq!(burned, 2);
    }

    #[test]
    fn test_withdraw_rejects_draining_side() {
        assert_eq!(
            shares_for_withdraw(500, Side::A, (500, 1_000), 1_000, (2, 1)),
            Err(PoolError::InsufficientLiquidity)
        );
    }

    #[test]
    fn test_spot_price() {
        assert_eq!(calculate_spot_price(Side::A, 3, 2).unwrap(), dec!(1.5));
        assert_eq!(calculate_spot_price(Side::B, 1, 4).unwrap(), dec!(4));
    }
}
