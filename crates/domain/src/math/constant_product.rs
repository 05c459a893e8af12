use crate::error::{PoolError, PoolResult};
use crate::math::fixed_point::{self, sqrt_floor, to_u128, wide_mul};
use primitive_types::U256;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Calculates the output amount for a given (post-fee) input amount in a
/// constant product pool (x * y = k).
///
/// formula: dy = y * dx / (x + dx), floored, so dy < y always holds.
pub fn calculate_out_amount(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
) -> PoolResult<u128> {
    if amount_in == 0 {
        return Ok(0);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(PoolError::InsufficientLiquidity);
    }
    let denominator = U256::from(reserve_in) + U256::from(amount_in);
    to_u128(wide_mul(reserve_out, amount_in) / denominator)
}

/// Pool shares minted for a single-sided deposit of `amount_in` (post-fee)
/// into the side holding `reserve`.
///
/// shares = supply * (sqrt(1 + dx / x) - 1), evaluated as
/// supply * (sqrt(x * (x + dx)) - x) / x with the root floored.
pub fn shares_for_deposit(amount_in: u128, reserve: u128, supply: u128) -> PoolResult<u128> {
    if reserve == 0 {
        return Err(PoolError::DivisionByZero);
    }
    // The grown reserve must itself fit in 128 bits, which also keeps
    // `reserve * grown` inside 256 bits.
    let grown = fixed_point::add(reserve, amount_in)?;
    let root = sqrt_floor(wide_mul(reserve, grown));
    let delta = to_u128(root - U256::from(reserve))?;
    fixed_point::mul_div(supply, delta, reserve)
}

/// Pool shares burned for a single-sided withdrawal of `amount_out` from the
/// side holding `reserve`.
///
/// shares = supply * (1 - sqrt(1 - dx / x)), evaluated as
/// supply * (x - sqrt(x * (x - dx))) / x, rounded up.
pub fn shares_for_withdraw(amount_out: u128, reserve: u128, supply: u128) -> PoolResult<u128> {
    if amount_out >= reserve {
        return Err(PoolError::InsufficientLiquidity);
    }
    let remaining = U256::from(reserve - amount_out);
    // Floor the root so the burned share count errs upward.
    let root = sqrt_floor(U256::from(reserve) * remaining);
    let delta = to_u128(U256::from(reserve) - root)?;
    fixed_point::mul_div_ceil(supply, delta, reserve)
}

/// Calculates the constant product K.
#[must_use]
pub fn calculate_k(reserve0: u128, reserve1: u128) -> U256 {
    wide_mul(reserve0, reserve1)
}

/// Calculates the spot price of token_in in terms of token_out.
/// Price = reserve_out / reserve_in
pub fn calculate_spot_price(reserve_in: u128, reserve_out: u128) -> PoolResult<Decimal> {
    if reserve_in == 0 {
        return Err(PoolError::DivisionByZero);
    }
    let r_in = to_decimal(reserve_in)?;
    let r_out = to_decimal(reserve_out)?;
    r_out
        .checked_div(r_in)
        .ok_or(PoolError::ArithmeticOverflow("spot price out of decimal range"))
}

/// Lossless `u128` to [`Decimal`] conversion; amounts beyond 96 bits are rejected.
pub(crate) fn to_decimal(value: u128) -> PoolResult<Decimal> {
    Decimal::from_str(&value.to_string())
        .map_err(|_| PoolError::ArithmeticOverflow("amount out of decimal range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_out_amount() {
        // 1000 reserve0, 1000 reserve1, 10 input (already net of fees)
        // out = 1000 * 10 / 1010 = 9.90... -> 9
        assert_eq!(calculate_out_amount(10, 1000, 1000).unwrap(), 9);
    }

    #[test]
    fn test_shares_for_deposit_grown_reserve_overflow() {
        assert!(matches!(
            shares_for_deposit(u128::MAX / 2, u128::MAX - 10, 1_000_000_000),
            Err(PoolError::ArithmeticOverflow(_))
        ));
    }

    #[test]
    fn test_calculate_out_amount_never_drains() {
        let out = calculate_out_amount(u128::MAX / 2, 1, 1_000).unwrap();
        assert!(out < 1_000);
    }

    #[test]
    fn test_calculate_out_amount_zero_input() {
        assert_eq!(calculate_out_amount(0, 0, 0).unwrap(), 0);
    }

    #[test]
    fn test_calculate_spot_price() {
        let price = calculate_spot_price(2000, 1000).unwrap();
        // price = 1000 / 2000 = 0.5
        assert_eq!(price, Decimal::from_str("0.5").unwrap());
    }

    #[test]
    fn test_calculate_spot_price_zero_reserve() {
        assert_eq!(calculate_spot_price(0, 1000), Err(PoolError::DivisionByZero));
    }

    #[test]
    fn test_calculate_k() {
        assert_eq!(calculate_k(1_000_000, 1_000_000), U256::from(1_000_000_000_000u64));
    }

    #[test]
    fn test_shares_for_deposit() {
        // Depositing 21% of a side grows sqrt(k) by 10%.
        // sqrt(1_000_000 * 1_210_000) = 1_100_000 -> supply * 0.1
        let shares = shares_for_deposit(210_000, 1_000_000, 1_000_000_000).unwrap();
        assert_eq!(shares, 100_000_000);
    }

    #[test]
    fn test_shares_for_withdraw_rounds_up() {
        // 1 - sqrt(0.81) = 0.1 exactly
        let shares = shares_for_withdraw(190_000, 1_000_000, 1_000_000_000).unwrap();
        assert_eq!(shares, 100_000_000);

        let shares = shares_for_withdraw(1, 1_000_000, 1_000_000_000).unwrap();
        assert!(shares >= 500);
    }

    #[test]
    fn test_shares_for_withdraw_rejects_full_reserve() {
        assert_eq!(
            shares_for_withdraw(1_000, 1_000, 10),
            Err(PoolError::InsufficientLiquidity)
        );
    }
}
