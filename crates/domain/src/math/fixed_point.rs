//! Fixed-point helpers over `u128` amounts.
//!
//! Products are computed in 256 bits ([`U256`]) so that `a * b` can never
//! overflow for any pair of `u128` inputs; only the final quotient has to fit
//! back into `u128`. Division truncates toward zero unless a function is
//! explicitly named `_ceil`.

use crate::error::{PoolError, PoolResult};
use primitive_types::U256;

/// Narrows a 256-bit value back into `u128`.
pub fn to_u128(value: U256) -> PoolResult<u128> {
    if value > U256::from(u128::MAX) {
        return Err(PoolError::ArithmeticOverflow("result exceeds 128 bits"));
    }
    Ok(value.low_u128())
}

/// `floor(a * b / c)` computed with a 256-bit intermediate.
///
/// # Errors
/// - [`PoolError::DivisionByZero`] if `c == 0`.
/// - [`PoolError::ArithmeticOverflow`] if the quotient does not fit in `u128`.
pub fn mul_div(a: u128, b: u128, c: u128) -> PoolResult<u128> {
    if c == 0 {
        return Err(PoolError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    to_u128(product / U256::from(c))
}

/// `ceil(a * b / c)` computed with a 256-bit intermediate.
///
/// Used only where the pool must charge the caller for a fractional unit
/// (share burns on exact-out withdrawals).
///
/// # Errors
/// Same as [`mul_div`].
pub fn mul_div_ceil(a: u128, b: u128, c: u128) -> PoolResult<u128> {
    if c == 0 {
        return Err(PoolError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    let divisor = U256::from(c);
    let (quotient, remainder) = product.div_mod(divisor);
    let quotient = if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::one()
    };
    to_u128(quotient)
}

/// Checked `a + b`.
pub fn add(a: u128, b: u128) -> PoolResult<u128> {
    a.checked_add(b)
        .ok_or(PoolError::ArithmeticOverflow("addition overflow"))
}

/// Checked `a - b`; going below zero is reported as overflow.
pub fn sub(a: u128, b: u128) -> PoolResult<u128> {
    a.checked_sub(b)
        .ok_or(PoolError::ArithmeticOverflow("subtraction underflow"))
}

/// Full-width product, used for invariant comparisons.
#[must_use]
pub fn wide_mul(a: u128, b: u128) -> U256 {
    U256::from(a) * U256::from(b)
}

/// Integer square root (floor) of a 256-bit value.
#[must_use]
pub fn sqrt_floor(value: U256) -> U256 {
    value.integer_sqrt()
}
