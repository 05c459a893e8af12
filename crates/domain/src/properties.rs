//! Property-based tests for the pool invariants.
//!
//! 1. **Invariant growth**: constant product never decreases across swaps.
//! 2. **Proportionality**: deposits and withdrawals keep reserve/supply ratios.
//! 3. **No over-drain**: a swap never pays out the whole opposite reserve.
//! 4. **Round-trip**: deposit then withdraw returns the deposit within 1 unit.
//! 5. **Idempotent quoting**: quotes are pure.

use proptest::prelude::*;

use crate::config::PoolConfig;
use crate::curve::Curve;
use crate::enums::Side;
use crate::error::PoolError;
use crate::fees::{Fee, FeeSchedule};
use crate::math::fixed_point::wide_mul;
use crate::pool::Pool;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn reference_fees_without_withdraw_fee() -> FeeSchedule {
    let Ok(fees) = FeeSchedule::new(
        Fee::new(25, 10_000),
        Fee::new(5, 10_000),
        Fee::zero(),
        Fee::new(20, 100),
    ) else {
        panic!("valid fee schedule");
    };
    fees
}

fn make_cp(ra: u128, rb: u128, fees: FeeSchedule) -> Pool {
    let config = PoolConfig::new(fees, Curve::ConstantProduct);
    let Ok((pool, _)) = Pool::from_config(&config, ra, rb) else {
        panic!("valid CP pool");
    };
    pool
}

fn side(source_is_a: bool) -> Side {
    if source_is_a { Side::A } else { Side::B }
}

/// `|ra' * S - ra * S'| <= max(S, S')`: the ratio moved by at most one unit.
fn ratio_preserved(before: (u128, u128), after: (u128, u128)) -> bool {
    let (reserve, supply) = before;
    let (reserve_after, supply_after) = after;
    let lhs = wide_mul(reserve_after, supply);
    let rhs = wide_mul(reserve, supply_after);
    let diff = if lhs > rhs { lhs - rhs } else { rhs - lhs };
    diff <= wide_mul(supply.max(supply_after), 1)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_constant_product_never_decreases(
        ra in 1_000u128..1_000_000_000_000_000_000,
        rb in 1_000u128..1_000_000_000_000_000_000,
        amount_in in 1u128..1_000_000_000_000_000_000,
        source_is_a in any::<bool>(),
        with_host in any::<bool>(),
    ) {
        let mut pool = make_cp(ra, rb, FeeSchedule::default());
        let k_before = pool.invariant();
        if let Ok(quote) = pool.swap(amount_in, 0, side(source_is_a), with_host) {
            let k_after = pool.invariant();
            prop_assert!(k_after >= k_before);
            if quote.trade_fee > 0 && quote.amount_in_after_fee > 0 {
                prop_assert!(k_after > k_before);
            }
        }
    }

    #[test]
    fn prop_swap_never_drains(
        ra in 1u128..1_000_000_000_000,
        rb in 1u128..1_000_000_000_000,
        amount_in in 0u128..u64::MAX as u128,
        source_is_a in any::<bool>(),
    ) {
        let source = side(source_is_a);
        let mut pool = make_cp(ra, rb, FeeSchedule::free());
        let reserve_out = pool.reserve(source.opposite());
        match pool.swap(amount_in, 0, source, false) {
            Ok(quote) => {
                prop_assert!(quote.amount_out < reserve_out);
                prop_assert!(pool.reserve(source.opposite()) > 0);
            }
            Err(e) => prop_assert_eq!(e, PoolError::InsufficientLiquidity),
        }
    }

    #[test]
    fn prop_constant_price_never_drains(
        reserve in 1u128..1_000_000,
        amount_in in 0u128..10_000_000,
        numerator in 1u128..100,
        denominator in 1u128..100,
        source_is_a in any::<bool>(),
    ) {
        let Ok(curve) = Curve::constant_price(numerator, denominator) else {
            panic!("valid rate");
        };
        let config = PoolConfig::new(FeeSchedule::free(), curve);
        let Ok((mut pool, _)) = Pool::from_config(&config, reserve, reserve) else {
            panic!("valid pool");
        };
        let before = pool.clone();
        match pool.swap(amount_in, 0, side(source_is_a), false) {
            Ok(quote) => prop_assert!(quote.amount_out < reserve),
            Err(e) => {
                prop_assert_eq!(e, PoolError::InsufficientLiquidity);
                prop_assert_eq!(pool, before);
            }
        }
    }

    #[test]
    fn prop_deposit_preserves_ratios(
        ra in 1_000u128..1_000_000_000_000,
        rb in 1_000u128..1_000_000_000_000,
        shares in 0u128..10_000_000_000,
    ) {
        let mut pool = make_cp(ra, rb, FeeSchedule::default());
        let supply = pool.share_supply();
        let Ok(_) = pool.deposit(shares, u128::MAX, u128::MAX) else {
            panic!("unbounded deposit succeeds");
        };
        prop_assert!(ratio_preserved((ra, supply), (pool.reserve_a(), pool.share_supply())));
        prop_assert!(ratio_preserved((rb, supply), (pool.reserve_b(), pool.share_supply())));
    }

    #[test]
    fn prop_withdraw_preserves_ratios(
        ra in 1_000u128..1_000_000_000_000,
        rb in 1_000u128..1_000_000_000_000,
        shares in 0u128..999_000_000,
    ) {
        let mut pool = make_cp(ra, rb, reference_fees_without_withdraw_fee());
        let supply = pool.share_supply();
        if pool.withdraw(shares, 0, 0).is_ok() {
            prop_assert!(ratio_preserved((ra, supply), (pool.reserve_a(), pool.share_supply())));
            prop_assert!(ratio_preserved((rb, supply), (pool.reserve_b(), pool.share_supply())));
        }
    }

    #[test]
    fn prop_deposit_withdraw_round_trip(
        ra in 1_000u128..1_000_000_000_000,
        rb in 1_000u128..1_000_000_000_000,
        shares in 1u128..1_000_000_000,
    ) {
        let mut pool = make_cp(ra, rb, reference_fees_without_withdraw_fee());
        let Ok(deposit) = pool.deposit(shares, u128::MAX, u128::MAX) else {
            panic!("unbounded deposit succeeds");
        };
        let Ok(withdraw) = pool.withdraw(shares, 0, 0) else {
            panic!("withdrawing freshly minted shares succeeds");
        };
        prop_assert!(deposit.amount_a.abs_diff(withdraw.amount_a) <= 1);
        prop_assert!(deposit.amount_b.abs_diff(withdraw.amount_b) <= 1);
    }

    #[test]
    fn prop_quotes_are_idempotent(
        ra in 1_000u128..1_000_000_000_000,
        rb in 1_000u128..1_000_000_000_000,
        amount in 0u128..1_000_000_000_000,
        source_is_a in any::<bool>(),
    ) {
        let pool = make_cp(ra, rb, FeeSchedule::default());
        let source = side(source_is_a);
        prop_assert_eq!(
            pool.quote_swap(amount, 0, source, true),
            pool.quote_swap(amount, 0, source, true)
        );
        prop_assert_eq!(
            pool.quote_deposit(amount, u128::MAX, u128::MAX),
            pool.quote_deposit(amount, u128::MAX, u128::MAX)
        );
        prop_assert_eq!(
            pool.quote_withdraw(amount, 0, 0),
            pool.quote_withdraw(amount, 0, 0)
        );
        prop_assert_eq!(
            pool.quote_deposit_single_exact_in(source, amount, 0),
            pool.quote_deposit_single_exact_in(source, amount, 0)
        );
    }
}
