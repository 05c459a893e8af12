//! Error types returned by the pool engine.
//!
//! Every core operation is total: it returns either a success value or
//! exactly one [`PoolError`]. Errors are detected before any state is
//! mutated, so a failed call leaves the pool untouched.

use thiserror::Error;

/// Failure kinds of the pool engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The operation requires an active (initialized) pool.
    #[error("pool is not initialized")]
    PoolNotInitialized,

    /// `initialize` was called on a pool that is already active.
    #[error("pool is already initialized")]
    AlreadyInitialized,

    /// An intermediate or final value did not fit into 128 bits, or a
    /// subtraction would have gone negative.
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(&'static str),

    /// A division by zero was requested.
    #[error("division by zero")]
    DivisionByZero,

    /// The computed amount violates the caller-supplied bound.
    #[error("slippage exceeded: computed {computed}, bound {bound}")]
    SlippageExceeded {
        /// Amount the engine computed.
        computed: u128,
        /// Minimum or maximum the caller accepted.
        bound: u128,
    },

    /// The request would drain (or over-drain) a reserve or the share supply.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// `initialize` was called with an empty reserve.
    #[error("initial reserves must be strictly positive")]
    ZeroReserve,

    /// The configured bootstrap share amount is zero.
    #[error("bootstrap share amount must be strictly positive")]
    ZeroBootstrapShares,

    /// A fee pair is malformed (numerator above denominator, or a zero
    /// denominator with a non-zero numerator).
    #[error("invalid fee schedule: {0}")]
    InvalidFeeSchedule(&'static str),

    /// A curve was configured with unusable parameters.
    #[error("invalid curve: {0}")]
    InvalidCurve(&'static str),
}

/// Convenience alias used throughout the crate.
pub type PoolResult<T> = Result<T, PoolError>;
