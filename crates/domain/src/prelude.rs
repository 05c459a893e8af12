//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use tswap_domain::prelude::*;
//!
//! let (mut pool, _) = Pool::from_config(&PoolConfig::default(), 1_000_000, 1_000_000).unwrap();
//! let quote = pool.swap(100_000, 0, Side::A, false).unwrap();
//! assert_eq!(quote.amount_out, 90_661);
//! ```

pub use crate::config::{DEFAULT_BOOTSTRAP_SHARES, PoolConfig};
pub use crate::curve::Curve;
pub use crate::enums::{CurveType, PoolStatus, Side};
pub use crate::error::{PoolError, PoolResult};
pub use crate::fees::{Fee, FeeSchedule, TradingFee};
pub use crate::pool::Pool;
pub use crate::value_objects::{
    DepositQuote, SingleDepositQuote, SingleWithdrawQuote, SwapQuote, WithdrawQuote,
};
