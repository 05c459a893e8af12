//! Accounting and curve math for a two-asset liquidity pool.
//!
//! The crate is a pure, synchronous library: it consumes current reserves and
//! the caller's intent and returns new reserves, share deltas and fee
//! allocations, or a typed [`PoolError`]. It never logs and never performs I/O;
//! persisting state and moving balances is left to an orchestrator.
//!
//! - [`math`]: fixed-point helpers and the per-curve formulas
//! - [`fees`]: the fee schedule
//! - [`curve`]: the pricing strategy dispatch
//! - [`pool`]: the pool aggregate and its operations

pub mod config;
pub mod curve;
pub mod enums;
pub mod error;
pub mod fees;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod value_objects;

#[cfg(test)]
mod properties;

pub use error::{PoolError, PoolResult};
