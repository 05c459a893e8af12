//! Construction-time configuration of a pool.

use crate::curve::Curve;
use crate::error::{PoolError, PoolResult};
use crate::fees::FeeSchedule;
use serde::{Deserialize, Serialize};

/// Shares minted to the initial liquidity provider unless configured otherwise.
pub const DEFAULT_BOOTSTRAP_SHARES: u128 = 1_000_000_000;

/// Everything fixed when a pool is initialized, apart from its reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub fee_schedule: FeeSchedule,
    pub curve: Curve,
    /// Shares minted on initialization, independent of the reserve sizes.
    pub bootstrap_shares: u128,
}

impl PoolConfig {
    /// Creates a config with the default bootstrap share amount.
    #[must_use]
    pub fn new(fee_schedule: FeeSchedule, curve: Curve) -> Self {
        Self {
            fee_schedule,
            curve,
            bootstrap_shares: DEFAULT_BOOTSTRAP_SHARES,
        }
    }

    /// Sets the bootstrap share amount.
    #[must_use]
    pub fn with_bootstrap_shares(mut self, shares: u128) -> Self {
        self.bootstrap_shares = shares;
        self
    }

    /// Validates fees, curve and bootstrap amount.
    pub fn validate(&self) -> PoolResult<()> {
        self.fee_schedule.validate()?;
        self.curve.validate()?;
        if self.bootstrap_shares == 0 {
            return Err(PoolError::ZeroBootstrapShares);
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(FeeSchedule::default(), Curve::ConstantProduct)
    }
}
