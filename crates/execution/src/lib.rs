//! Execution layer around the pool engine.
//!
//! This crate turns engine results into balance movements:
//! - Account ledger with all-or-nothing batches
//! - Pool records binding a pool to its assets and operator
//! - State persistence (in-memory and JSON file)
//! - Orchestration with per-pool serialization
//! - Pool lifecycle events

/// Prelude module for convenient imports.
pub mod prelude;

/// Execution errors.
pub mod error;
/// Account balances.
pub mod ledger;
/// Pool lifecycle tracking.
pub mod lifecycle;
/// Pool operation orchestration.
pub mod orchestrator;
/// Pool records.
pub mod record;
/// State persistence.
pub mod store;

pub use error::ExecutionError;
pub use record::{PoolId, PoolRecord};
