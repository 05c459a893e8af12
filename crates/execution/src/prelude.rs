//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use tswap_execution::prelude::*;
//! ```

// Errors
pub use crate::error::ExecutionError;

// Ledger
pub use crate::ledger::{AccountId, AssetId, BalanceChange, Ledger};

// Lifecycle
pub use crate::lifecycle::{EventData, EventLog, PoolCreatedData, PoolEvent, PoolEventType};

// Orchestrator
pub use crate::orchestrator::{CreatePool, PoolOrchestrator};

// Records
pub use crate::record::{PoolId, PoolRecord};

// Store
pub use crate::store::{JsonFileStore, MemoryStore, StateSnapshot, StateStore, StoreError};
