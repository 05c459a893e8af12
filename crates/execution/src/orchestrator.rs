//! Reference orchestrator: loads pools, runs engine operations, and applies
//! the resulting transfers to the ledger.
//!
//! Mutations of one pool are serialized by a per-pool lock; different pools
//! proceed independently. Quote methods read a snapshot without locking.

use crate::error::ExecutionError;
use crate::ledger::{AccountId, AssetId, BalanceChange, Ledger};
use crate::lifecycle::{EventData, EventLog, PoolCreatedData, PoolEvent};
use crate::record::{PoolId, PoolRecord};
use crate::store::StateStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use tswap_domain::config::PoolConfig;
use tswap_domain::enums::Side;
use tswap_domain::pool::Pool;
use tswap_domain::value_objects::{
    DepositQuote, SingleDepositQuote, SingleWithdrawQuote, SwapQuote, WithdrawQuote,
};

/// Parameters for creating a pool.
#[derive(Debug, Clone)]
pub struct CreatePool {
    /// Supplies the initial reserves and receives the bootstrap shares.
    pub creator: AccountId,
    /// Receives owner fees; defaults to the creator.
    pub operator: Option<AccountId>,
    pub mint_a: AssetId,
    pub mint_b: AssetId,
    pub amount_a: u128,
    pub amount_b: u128,
    pub config: PoolConfig,
}

/// Outcome of an engine operation, ready to be committed.
struct Staged<T> {
    output: T,
    changes: Vec<BalanceChange>,
    data: EventData,
}

/// Executes pool operations against a [`StateStore`].
pub struct PoolOrchestrator<S: StateStore> {
    store: Arc<S>,
    ledger: RwLock<Ledger>,
    locks: Mutex<HashMap<PoolId, Arc<Mutex<()>>>>,
    events: EventLog,
}

impl<S: StateStore> PoolOrchestrator<S> {
    /// Creates an orchestrator, loading the ledger from `store`.
    ///
    /// # Errors
    /// Returns an error if the ledger cannot be loaded.
    pub async fn new(store: Arc<S>) -> Result<Self, ExecutionError> {
        let ledger = store.load_ledger().await?;
        Ok(Self {
            store,
            ledger: RwLock::new(ledger),
            locks: Mutex::new(HashMap::new()),
            events: EventLog::new(),
        })
    }

    /// The event log of committed operations.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Balance of `asset` held by `account`.
    pub async fn balance(&self, account: &AccountId, asset: &AssetId) -> u128 {
        self.ledger.read().await.balance(account, asset)
    }

    /// Copy of the whole ledger.
    pub async fn ledger(&self) -> Ledger {
        self.ledger.read().await.clone()
    }

    /// Loads a pool record.
    pub async fn pool(&self, id: PoolId) -> Result<PoolRecord, ExecutionError> {
        self.store
            .load_pool(&id)
            .await?
            .ok_or(ExecutionError::PoolNotFound(id))
    }

    /// Lists every pool record.
    pub async fn pools(&self) -> Result<Vec<PoolRecord>, ExecutionError> {
        Ok(self.store.list_pools().await?)
    }

    /// Credits `amount` of `asset` to `account` (faucet).
    pub async fn fund(
        &self,
        account: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), ExecutionError> {
        let mut ledger = self.ledger.write().await;
        let mut next = ledger.clone();
        next.mint(account, asset, amount)?;
        self.store.save_ledger(&next).await?;
        *ledger = next;
        info!(account = %account, asset = %asset, amount = amount, "Account funded");
        Ok(())
    }

    /// Initializes a new pool from the creator's balances.
    pub async fn create_pool(&self, request: CreatePool) -> Result<PoolRecord, ExecutionError> {
        let result = self.create_pool_inner(request).await;
        if let Err(e) = &result {
            warn!(error = %e, "Pool creation rejected");
        }
        result
    }

    async fn create_pool_inner(&self, request: CreatePool) -> Result<PoolRecord, ExecutionError> {
        let (pool, shares) =
            Pool::from_config(&request.config, request.amount_a, request.amount_b)?;
        let id = PoolId::new();
        let now = chrono::Utc::now();
        let operator = request
            .operator
            .clone()
            .unwrap_or_else(|| request.creator.clone());
        let record = PoolRecord {
            id,
            mint_a: request.mint_a.clone(),
            mint_b: request.mint_b.clone(),
            share_asset: PoolRecord::share_asset_for(&id),
            operator: operator.clone(),
            pool,
            created_at: now,
            updated_at: now,
        };
        let changes = vec![
            BalanceChange::debit(&request.creator, &record.mint_a, request.amount_a),
            BalanceChange::debit(&request.creator, &record.mint_b, request.amount_b),
            BalanceChange::credit(&request.creator, &record.share_asset, shares),
        ];

        let _guard = self.lock_for(id).await;
        let mut ledger = self.ledger.write().await;
        let mut next = ledger.clone();
        next.apply(&changes)?;
        self.store.commit(&record, &next).await?;
        *ledger = next;
        drop(ledger);

        self.events
            .record(PoolEvent::new(
                id,
                request.creator.clone(),
                EventData::PoolCreated(PoolCreatedData {
                    reserve_a: request.amount_a,
                    reserve_b: request.amount_b,
                    bootstrap_shares: shares,
                    operator,
                }),
            ))
            .await;
        info!(
            pool = %id,
            creator = %request.creator,
            reserve_a = request.amount_a,
            reserve_b = request.amount_b,
            shares = shares,
            curve = ?request.config.curve.curve_type(),
            "Pool created"
        );
        Ok(record)
    }

    // ------------------------------------------------------------------
    // Quotes (no lock, no mutation)
    // ------------------------------------------------------------------

    /// Quotes a swap against the current snapshot.
    pub async fn quote_swap(
        &self,
        pool_id: PoolId,
        source: Side,
        amount_in: u128,
        minimum_amount_out: u128,
        with_host: bool,
    ) -> Result<SwapQuote, ExecutionError> {
        let record = self.pool(pool_id).await?;
        let quote = record
            .pool
            .quote_swap(amount_in, minimum_amount_out, source, with_host)?;
        debug!(pool = %pool_id, amount_in = amount_in, amount_out = quote.amount_out, "Swap quoted");
        Ok(quote)
    }

    // ------------------------------------------------------------------
    // Mutating operations
    // ------------------------------------------------------------------

    /// Deposits both assets for exactly `shares` pool shares.
    pub async fn deposit(
        &self,
        pool_id: PoolId,
        account: &AccountId,
        shares: u128,
        max_amount_a: u128,
        max_amount_b: u128,
    ) -> Result<DepositQuote, ExecutionError> {
        let quote = self
            .execute(pool_id, account, "deposit", |record, pool| {
                let quote = pool.deposit(shares, max_amount_a, max_amount_b)?;
                Ok(Staged {
                    output: quote,
                    changes: vec![
                        BalanceChange::debit(account, &record.mint_a, quote.amount_a),
                        BalanceChange::debit(account, &record.mint_b, quote.amount_b),
                        BalanceChange::credit(account, &record.share_asset, quote.shares),
                    ],
                    data: EventData::Deposited(quote),
                })
            })
            .await?;
        info!(
            pool = %pool_id,
            account = %account,
            shares = quote.shares,
            amount_a = quote.amount_a,
            amount_b = quote.amount_b,
            "Liquidity deposited"
        );
        Ok(quote)
    }

    /// Redeems `shares` for both assets; withdraw-fee shares go to the operator.
    pub async fn withdraw(
        &self,
        pool_id: PoolId,
        account: &AccountId,
        shares: u128,
        min_amount_a: u128,
        min_amount_b: u128,
    ) -> Result<WithdrawQuote, ExecutionError> {
        let quote = self
            .execute(pool_id, account, "withdraw", |record, pool| {
                let quote = pool.withdraw(shares, min_amount_a, min_amount_b)?;
                Ok(Staged {
                    output: quote,
                    changes: vec![
                        BalanceChange::debit(account, &record.share_asset, quote.shares),
                        BalanceChange::credit(
                            &record.operator,
                            &record.share_asset,
                            quote.fee_shares,
                        ),
                        BalanceChange::credit(account, &record.mint_a, quote.amount_a),
                        BalanceChange::credit(account, &record.mint_b, quote.amount_b),
                    ],
                    data: EventData::Withdrawn(quote),
                })
            })
            .await?;
        info!(
            pool = %pool_id,
            account = %account,
            shares = quote.shares,
            fee_shares = quote.fee_shares,
            amount_a = quote.amount_a,
            amount_b = quote.amount_b,
            "Liquidity withdrawn"
        );
        Ok(quote)
    }

    /// Swaps `amount_in` of `source` for the opposite asset.
    ///
    /// When `host` is given, the host portion of the owner fee is credited
    /// to it; otherwise the whole owner fee goes to the operator.
    pub async fn swap(
        &self,
        pool_id: PoolId,
        account: &AccountId,
        source: Side,
        amount_in: u128,
        minimum_amount_out: u128,
        host: Option<&AccountId>,
    ) -> Result<SwapQuote, ExecutionError> {
        let quote = self
            .execute(pool_id, account, "swap", |record, pool| {
                let quote = pool.swap(amount_in, minimum_amount_out, source, host.is_some())?;
                let mint_in = record.mint(source);
                let mint_out = record.mint(source.opposite());
                let mut changes = vec![
                    BalanceChange::debit(account, mint_in, quote.amount_in),
                    BalanceChange::credit(account, mint_out, quote.amount_out),
                    BalanceChange::credit(&record.operator, mint_in, quote.owner_fee),
                ];
                if let Some(host) = host {
                    changes.push(BalanceChange::credit(host, mint_in, quote.host_fee));
                }
                Ok(Staged {
                    output: quote,
                    changes,
                    data: EventData::Swapped(quote),
                })
            })
            .await?;
        info!(
            pool = %pool_id,
            account = %account,
            source = ?source,
            amount_in = quote.amount_in,
            amount_out = quote.amount_out,
            trade_fee = quote.trade_fee,
            owner_fee = quote.owner_fee,
            host_fee = quote.host_fee,
            "Swap executed"
        );
        Ok(quote)
    }

    /// Deposits exactly `amount_in` of one asset.
    pub async fn deposit_single(
        &self,
        pool_id: PoolId,
        account: &AccountId,
        side: Side,
        amount_in: u128,
        minimum_shares: u128,
    ) -> Result<SingleDepositQuote, ExecutionError> {
        let quote = self
            .execute(pool_id, account, "single-sided deposit", |record, pool| {
                let quote = pool.deposit_single_exact_in(side, amount_in, minimum_shares)?;
                let mint = record.mint(side);
                Ok(Staged {
                    output: quote,
                    changes: vec![
                        BalanceChange::debit(account, mint, quote.amount_in),
                        BalanceChange::credit(&record.operator, mint, quote.owner_fee),
                        BalanceChange::credit(account, &record.share_asset, quote.shares),
                    ],
                    data: EventData::SingleDeposited(quote),
                })
            })
            .await?;
        info!(
            pool = %pool_id,
            account = %account,
            side = ?side,
            amount_in = quote.amount_in,
            shares = quote.shares,
            "Single-sided deposit"
        );
        Ok(quote)
    }

    /// Withdraws exactly `amount_out` of one asset.
    pub async fn withdraw_single(
        &self,
        pool_id: PoolId,
        account: &AccountId,
        side: Side,
        amount_out: u128,
        maximum_shares: u128,
    ) -> Result<SingleWithdrawQuote, ExecutionError> {
        let quote = self
            .execute(pool_id, account, "single-sided withdraw", |record, pool| {
                let quote = pool.withdraw_single_exact_out(side, amount_out, maximum_shares)?;
                let mint = record.mint(side);
                Ok(Staged {
                    output: quote,
                    changes: vec![
                        BalanceChange::debit(account, &record.share_asset, quote.shares),
                        BalanceChange::credit(
                            &record.operator,
                            &record.share_asset,
                            quote.fee_shares,
                        ),
                        BalanceChange::credit(account, mint, quote.amount_out),
                        BalanceChange::credit(&record.operator, mint, quote.owner_fee),
                    ],
                    data: EventData::SingleWithdrawn(quote),
                })
            })
            .await?;
        info!(
            pool = %pool_id,
            account = %account,
            side = ?side,
            amount_out = quote.amount_out,
            shares = quote.shares,
            "Single-sided withdraw"
        );
        Ok(quote)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn lock_for(&self, id: PoolId) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(id).or_default())
        };
        lock.lock_owned().await
    }

    /// Runs `op` on a copy of the pool under the pool's lock, then commits
    /// the pool, the ledger changes and the event together.
    async fn execute<T, F>(
        &self,
        pool_id: PoolId,
        account: &AccountId,
        operation: &'static str,
        op: F,
    ) -> Result<T, ExecutionError>
    where
        F: FnOnce(&PoolRecord, &mut Pool) -> Result<Staged<T>, ExecutionError>,
    {
        let result = self.execute_inner(pool_id, account, op).await;
        if let Err(e) = &result {
            warn!(pool = %pool_id, account = %account, operation = operation, error = %e, "Operation rejected");
        }
        result
    }

    async fn execute_inner<T, F>(
        &self,
        pool_id: PoolId,
        account: &AccountId,
        op: F,
    ) -> Result<T, ExecutionError>
    where
        F: FnOnce(&PoolRecord, &mut Pool) -> Result<Staged<T>, ExecutionError>,
    {
        let _guard = self.lock_for(pool_id).await;
        let mut record = self.pool(pool_id).await?;
        let mut working = record.pool.clone();
        let staged = op(&record, &mut working)?;

        let mut ledger = self.ledger.write().await;
        let mut next = ledger.clone();
        next.apply(&staged.changes)?;

        record.pool = working;
        record.updated_at = chrono::Utc::now();
        self.store.commit(&record, &next).await?;
        *ledger = next;
        drop(ledger);

        self.events
            .record(PoolEvent::new(pool_id, account.clone(), staged.data))
            .await;
        Ok(staged.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tswap_domain::curve::Curve;
    use tswap_domain::error::PoolError;
    use tswap_domain::fees::FeeSchedule;

    struct Fixture {
        orchestrator: PoolOrchestrator<MemoryStore>,
        record: PoolRecord,
        owner: AccountId,
        user: AccountId,
    }

    fn asset_a() -> AssetId {
        AssetId::new("TOKEN-A")
    }

    fn asset_b() -> AssetId {
        AssetId::new("TOKEN-B")
    }

    async fn fixture(config: PoolConfig) -> Fixture {
        let orchestrator = PoolOrchestrator::new(Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        let owner = AccountId::new("owner");
        let user = AccountId::new("user");
        for account in [&owner, &user] {
            orchestrator.fund(account, &asset_a(), 5_000_000).await.unwrap();
            orchestrator.fund(account, &asset_b(), 5_000_000).await.unwrap();
        }
        let record = orchestrator
            .create_pool(CreatePool {
                creator: owner.clone(),
                operator: None,
                mint_a: asset_a(),
                mint_b: asset_b(),
                amount_a: 1_000_000,
                amount_b: 1_000_000,
                config,
            })
            .await
            .unwrap();
        Fixture {
            orchestrator,
            record,
            owner,
            user,
        }
    }

    async fn assert_conserved(f: &Fixture) {
        let ledger = f.orchestrator.ledger().await;
        let record = f.orchestrator.pool(f.record.id).await.unwrap();
        assert_eq!(ledger.total(&asset_a()) + record.pool.reserve_a(), 10_000_000);
        assert_eq!(ledger.total(&asset_b()) + record.pool.reserve_b(), 10_000_000);
        assert_eq!(ledger.total(&record.share_asset), record.pool.share_supply());
    }

    #[tokio::test]
    async fn test_create_pool_moves_reserves_and_mints_shares() {
        let f = fixture(PoolConfig::default()).await;
        let o = &f.orchestrator;
        assert_eq!(o.balance(&f.owner, &asset_a()).await, 4_000_000);
        assert_eq!(
            o.balance(&f.owner, &f.record.share_asset).await,
            1_000_000_000
        );
        assert_eq!(o.events().all().await.len(), 1);
        assert_conserved(&f).await;
    }

    #[tokio::test]
    async fn test_create_pool_without_funds_is_rejected() {
        let orchestrator = PoolOrchestrator::new(Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        let err = orchestrator
            .create_pool(CreatePool {
                creator: AccountId::new("broke"),
                operator: None,
                mint_a: asset_a(),
                mint_b: asset_b(),
                amount_a: 10,
                amount_b: 10,
                config: PoolConfig::default(),
            })
            .await;
        assert!(matches!(err, Err(ExecutionError::InsufficientFunds { .. })));
        assert!(orchestrator.pools().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reference_scenario() {
        let f = fixture(PoolConfig::default()).await;
        let o = &f.orchestrator;
        let id = f.record.id;

        let deposit = o
            .deposit(id, &f.user, 10_000_000, u128::MAX, u128::MAX)
            .await
            .unwrap();
        assert_eq!((deposit.amount_a, deposit.amount_b), (10_000, 10_000));

        let withdraw = o.withdraw(id, &f.user, 10_000_000, 0, 0).await.unwrap();
        assert_eq!(withdraw.fee_shares, 1_666_666);
        assert_eq!(
            o.balance(&f.owner, &f.record.share_asset).await,
            1_000_000_000 + 1_666_666
        );

        let swap = o
            .swap(id, &f.user, Side::A, 100_000, 90_674, None)
            .await
            .unwrap();
        assert_eq!(swap.amount_out, 90_674);
        assert_eq!(o.balance(&f.owner, &asset_a()).await, 4_000_000 + 50);
        assert_conserved(&f).await;
        assert_eq!(o.events().for_pool(id).await.len(), 4);
    }

    #[tokio::test]
    async fn test_swap_credits_host() {
        let f = fixture(PoolConfig::default()).await;
        let host = AccountId::new("host");
        let quote = f
            .orchestrator
            .swap(f.record.id, &f.user, Side::A, 100_000, 0, Some(&host))
            .await
            .unwrap();
        assert_eq!(quote.host_fee, 10);
        assert_eq!(f.orchestrator.balance(&host, &asset_a()).await, 10);
        assert_eq!(
            f.orchestrator.balance(&f.owner, &asset_a()).await,
            4_000_000 + 40
        );
        assert_conserved(&f).await;
    }

    #[tokio::test]
    async fn test_rejected_swap_changes_nothing() {
        let f = fixture(PoolConfig::default()).await;
        let before = f.orchestrator.pool(f.record.id).await.unwrap();
        let ledger_before = f.orchestrator.ledger().await;

        let err = f
            .orchestrator
            .swap(f.record.id, &f.user, Side::A, 100_000, 1_000_000, None)
            .await;
        assert!(matches!(
            err,
            Err(ExecutionError::Pool(PoolError::SlippageExceeded { .. }))
        ));

        let err = f
            .orchestrator
            .swap(f.record.id, &f.user, Side::B, 6_000_000, 0, None)
            .await;
        assert!(matches!(err, Err(ExecutionError::InsufficientFunds { .. })));

        assert_eq!(f.orchestrator.pool(f.record.id).await.unwrap().pool, before.pool);
        assert_eq!(f.orchestrator.ledger().await, ledger_before);
        assert_eq!(f.orchestrator.events().all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_withdraw_requires_shares() {
        let f = fixture(PoolConfig::default()).await;
        let err = f
            .orchestrator
            .withdraw(f.record.id, &f.user, 1_000, 0, 0)
            .await;
        assert!(matches!(err, Err(ExecutionError::InsufficientFunds { .. })));
    }

    #[tokio::test]
    async fn test_single_sided_round() {
        let f = fixture(PoolConfig::default()).await;
        let o = &f.orchestrator;
        let id = f.record.id;

        let deposit = o
            .deposit_single(id, &f.user, Side::B, 20_000, 1)
            .await
            .unwrap();
        assert_eq!(
            o.balance(&f.user, &f.record.share_asset).await,
            deposit.shares
        );

        let withdraw = o
            .withdraw_single(id, &f.user, Side::B, 5_000, deposit.shares)
            .await
            .unwrap();
        assert!(withdraw.shares <= deposit.shares);
        assert_eq!(
            o.balance(&f.user, &f.record.share_asset).await,
            deposit.shares - withdraw.shares
        );
        assert_conserved(&f).await;
    }

    #[tokio::test]
    async fn test_unknown_pool() {
        let f = fixture(PoolConfig::default()).await;
        let missing = PoolId::new();
        let err = f
            .orchestrator
            .deposit(missing, &f.user, 1, u128::MAX, u128::MAX)
            .await;
        assert!(matches!(err, Err(ExecutionError::PoolNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn test_quote_matches_execution() {
        let f = fixture(PoolConfig::new(FeeSchedule::free(), Curve::ConstantProduct)).await;
        let quote = f
            .orchestrator
            .quote_swap(f.record.id, Side::B, 12_345, 0, false)
            .await
            .unwrap();
        let executed = f
            .orchestrator
            .swap(f.record.id, &f.user, Side::B, 12_345, 0, None)
            .await
            .unwrap();
        assert_eq!(quote, executed);
    }

    #[tokio::test]
    async fn test_concurrent_swaps_are_serialized() {
        let f = Arc::new(fixture(PoolConfig::default()).await);
        let mut handles = Vec::new();
        for i in 0..8u128 {
            let f = Arc::clone(&f);
            handles.push(tokio::spawn(async move {
                let side = if i % 2 == 0 { Side::A } else { Side::B };
                f.orchestrator
                    .swap(f.record.id, &f.user, side, 10_000 + i, 0, None)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(f.orchestrator.events().for_pool(f.record.id).await.len(), 9);
        assert_conserved(&f).await;
    }
}
