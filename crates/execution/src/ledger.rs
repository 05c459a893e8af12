//! Token balances held outside the pools.
//!
//! The ledger stands in for the token accounts a real deployment would
//! mutate. Batches are all-or-nothing: every change is staged first and
//! only written back once the whole batch is valid.

use crate::error::ExecutionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Owner of balances (a user, the pool operator, or a host).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fungible asset: one of the pooled tokens or a pool's share unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single balance movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceChange {
    Credit {
        account: AccountId,
        asset: AssetId,
        amount: u128,
    },
    Debit {
        account: AccountId,
        asset: AssetId,
        amount: u128,
    },
}

impl BalanceChange {
    #[must_use]
    pub fn credit(account: &AccountId, asset: &AssetId, amount: u128) -> Self {
        Self::Credit {
            account: account.clone(),
            asset: asset.clone(),
            amount,
        }
    }

    #[must_use]
    pub fn debit(account: &AccountId, asset: &AssetId, amount: u128) -> Self {
        Self::Debit {
            account: account.clone(),
            asset: asset.clone(),
            amount,
        }
    }
}

/// Balances per account and asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balances: BTreeMap<AccountId, BTreeMap<AssetId, u128>>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `asset` held by `account`; zero when unknown.
    #[must_use]
    pub fn balance(&self, account: &AccountId, asset: &AssetId) -> u128 {
        self.balances
            .get(account)
            .and_then(|assets| assets.get(asset))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of `asset` across all accounts.
    #[must_use]
    pub fn total(&self, asset: &AssetId) -> u128 {
        self.balances
            .values()
            .filter_map(|assets| assets.get(asset))
            .fold(0u128, |acc, v| acc.saturating_add(*v))
    }

    /// All balances of `account`.
    pub fn balances_of(&self, account: &AccountId) -> impl Iterator<Item = (&AssetId, &u128)> {
        self.balances.get(account).into_iter().flatten()
    }

    /// Accounts known to the ledger.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountId> {
        self.balances.keys()
    }

    /// Creates `amount` of `asset` out of thin air (faucet).
    pub fn mint(
        &mut self,
        account: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), ExecutionError> {
        self.apply(&[BalanceChange::credit(account, asset, amount)])
    }

    /// Applies every change or none of them.
    ///
    /// # Errors
    /// - [`ExecutionError::InsufficientFunds`] if a debit exceeds the staged balance.
    /// - [`ExecutionError::BalanceOverflow`] if a credit overflows.
    pub fn apply(&mut self, changes: &[BalanceChange]) -> Result<(), ExecutionError> {
        let mut staged: BTreeMap<(AccountId, AssetId), u128> = BTreeMap::new();

        for change in changes {
            match change {
                BalanceChange::Credit {
                    account,
                    asset,
                    amount,
                } => {
                    let key = (account.clone(), asset.clone());
                    let current = *staged
                        .entry(key.clone())
                        .or_insert_with(|| self.balance(account, asset));
                    let next = current.checked_add(*amount).ok_or_else(|| {
                        ExecutionError::BalanceOverflow {
                            account: account.clone(),
                            asset: asset.clone(),
                        }
                    })?;
                    staged.insert(key, next);
                }
                BalanceChange::Debit {
                    account,
                    asset,
                    amount,
                } => {
                    let key = (account.clone(), asset.clone());
                    let current = *staged
                        .entry(key.clone())
                        .or_insert_with(|| self.balance(account, asset));
                    let next = current.checked_sub(*amount).ok_or_else(|| {
                        ExecutionError::InsufficientFunds {
                            account: account.clone(),
                            asset: asset.clone(),
                            needed: *amount,
                            available: current,
                        }
                    })?;
                    staged.insert(key, next);
                }
            }
        }

        for ((account, asset), amount) in staged {
            self.balances
                .entry(account)
                .or_default()
                .insert(asset, amount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::new("alice")
    }

    fn usdc() -> AssetId {
        AssetId::new("USDC")
    }

    #[test]
    fn test_mint_and_balance() {
        let mut ledger = Ledger::new();
        ledger.mint(&alice(), &usdc(), 100).unwrap();
        ledger.mint(&alice(), &usdc(), 50).unwrap();
        assert_eq!(ledger.balance(&alice(), &usdc()), 150);
        assert_eq!(ledger.balance(&AccountId::new("bob"), &usdc()), 0);
        assert_eq!(ledger.total(&usdc()), 150);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut ledger = Ledger::new();
        let bob = AccountId::new("bob");
        ledger.mint(&alice(), &usdc(), 100).unwrap();

        let err = ledger.apply(&[
            BalanceChange::credit(&bob, &usdc(), 60),
            BalanceChange::debit(&alice(), &usdc(), 60),
            BalanceChange::debit(&alice(), &usdc(), 60),
        ]);
        assert!(matches!(
            err,
            Err(ExecutionError::InsufficientFunds {
                needed: 60,
                available: 40,
                ..
            })
        ));
        assert_eq!(ledger.balance(&alice(), &usdc()), 100);
        assert_eq!(ledger.balance(&bob, &usdc()), 0);
    }

    #[test]
    fn test_batch_transfer() {
        let mut ledger = Ledger::new();
        let bob = AccountId::new("bob");
        ledger.mint(&alice(), &usdc(), 100).unwrap();
        ledger
            .apply(&[
                BalanceChange::debit(&alice(), &usdc(), 30),
                BalanceChange::credit(&bob, &usdc(), 30),
            ])
            .unwrap();
        assert_eq!(ledger.balance(&alice(), &usdc()), 70);
        assert_eq!(ledger.balance(&bob, &usdc()), 30);
        assert_eq!(ledger.total(&usdc()), 100);
    }

    #[test]
    fn test_credit_overflow() {
        let mut ledger = Ledger::new();
        ledger.mint(&alice(), &usdc(), u128::MAX).unwrap();
        assert!(matches!(
            ledger.mint(&alice(), &usdc(), 1),
            Err(ExecutionError::BalanceOverflow { .. })
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut ledger = Ledger::new();
        ledger.mint(&alice(), &usdc(), 42).unwrap();
        let json = serde_json::to_string(&ledger).unwrap();
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}
