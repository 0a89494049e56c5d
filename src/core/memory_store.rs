//! In-memory ledger store
//!
//! This module provides `MemoryStore`, a thread-safe implementation of the
//! account store, the operation ledger and the atomic commit primitive.
//!
//! # Design
//!
//! Accounts live in a `DashMap` keyed by account ID. Each value is a shared
//! row holding the account and the IDs of its operations behind its own
//! mutex, which is the account's row lock: a commit checks the balance,
//! stores the operation, links it and writes the new balance while holding
//! it. Readers of the same account wait for the commit to finish and then
//! see both effects. Every account has its own mutex, so work on one account
//! never waits on another.
//!
//! # Lock Ordering
//!
//! 1. Clone the row's `Arc` out of the accounts map and drop the shard guard
//! 2. Lock the row mutex
//! 3. While holding the row, the operations map may be touched
//!
//! No shard guard of the accounts map is held while waiting on a row mutex,
//! and at most one row mutex is held at a time. Nothing that holds an
//! operations entry touches the accounts map.

use crate::core::traits::{AccountStore, LedgerStore, OperationLedger};
use crate::types::{
    Account, AccountId, Operation, OperationDraft, OperationId, PlayerId, StoreError,
};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// An account together with its operation history, oldest first
#[derive(Debug)]
struct AccountRow {
    account: Account,
    operations: Vec<OperationId>,
}

type SharedRow = Arc<Mutex<AccountRow>>;

/// Thread-safe in-memory store for accounts and operations
#[derive(Debug)]
pub struct MemoryStore {
    accounts: DashMap<AccountId, SharedRow>,
    operations: DashMap<OperationId, Operation>,
    next_account_id: AtomicU64,
    next_operation_id: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store; the first account and operation get ID 1
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            operations: DashMap::new(),
            next_account_id: AtomicU64::new(1),
            next_operation_id: AtomicU64::new(1),
        }
    }

    /// The shared row for an account, with the map's shard guard released
    fn row(&self, account_id: AccountId) -> Option<SharedRow> {
        self.accounts
            .get(&account_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    fn lock(row: &SharedRow) -> Result<MutexGuard<'_, AccountRow>, StoreError> {
        row.lock()
            .map_err(|_| StoreError::unavailable("account row lock poisoned"))
    }

    /// Store an operation and link it to its account row
    ///
    /// The caller holds the row, so the ID is allocated and linked under
    /// the account's lock and per-account order matches ID order.
    fn record(&self, row: &mut AccountRow, draft: OperationDraft) -> Operation {
        let operation_id = self.next_operation_id.fetch_add(1, Ordering::SeqCst);
        let operation = draft.into_operation(operation_id);
        self.operations.insert(operation_id, operation.clone());
        row.operations.push(operation_id);
        operation
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for MemoryStore {
    fn save(&self, player_id: PlayerId) -> Result<Account, StoreError> {
        let account_id = self.next_account_id.fetch_add(1, Ordering::SeqCst);
        let account = Account::new(account_id, player_id);
        self.accounts.insert(
            account_id,
            Arc::new(Mutex::new(AccountRow {
                account: account.clone(),
                operations: Vec::new(),
            })),
        );
        Ok(account)
    }

    fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, StoreError> {
        let Some(row) = self.row(account_id) else {
            return Ok(None);
        };
        let row = Self::lock(&row)?;
        Ok(Some(row.account.clone()))
    }

    fn list_by_player(&self, player_id: PlayerId) -> Result<Vec<Account>, StoreError> {
        let rows: Vec<SharedRow> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut accounts = Vec::new();
        for row in &rows {
            let row = Self::lock(row)?;
            if row.account.is_owned_by(player_id) {
                accounts.push(row.account.clone());
            }
        }
        accounts.sort_by_key(|account| account.account_id);
        Ok(accounts)
    }

    fn compare_and_set_balance(
        &self,
        account_id: AccountId,
        expected: Decimal,
        new_balance: Decimal,
    ) -> Result<bool, StoreError> {
        let Some(row) = self.row(account_id) else {
            return Ok(false);
        };
        let mut row = Self::lock(&row)?;
        if row.account.balance != expected {
            return Ok(false);
        }
        row.account.balance = new_balance;
        Ok(true)
    }
}

impl OperationLedger for MemoryStore {
    fn append(&self, draft: OperationDraft) -> Result<Operation, StoreError> {
        let row = self.row(draft.account_id).ok_or_else(|| {
            StoreError::unavailable(format!(
                "operation references unknown account {}",
                draft.account_id
            ))
        })?;
        let mut row = Self::lock(&row)?;
        Ok(self.record(&mut row, draft))
    }

    fn find_operation(
        &self,
        operation_id: OperationId,
        player_id: PlayerId,
    ) -> Result<Option<Operation>, StoreError> {
        Ok(self
            .operations
            .get(&operation_id)
            .filter(|op| op.player_id == player_id)
            .map(|op| op.value().clone()))
    }

    fn list_by_account(
        &self,
        account_id: AccountId,
        player_id: PlayerId,
    ) -> Result<Vec<Operation>, StoreError> {
        let Some(row) = self.row(account_id) else {
            return Ok(Vec::new());
        };
        let row = Self::lock(&row)?;

        Ok(row
            .operations
            .iter()
            .rev()
            .filter_map(|id| self.operations.get(id).map(|op| op.value().clone()))
            .filter(|op| op.player_id == player_id)
            .collect())
    }
}

impl LedgerStore for MemoryStore {
    fn commit(
        &self,
        expected: Decimal,
        new_balance: Decimal,
        draft: OperationDraft,
    ) -> Result<Option<Operation>, StoreError> {
        let Some(row) = self.row(draft.account_id) else {
            return Ok(None);
        };
        let mut row = Self::lock(&row)?;

        if row.account.balance != expected {
            return Ok(None);
        }

        let operation = self.record(&mut row, draft);
        row.account.balance = new_balance;
        Ok(Some(operation))
    }
}
