//! Ledger engine
//!
//! This module provides the `LedgerEngine` that orchestrates account
//! operations by coordinating a [`LedgerStore`].
//!
//! The engine enforces business rules such as:
//! - Amounts must be strictly positive
//! - Only the owning player may read or mutate an account
//! - A debit never makes a balance negative
//! - A balance change and its operation are committed together
//!
//! # Concurrency
//!
//! The engine holds no mutable state and is shared freely between workers.
//! Mutations are optimistic: the engine reads the account, validates,
//! computes the new balance and asks the store to commit only if the
//! balance is still the one it read. On a mismatch it starts over from the
//! read, up to `max_attempts` times, then reports `Conflict`. Two debits
//! racing for the same funds therefore cannot both succeed: the loser
//! re-reads the reduced balance and fails validation.
//!
//! A commit is one synchronous store call, so there is no await point
//! inside it for a cancelled caller to interrupt.

use crate::core::traits::LedgerStore;
use crate::types::{
    ensure_positive, Account, AccountId, LedgerError, Operation, OperationDraft, OperationId,
    OperationType, PlayerId,
};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Default number of optimistic commit attempts per mutation
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Commit attempts per credit/debit before giving up with `Conflict`
    pub max_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    /// Create a config, falling back to the default for a zero attempt count
    pub fn new(max_attempts: u32) -> Self {
        if max_attempts == 0 {
            tracing::warn!(
                max_attempts,
                default = DEFAULT_MAX_ATTEMPTS,
                "invalid max_attempts, using default"
            );
            return Self::default();
        }
        Self { max_attempts }
    }
}

/// Account ledger engine
///
/// Implements opening accounts, credits, debits and the owner-only read
/// operations on top of any [`LedgerStore`].
#[derive(Debug)]
pub struct LedgerEngine<S> {
    store: Arc<S>,
    config: EngineConfig,
}

impl<S> Clone for LedgerEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Create an engine with the default configuration
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration
    pub fn with_config(store: Arc<S>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Open a new account with a zero balance owned by `player_id`
    ///
    /// # Errors
    ///
    /// Only `StorageUnavailable`.
    pub fn open_account(&self, player_id: PlayerId) -> Result<Account, LedgerError> {
        let account = self.store.save(player_id)?;
        tracing::debug!(account = account.account_id, player = player_id, "account opened");
        Ok(account)
    }

    /// Credit `amount` to an account owned by `player_id`
    ///
    /// # Returns
    ///
    /// The recorded CREDIT operation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is not strictly positive (`AmountInvalid`)
    /// - the account does not exist (`AccountNotFound`)
    /// - the caller does not own it (`AccountNotOwned`)
    /// - the balance would overflow (`ArithmeticOverflow`)
    /// - concurrent writers won every attempt (`Conflict`)
    /// - the store failed (`StorageUnavailable`)
    pub fn credit(
        &self,
        account_id: AccountId,
        player_id: PlayerId,
        amount: Decimal,
    ) -> Result<Operation, LedgerError> {
        self.apply(account_id, player_id, amount, OperationType::Credit)
    }

    /// Debit `amount` from an account owned by `player_id`
    ///
    /// Same rules as [`LedgerEngine::credit`], and additionally fails with
    /// `InsufficientFunds` when the balance does not cover `amount`. A failed
    /// debit changes nothing.
    pub fn debit(
        &self,
        account_id: AccountId,
        player_id: PlayerId,
        amount: Decimal,
    ) -> Result<Operation, LedgerError> {
        self.apply(account_id, player_id, amount, OperationType::Debit)
    }

    /// Read an account owned by `player_id`
    pub fn get_account(
        &self,
        account_id: AccountId,
        player_id: PlayerId,
    ) -> Result<Account, LedgerError> {
        self.load_owned(account_id, player_id)
    }

    /// All accounts owned by `player_id`, ordered by account ID
    pub fn list_accounts(&self, player_id: PlayerId) -> Result<Vec<Account>, LedgerError> {
        Ok(self.store.list_by_player(player_id)?)
    }

    /// Operations on an account owned by `player_id`, newest first
    ///
    /// An account without operations yields an empty list.
    pub fn list_operations(
        &self,
        account_id: AccountId,
        player_id: PlayerId,
    ) -> Result<Vec<Operation>, LedgerError> {
        self.load_owned(account_id, player_id)?;
        Ok(self.store.list_by_account(account_id, player_id)?)
    }

    /// Read a single operation recorded by `player_id`
    ///
    /// Operations of other players are reported as not found. The stored
    /// player must also still own the operation's account.
    pub fn get_operation(
        &self,
        operation_id: OperationId,
        player_id: PlayerId,
    ) -> Result<Operation, LedgerError> {
        let operation = self
            .store
            .find_operation(operation_id, player_id)?
            .ok_or_else(|| LedgerError::operation_not_found(operation_id))?;

        let owned = self
            .store
            .find_by_id(operation.account_id)?
            .is_some_and(|account| account.is_owned_by(player_id));
        if !owned {
            tracing::error!(
                operation = operation_id,
                account = operation.account_id,
                player = player_id,
                "operation owner disagrees with account owner"
            );
            return Err(LedgerError::operation_not_found(operation_id));
        }

        Ok(operation)
    }

    /// Load an account and check that `player_id` owns it
    fn load_owned(
        &self,
        account_id: AccountId,
        player_id: PlayerId,
    ) -> Result<Account, LedgerError> {
        let account = self
            .store
            .find_by_id(account_id)?
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;

        if !account.is_owned_by(player_id) {
            return Err(LedgerError::account_not_owned(account_id, player_id));
        }

        Ok(account)
    }

    /// Validate and commit one credit or debit, retrying on concurrent change
    fn apply(
        &self,
        account_id: AccountId,
        player_id: PlayerId,
        amount: Decimal,
        op_type: OperationType,
    ) -> Result<Operation, LedgerError> {
        let amount = ensure_positive(amount)?;

        for attempt in 1..=self.config.max_attempts {
            let account = self.load_owned(account_id, player_id)?;
            let new_balance = next_balance(&account, amount, op_type)?;

            let draft = OperationDraft {
                player_id,
                account_id,
                op_type,
                amount,
            };

            if let Some(operation) = self.store.commit(account.balance, new_balance, draft)? {
                tracing::debug!(
                    account = account_id,
                    operation = operation.operation_id,
                    op_type = op_type.as_str(),
                    %amount,
                    balance = %new_balance,
                    "operation committed"
                );
                return Ok(operation);
            }

            tracing::debug!(
                account = account_id,
                attempt,
                "balance changed concurrently, retrying"
            );
        }

        Err(LedgerError::conflict(account_id, self.config.max_attempts))
    }
}

/// Balance after applying `amount`, or the reason it cannot be applied
fn next_balance(
    account: &Account,
    amount: Decimal,
    op_type: OperationType,
) -> Result<Decimal, LedgerError> {
    match op_type {
        OperationType::Credit => account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(account.account_id)),
        OperationType::Debit => {
            if account.balance < amount {
                return Err(LedgerError::insufficient_funds(
                    account.account_id,
                    account.balance,
                    amount,
                ));
            }
            account
                .balance
                .checked_sub(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow(account.account_id))
        }
    }
}
