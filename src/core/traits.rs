//! Store contracts the ledger engine depends on
//!
//! The engine is written against these traits only, so the persistence
//! mechanism can be swapped without touching business rules. Every method
//! takes `&self`: implementations are shared between request workers and
//! must do their own synchronisation.

use crate::types::{
    Account, AccountId, Operation, OperationDraft, OperationId, PlayerId, StoreError,
};
use rust_decimal::Decimal;

/// Durable keyed storage of accounts
pub trait AccountStore: Send + Sync {
    /// Create an account with a zero balance owned by `player_id`
    fn save(&self, player_id: PlayerId) -> Result<Account, StoreError>;

    /// Look up an account by ID
    fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, StoreError>;

    /// All accounts owned by `player_id`, ordered by account ID
    fn list_by_player(&self, player_id: PlayerId) -> Result<Vec<Account>, StoreError>;

    /// Replace the balance only if it still equals `expected`
    ///
    /// Returns `Ok(false)` without writing when the stored balance differs,
    /// or when the account does not exist.
    fn compare_and_set_balance(
        &self,
        account_id: AccountId,
        expected: Decimal,
        new_balance: Decimal,
    ) -> Result<bool, StoreError>;
}

/// Durable append-only storage of operations
pub trait OperationLedger: Send + Sync {
    /// Append an operation, assigning the next operation ID
    fn append(&self, draft: OperationDraft) -> Result<Operation, StoreError>;

    /// Look up an operation, visible only to the player who recorded it
    fn find_operation(
        &self,
        operation_id: OperationId,
        player_id: PlayerId,
    ) -> Result<Option<Operation>, StoreError>;

    /// Operations on an account recorded by `player_id`, newest first
    fn list_by_account(
        &self,
        account_id: AccountId,
        player_id: PlayerId,
    ) -> Result<Vec<Operation>, StoreError>;
}

/// A store holding both accounts and their ledger, able to write both at once
pub trait LedgerStore: AccountStore + OperationLedger {
    /// Apply one balance mutation and record its operation atomically
    ///
    /// Under the account's lock: if the stored balance equals `expected`,
    /// append `draft` and set the balance to `new_balance`, returning the
    /// stored operation. Otherwise change nothing and return `Ok(None)`.
    /// An `Err` means neither effect is visible.
    fn commit(
        &self,
        expected: Decimal,
        new_balance: Decimal,
        draft: OperationDraft,
    ) -> Result<Option<Operation>, StoreError>;
}
