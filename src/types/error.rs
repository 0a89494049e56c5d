//! Error types for the player ledger
//!
//! This module defines every error the ledger engine, its stores and the
//! request shell can report.
//!
//! # Error Categories
//!
//! - **Validation Errors**: invalid amount, unknown or foreign account, insufficient funds
//! - **Concurrency Errors**: optimistic retries exhausted
//! - **Storage Errors**: the store is unavailable or timed out (fatal to the request)
//! - **Shell Errors**: account label already bound, player name already registered

use super::account::{AccountId, PlayerId};
use super::operation::OperationId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger engine
///
/// Every variant except `StorageUnavailable` is an expected, recoverable
/// outcome that the caller reports back to the user. `StorageUnavailable`
/// is fatal to the request and is never retried by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Amount is zero, negative, or not a decimal number
    ///
    /// Rejected before any mutation; the user must resubmit.
    #[error("Invalid amount '{amount}': must be a positive decimal")]
    AmountInvalid {
        /// The offending amount as supplied
        amount: String,
    },

    /// No account with this ID exists
    #[error("Account {account} not found")]
    AccountNotFound {
        /// Account ID that was looked up
        account: AccountId,
    },

    /// The caller is not the account's owner
    ///
    /// No state is changed. See [`LedgerError::client_message`] for the
    /// text that may be shown to the caller.
    #[error("Account {account} is not owned by player {player}")]
    AccountNotOwned {
        /// Account ID that was targeted
        account: AccountId,
        /// Player who made the request
        player: PlayerId,
    },

    /// Debit would make the balance negative
    ///
    /// The account and its ledger are left untouched.
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account ID
        account: AccountId,
        /// Balance at the time of the check
        balance: Decimal,
        /// Requested debit amount
        requested: Decimal,
    },

    /// Concurrent modifications kept invalidating the optimistic commit
    ///
    /// The caller should retry the whole request.
    #[error("Account {account} was modified concurrently; gave up after {attempts} attempts")]
    Conflict {
        /// Account ID
        account: AccountId,
        /// Number of commit attempts made
        attempts: u32,
    },

    /// No operation with this ID is visible to the caller
    #[error("Operation {operation} not found")]
    OperationNotFound {
        /// Operation ID that was looked up
        operation: OperationId,
    },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow on account {account}")]
    ArithmeticOverflow {
        /// Account ID
        account: AccountId,
    },

    /// The store failed or timed out
    ///
    /// Fatal to the request. Whether a write committed is unknown unless
    /// the store says so, so the engine never retries it.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        /// Store-provided description
        message: String,
    },
}

impl LedgerError {
    /// Create an AmountInvalid error
    pub fn amount_invalid(amount: impl ToString) -> Self {
        LedgerError::AmountInvalid {
            amount: amount.to_string(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    /// Create an AccountNotOwned error
    pub fn account_not_owned(account: AccountId, player: PlayerId) -> Self {
        LedgerError::AccountNotOwned { account, player }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            balance,
            requested,
        }
    }

    /// Create a Conflict error
    pub fn conflict(account: AccountId, attempts: u32) -> Self {
        LedgerError::Conflict { account, attempts }
    }

    /// Create an OperationNotFound error
    pub fn operation_not_found(operation: OperationId) -> Self {
        LedgerError::OperationNotFound { operation }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow { account }
    }

    /// Whether the error is fatal to the request rather than a validation outcome
    pub fn is_fatal(&self) -> bool {
        matches!(self, LedgerError::StorageUnavailable { .. })
    }

    /// Stable snake_case code, used in audit rows
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::AmountInvalid { .. } => "amount_invalid",
            LedgerError::AccountNotFound { .. } => "account_not_found",
            LedgerError::AccountNotOwned { .. } => "account_not_owned",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
            LedgerError::Conflict { .. } => "conflict",
            LedgerError::OperationNotFound { .. } => "operation_not_found",
            LedgerError::ArithmeticOverflow { .. } => "arithmetic_overflow",
            LedgerError::StorageUnavailable { .. } => "storage_unavailable",
        }
    }

    /// Message that is safe to return to the requesting player
    ///
    /// Not-found and not-owned render identically so that a non-owner
    /// cannot learn which account IDs exist. Storage details are hidden.
    pub fn client_message(&self) -> String {
        match self {
            LedgerError::AccountNotFound { .. } | LedgerError::AccountNotOwned { .. } => {
                "Account not found".to_string()
            }
            LedgerError::OperationNotFound { .. } => "Operation not found".to_string(),
            LedgerError::StorageUnavailable { .. } => "Internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Errors reported by account store and operation ledger implementations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The backing store could not serve the call
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Description of the failure
        message: String,
    },

    /// The backing store did not answer in time
    #[error("store timed out during {operation}")]
    Timeout {
        /// Store call that timed out
        operation: String,
    },
}

impl StoreError {
    /// Create an Unavailable error
    pub fn unavailable(message: impl ToString) -> Self {
        StoreError::Unavailable {
            message: message.to_string(),
        }
    }
}

// Store failures are fatal for the request that hit them
impl From<StoreError> for LedgerError {
    fn from(error: StoreError) -> Self {
        LedgerError::StorageUnavailable {
            message: error.to_string(),
        }
    }
}

/// Errors from the player directory
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectoryError {
    /// Another player already uses this name
    #[error("Player name '{name}' is already registered")]
    NameTaken {
        /// The requested name
        name: String,
    },
}

/// Errors reported by the request shell for one command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// The ledger engine rejected the command
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// `open` named a label that is already bound to an account
    #[error("Account label '{label}' is already in use")]
    LabelTaken {
        /// The requested label
        label: String,
    },

    /// The command named a label that no `open` has bound
    ///
    /// Reported to callers exactly like an unknown account.
    #[error("Account label '{label}' not found")]
    UnknownLabel {
        /// The requested label
        label: String,
    },
}

impl CommandError {
    /// Stable snake_case code, used in audit rows
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::Ledger(error) => error.kind(),
            CommandError::LabelTaken { .. } => "label_taken",
            CommandError::UnknownLabel { .. } => "account_not_found",
        }
    }

    /// Whether the error is fatal to the request
    pub fn is_fatal(&self) -> bool {
        match self {
            CommandError::Ledger(error) => error.is_fatal(),
            CommandError::LabelTaken { .. } | CommandError::UnknownLabel { .. } => false,
        }
    }
}
