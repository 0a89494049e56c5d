//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account type and identifier aliases
//! - `operation`: Ledger operations and amount parsing
//! - `player`: Player identity
//! - `command`: Request shell commands
//! - `error`: Error types for the ledger and its shell

pub mod account;
pub mod command;
pub mod error;
pub mod operation;
pub mod player;

pub use account::{Account, AccountId, PlayerId};
pub use command::{CommandRecord, CommandType};
pub use error::{CommandError, DirectoryError, LedgerError, StoreError};
pub use operation::{
    ensure_positive, parse_amount, replay_balance, Operation, OperationDraft, OperationId,
    OperationType,
};
pub use player::Player;
