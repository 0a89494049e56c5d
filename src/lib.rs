//! Player Ledger Library
//! # Overview
//!
//! This library provides a ledger of player-owned accounts: balances change
//! only through recorded credit and debit operations, only the owning player
//! may touch an account, and concurrent requests can never overdraw it. A
//! CSV command shell with a sync and an async strategy drives it.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Operation, commands, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::traits`] - Account store and operation ledger contracts
//!   - [`core::memory_store`] - Thread-safe in-memory store
//!   - [`core::engine`] - Credit/debit orchestration and ownership rules
//!   - [`core::player_directory`] - Player name resolution
//!   - [`core::processor`] - Per-command request shell with auditing
//!   - [`core::batch_processor`] - Account-partitioned concurrent batches
//! - [`io`] - CSV input and output
//! - [`strategy`] - Sync and async processing pipelines
//! - [`logging`] - tracing subscriber setup
//!
//! # Commands
//!
//! - **open**: Open an account for the player and bind it to a label
//! - **credit**: Add a positive amount to the player's account
//! - **debit**: Remove a positive amount, never below zero
//! - **balance**: Read the account
//! - **history**: Read the account's operations, newest first
//!
//! # Invariants
//!
//! For every account, at all times:
//! - `balance >= 0`
//! - `balance` equals the sum of its credits minus the sum of its debits

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use crate::core::{CommandProcessor, LedgerEngine, LedgerStore, MemoryStore, PlayerDirectory};
pub use io::{write_accounts_csv, write_audit_csv};
pub use types::{
    Account, AccountId, CommandError, LedgerError, Operation, OperationId, OperationType,
    PlayerId, StoreError,
};
