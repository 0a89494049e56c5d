//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Store contracts the engine is written against
//! - `memory_store` - Thread-safe in-memory store implementing them
//! - `engine` - Credit/debit orchestration and ownership rules
//! - `player_directory` - Player name to ID resolution
//! - `audit` - Audit trail written by the request shell
//! - `processor` - Request shell: one command in, one engine call, one audit entry
//! - `batch_processor` - Concurrent, account-partitioned batch execution

pub mod audit;
pub mod batch_processor;
pub mod engine;
pub mod memory_store;
pub mod player_directory;
pub mod processor;
pub mod traits;

pub use audit::{AuditAction, AuditLog, AuditOutcome};
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::{EngineConfig, LedgerEngine, DEFAULT_MAX_ATTEMPTS};
pub use memory_store::MemoryStore;
pub use player_directory::PlayerDirectory;
pub use processor::{AccountSummary, CommandOutcome, CommandProcessor};
pub use traits::{AccountStore, LedgerStore, OperationLedger};
