//! Audit trail for the request shell
//!
//! One `AuditAction` is appended per attempted command, whatever its
//! outcome. The ledger engine never touches the audit log: the shell
//! inspects the engine's result and appends the entry itself.

use crate::types::{CommandError, CommandType};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// How an audited command ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    Success,

    /// Failure with the error's stable kind code
    Failure(&'static str),
}

impl AuditOutcome {
    /// Build the outcome for a command result
    pub fn from_result<T>(result: &Result<T, CommandError>) -> Self {
        match result {
            Ok(_) => AuditOutcome::Success,
            Err(error) => AuditOutcome::Failure(error.kind()),
        }
    }

    /// `ok` or the failure kind
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "ok",
            AuditOutcome::Failure(kind) => *kind,
        }
    }
}

/// One audited command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditAction {
    /// Input position of the command
    pub seq: u64,

    /// Name of the requesting player
    pub player: String,

    pub action: CommandType,

    pub outcome: AuditOutcome,
}

/// Append-only, thread-safe audit log
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: DashMap<u64, AuditAction>,
    next_entry: AtomicU64,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn record(&self, action: AuditAction) {
        let key = self.next_entry.fetch_add(1, Ordering::SeqCst);
        self.entries.insert(key, action);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries ordered by input position
    ///
    /// Entries appended concurrently are ordered by `seq`, not by the
    /// order in which they were recorded.
    pub fn entries(&self) -> Vec<AuditAction> {
        let mut entries: Vec<(u64, AuditAction)> = self
            .entries
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_by_key(|(key, action)| (action.seq, *key));
        entries.into_iter().map(|(_, action)| action).collect()
    }
}
