//! Request shell around the ledger engine
//!
//! This module provides the `CommandProcessor`, which turns one input
//! command into one engine call:
//!
//! 1. Resolve the requesting player's name to a `PlayerId`
//! 2. Resolve the account label to an `AccountId` (or bind it, for `open`)
//! 3. Call the engine and keep its typed result
//! 4. Append an audit entry describing the outcome
//!
//! Auditing is a plain call made after the engine returns, so the engine
//! itself has no side effects beyond the store.

use crate::core::audit::{AuditAction, AuditLog, AuditOutcome};
use crate::core::engine::LedgerEngine;
use crate::core::player_directory::PlayerDirectory;
use crate::core::traits::LedgerStore;
use crate::types::{
    parse_amount, Account, AccountId, CommandError, CommandRecord, CommandType, LedgerError,
    Operation, PlayerId,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// What a successful command produced
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Opened(Account),
    Posted(Operation),
    Balance(Account),
    History(Vec<Operation>),
}

/// Final state of one labelled account, for output
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub label: String,
    pub player: String,
    pub account: Account,

    /// Number of operations in the account's ledger
    pub operations: usize,
}

/// Executes commands against a ledger engine and audits each one
#[derive(Debug)]
pub struct CommandProcessor<S> {
    engine: LedgerEngine<S>,
    directory: PlayerDirectory,
    labels: DashMap<String, AccountId>,
    audit: AuditLog,
}

impl<S: LedgerStore> CommandProcessor<S> {
    pub fn new(engine: LedgerEngine<S>) -> Self {
        Self {
            engine,
            directory: PlayerDirectory::new(),
            labels: DashMap::new(),
            audit: AuditLog::new(),
        }
    }

    pub fn engine(&self) -> &LedgerEngine<S> {
        &self.engine
    }

    pub fn directory(&self) -> &PlayerDirectory {
        &self.directory
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Execute one command and record it in the audit log
    ///
    /// Failures are returned as well as audited; a fatal store failure is
    /// logged at error level, any other failure at warn level.
    pub fn process(&self, record: &CommandRecord) -> Result<CommandOutcome, CommandError> {
        let result = self.execute(record);

        self.audit.record(AuditAction {
            seq: record.seq,
            player: record.player.clone(),
            action: record.command,
            outcome: AuditOutcome::from_result(&result),
        });

        match &result {
            Ok(_) => tracing::debug!(
                seq = record.seq,
                player = %record.player,
                command = record.command.as_str(),
                account = %record.account,
                "command applied"
            ),
            Err(error) if error.is_fatal() => tracing::error!(
                seq = record.seq,
                player = %record.player,
                command = record.command.as_str(),
                %error,
                "command failed"
            ),
            Err(error) => tracing::warn!(
                seq = record.seq,
                player = %record.player,
                command = record.command.as_str(),
                account = %record.account,
                %error,
                "command rejected"
            ),
        }

        result
    }

    fn execute(&self, record: &CommandRecord) -> Result<CommandOutcome, CommandError> {
        let player_id = self.directory.resolve_or_register(&record.player);

        match record.command {
            CommandType::Open => self.open(&record.account, player_id),
            CommandType::Credit => {
                let amount = parse_amount(record.amount.as_deref().unwrap_or_default())?;
                let account_id = self.resolve_label(&record.account)?;
                Ok(CommandOutcome::Posted(
                    self.engine.credit(account_id, player_id, amount)?,
                ))
            }
            CommandType::Debit => {
                let amount = parse_amount(record.amount.as_deref().unwrap_or_default())?;
                let account_id = self.resolve_label(&record.account)?;
                Ok(CommandOutcome::Posted(
                    self.engine.debit(account_id, player_id, amount)?,
                ))
            }
            CommandType::Balance => {
                let account_id = self.resolve_label(&record.account)?;
                Ok(CommandOutcome::Balance(
                    self.engine.get_account(account_id, player_id)?,
                ))
            }
            CommandType::History => {
                let account_id = self.resolve_label(&record.account)?;
                Ok(CommandOutcome::History(
                    self.engine.list_operations(account_id, player_id)?,
                ))
            }
        }
    }

    /// Open an account and bind `label` to it
    ///
    /// The label entry stays locked while the account is opened, so two
    /// opens racing for one label cannot both bind it.
    fn open(&self, label: &str, player_id: PlayerId) -> Result<CommandOutcome, CommandError> {
        match self.labels.entry(label.to_string()) {
            Entry::Occupied(_) => Err(CommandError::LabelTaken {
                label: label.to_string(),
            }),
            Entry::Vacant(entry) => {
                let account = self.engine.open_account(player_id)?;
                entry.insert(account.account_id);
                Ok(CommandOutcome::Opened(account))
            }
        }
    }

    fn resolve_label(&self, label: &str) -> Result<AccountId, CommandError> {
        self.labels
            .get(label)
            .map(|id| *id)
            .ok_or_else(|| CommandError::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// Every labelled account with its owner's name, sorted by label
    pub fn summaries(&self) -> Result<Vec<AccountSummary>, LedgerError> {
        let bindings: Vec<(String, AccountId)> = self
            .labels
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        let store = self.engine.store();
        let mut summaries = Vec::with_capacity(bindings.len());
        for (label, account_id) in bindings {
            let account = store
                .find_by_id(account_id)?
                .ok_or_else(|| LedgerError::account_not_found(account_id))?;
            let operations = store
                .list_by_account(account_id, account.player_id)?
                .len();
            let player = self
                .directory
                .find_by_id(account.player_id)
                .map(|player| player.name)
                .unwrap_or_default();

            summaries.push(AccountSummary {
                label,
                player,
                account,
                operations,
            });
        }

        summaries.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory_store::MemoryStore;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn processor() -> CommandProcessor<MemoryStore> {
        CommandProcessor::new(LedgerEngine::new(Arc::new(MemoryStore::new())))
    }

    fn command(
        seq: u64,
        command: CommandType,
        player: &str,
        account: &str,
        amount: Option<&str>,
    ) -> CommandRecord {
        CommandRecord {
            seq,
            command,
            player: player.to_string(),
            account: account.to_string(),
            amount: amount.map(str::to_string),
        }
    }

    #[test]
    fn test_open_credit_debit_history() {
        let processor = processor();

        processor
            .process(&command(1, CommandType::Open, "alice", "main", None))
            .unwrap();
        processor
            .process(&command(2, CommandType::Credit, "alice", "main", Some("50.00")))
            .unwrap();
        processor
            .process(&command(3, CommandType::Debit, "alice", "main", Some("20.00")))
            .unwrap();

        let balance = processor
            .process(&command(4, CommandType::Balance, "alice", "main", None))
            .unwrap();
        match balance {
            CommandOutcome::Balance(account) => assert_eq!(account.balance, Decimal::new(3000, 2)),
            other => panic!("Expected balance, got {:?}", other),
        }

        let history = processor
            .process(&command(5, CommandType::History, "alice", "main", None))
            .unwrap();
        match history {
            CommandOutcome::History(ops) => {
                let amounts: Vec<Decimal> = ops.iter().map(|op| op.amount).collect();
                assert_eq!(amounts, vec![Decimal::new(2000, 2), Decimal::new(5000, 2)]);
            }
            other => panic!("Expected history, got {:?}", other),
        }
    }

    #[test]
    fn test_every_command_is_audited() {
        let processor = processor();

        processor
            .process(&command(1, CommandType::Open, "alice", "main", None))
            .unwrap();
        let _ = processor.process(&command(2, CommandType::Debit, "alice", "main", Some("1")));
        let _ = processor.process(&command(3, CommandType::Credit, "bob", "main", Some("1")));
        let _ = processor.process(&command(4, CommandType::Credit, "alice", "main", Some("abc")));
        let _ = processor.process(&command(5, CommandType::Balance, "alice", "nope", None));
        let _ = processor.process(&command(6, CommandType::Open, "bob", "main", None));

        let outcomes: Vec<&str> = processor
            .audit()
            .entries()
            .iter()
            .map(|entry| entry.outcome.as_str())
            .collect();

        assert_eq!(
            outcomes,
            vec![
                "ok",
                "insufficient_funds",
                "account_not_owned",
                "amount_invalid",
                "account_not_found",
                "label_taken"
            ]
        );
    }

    #[test]
    fn test_missing_amount_is_invalid() {
        let processor = processor();
        processor
            .process(&command(1, CommandType::Open, "alice", "main", None))
            .unwrap();

        let result = processor.process(&command(2, CommandType::Credit, "alice", "main", None));

        assert_eq!(result, Err(LedgerError::amount_invalid("").into()));
    }

    #[test]
    fn test_foreign_credit_leaves_balance_untouched() {
        let processor = processor();
        processor
            .process(&command(1, CommandType::Open, "alice", "main", None))
            .unwrap();
        processor
            .process(&command(2, CommandType::Credit, "alice", "main", Some("10")))
            .unwrap();

        let result =
            processor.process(&command(3, CommandType::Debit, "mallory", "main", Some("10")));

        assert!(matches!(
            result,
            Err(CommandError::Ledger(LedgerError::AccountNotOwned { .. }))
        ));
        let summaries = processor.summaries().unwrap();
        assert_eq!(summaries[0].account.balance, Decimal::TEN);
        assert_eq!(summaries[0].operations, 1);
    }

    #[test]
    fn test_summaries_sorted_by_label() {
        let processor = processor();
        processor
            .process(&command(1, CommandType::Open, "bob", "zeta", None))
            .unwrap();
        processor
            .process(&command(2, CommandType::Open, "alice", "alpha", None))
            .unwrap();

        let summaries = processor.summaries().unwrap();

        let labels: Vec<&str> = summaries.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["alpha", "zeta"]);
        assert_eq!(summaries[0].player, "alice");
        assert_eq!(summaries[1].player, "bob");
        assert_eq!(summaries[0].operations, 0);
    }
}
