//! CSV format handling for command records, account output and the audit trail
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to command records
//! - Account summary and audit trail serialization
//!
//! All functions are pure (no I/O beyond the given writer) for easy testing.

use crate::core::{AccountSummary, AuditAction};
use crate::types::{CommandRecord, CommandType};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, player, account, amount.
/// The amount field is optional because open/balance/history commands
/// don't carry one.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub command: String,
    pub player: String,
    pub account: String,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a CommandRecord
///
/// This function:
/// - Parses the command type case-insensitively
/// - Rejects blank player names and blank account labels
/// - Rejects credit/debit rows without an amount
/// - Drops any amount given to other command types
///
/// The amount text itself is not validated here; the ledger rejects it
/// with an audited `amount_invalid` outcome.
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
/// * `seq` - Input position assigned to the command
///
/// # Returns
///
/// * `Ok(CommandRecord)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord, seq: u64) -> Result<CommandRecord, String> {
    let command = match csv_record.command.trim().to_lowercase().as_str() {
        "open" => CommandType::Open,
        "credit" => CommandType::Credit,
        "debit" => CommandType::Debit,
        "balance" => CommandType::Balance,
        "history" => CommandType::History,
        _ => {
            return Err(format!(
                "Invalid command type '{}' for account '{}'",
                csv_record.command, csv_record.account
            ))
        }
    };

    let player = csv_record.player.trim();
    if player.is_empty() {
        return Err(format!("{} command is missing a player", command.as_str()));
    }

    let account = csv_record.account.trim();
    if account.is_empty() {
        return Err(format!(
            "{} command for player '{}' is missing an account",
            command.as_str(),
            player
        ));
    }

    let amount = csv_record
        .amount
        .map(|amount| amount.trim().to_string())
        .filter(|amount| !amount.is_empty());

    let amount = if command.requires_amount() {
        if amount.is_none() {
            return Err(format!(
                "{} command for account '{}' requires an amount",
                command.as_str(),
                account
            ));
        }
        amount
    } else {
        None
    };

    Ok(CommandRecord {
        seq,
        command,
        player: player.to_string(),
        account: account.to_string(),
        amount,
    })
}

/// Write account summaries to CSV format
///
/// Writes one row per account with columns: account, player, balance, operations.
/// Rows are sorted by account label for deterministic output. Balances use
/// the decimal's own formatting, so scale is preserved exactly.
///
/// # Arguments
///
/// * `accounts` - Slice of account summaries to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(
    accounts: &[AccountSummary],
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["account", "player", "balance", "operations"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted: Vec<&AccountSummary> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.label.cmp(&b.label));

    for summary in sorted {
        writer
            .write_record(&[
                summary.label.clone(),
                summary.player.clone(),
                summary.account.balance.to_string(),
                summary.operations.to_string(),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write the audit trail to CSV format
///
/// Columns: seq, player, action, outcome. Entries are written in `seq` order.
pub fn write_audit_csv(entries: &[AuditAction], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["seq", "player", "action", "outcome"])
        .map_err(|e| format!("Failed to write audit header: {}", e))?;

    let mut sorted: Vec<&AuditAction> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.seq);

    for entry in sorted {
        writer
            .write_record([
                entry.seq.to_string().as_str(),
                entry.player.as_str(),
                entry.action.as_str(),
                entry.outcome.as_str(),
            ])
            .map_err(|e| format!("Failed to write audit record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush audit output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AuditOutcome;
    use crate::types::Account;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn csv_record(command: &str, player: &str, account: &str, amount: Option<&str>) -> CsvRecord {
        CsvRecord {
            command: command.to_string(),
            player: player.to_string(),
            account: account.to_string(),
            amount: amount.map(|s| s.to_string()),
        }
    }

    fn summary(label: &str, player: &str, balance: Decimal, operations: usize) -> AccountSummary {
        let mut account = Account::new(1, 1);
        account.balance = balance;
        AccountSummary {
            label: label.to_string(),
            player: player.to_string(),
            account,
            operations,
        }
    }

    #[rstest]
    #[case("credit", CommandType::Credit, Some("100.0"))]
    #[case("debit", CommandType::Debit, Some("50.0"))]
    #[case("CREDIT", CommandType::Credit, Some("100.0"))] // case insensitive
    #[case("Debit", CommandType::Debit, Some("abc"))] // amount text checked later
    fn test_convert_csv_record_valid_with_amount(
        #[case] command: &str,
        #[case] expected_type: CommandType,
        #[case] amount: Option<&str>,
    ) {
        let record = convert_csv_record(csv_record(command, "alice", "main", amount), 7).unwrap();

        assert_eq!(record.command, expected_type);
        assert_eq!(record.seq, 7);
        assert_eq!(record.player, "alice");
        assert_eq!(record.account, "main");
        assert_eq!(record.amount.as_deref(), amount);
    }

    #[rstest]
    #[case("open", CommandType::Open)]
    #[case("balance", CommandType::Balance)]
    #[case("HISTORY", CommandType::History)]
    fn test_convert_csv_record_drops_amount(
        #[case] command: &str,
        #[case] expected_type: CommandType,
    ) {
        let record =
            convert_csv_record(csv_record(command, "alice", "main", Some("5")), 1).unwrap();

        assert_eq!(record.command, expected_type);
        assert_eq!(record.amount, None);
    }

    #[rstest]
    #[case::invalid_type("transfer", "alice", "main", Some("1"), "Invalid command type")]
    #[case::credit_missing_amount("credit", "alice", "main", None, "requires an amount")]
    #[case::debit_missing_amount("debit", "alice", "main", None, "requires an amount")]
    #[case::blank_amount("credit", "alice", "main", Some("   "), "requires an amount")]
    #[case::blank_player("open", "  ", "main", None, "missing a player")]
    #[case::blank_account("open", "alice", "", None, "missing an account")]
    fn test_convert_csv_record_errors(
        #[case] command: &str,
        #[case] player: &str,
        #[case] account: &str,
        #[case] amount: Option<&str>,
        #[case] expected_error: &str,
    ) {
        let result = convert_csv_record(csv_record(command, player, account, amount), 1);

        assert!(result.unwrap_err().contains(expected_error));
    }

    #[test]
    fn test_convert_csv_record_trims_fields() {
        let record =
            convert_csv_record(csv_record(" credit ", " alice ", " main ", Some(" 1.50 ")), 1)
                .unwrap();

        assert_eq!(record.player, "alice");
        assert_eq!(record.account, "main");
        assert_eq!(record.amount.as_deref(), Some("1.50"));
    }

    #[rstest]
    #[case::empty(vec![], "account,player,balance,operations\n")]
    #[case::keeps_scale(
        vec![summary("main", "alice", Decimal::new(3000, 2), 2)],
        "account,player,balance,operations\nmain,alice,30.00,2\n"
    )]
    #[case::fresh_account(
        vec![summary("main", "alice", Decimal::ZERO, 0)],
        "account,player,balance,operations\nmain,alice,0,0\n"
    )]
    #[case::sorted_by_label(
        vec![
            summary("zeta", "bob", Decimal::new(5, 1), 1),
            summary("alpha", "alice", Decimal::new(12345, 4), 3),
        ],
        "account,player,balance,operations\nalpha,alice,1.2345,3\nzeta,bob,0.5,1\n"
    )]
    fn test_write_accounts_csv(#[case] accounts: Vec<AccountSummary>, #[case] expected: &str) {
        let mut output = Vec::new();

        write_accounts_csv(&accounts, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_audit_csv_sorted_by_seq() {
        let entries = vec![
            AuditAction {
                seq: 2,
                player: "bob".to_string(),
                action: CommandType::Debit,
                outcome: AuditOutcome::Failure("account_not_owned"),
            },
            AuditAction {
                seq: 1,
                player: "alice".to_string(),
                action: CommandType::Open,
                outcome: AuditOutcome::Success,
            },
        ];
        let mut output = Vec::new();

        write_audit_csv(&entries, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "seq,player,action,outcome\n1,alice,open,ok\n2,bob,debit,account_not_owned\n"
        );
    }
}
