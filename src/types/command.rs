//! Command types for the request shell
//!
//! A command is one row of input: who is asking, which account label it
//! targets, and what to do with it.

use serde::{Deserialize, Serialize};

/// Commands the request shell understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Open a new account and bind it to the row's label
    Open,

    /// Credit the labelled account
    Credit,

    /// Debit the labelled account
    Debit,

    /// Read the labelled account
    Balance,

    /// Read the labelled account's operations, newest first
    History,
}

impl CommandType {
    /// Lower-case name as written in input and audit rows
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Open => "open",
            CommandType::Credit => "credit",
            CommandType::Debit => "debit",
            CommandType::Balance => "balance",
            CommandType::History => "history",
        }
    }

    /// Whether the command needs an amount column
    pub fn requires_amount(&self) -> bool {
        matches!(self, CommandType::Credit | CommandType::Debit)
    }
}

/// A parsed input command
///
/// The amount is kept as the raw text so that a non-numeric amount is
/// reported by the shell as an invalid amount, like any other bad value.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRecord {
    /// 1-based position of the row in the input
    pub seq: u64,

    pub command: CommandType,

    /// Name of the requesting player
    pub player: String,

    /// Caller-chosen account label
    pub account: String,

    /// Raw amount text (credit and debit only)
    pub amount: Option<String>,
}
