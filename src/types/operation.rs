//! Operation-related types for the player ledger
//!
//! An operation is the durable, append-only record of one balance mutation.
//! Operations are never updated or deleted once appended.

use super::account::{AccountId, PlayerId};
use super::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operation identifier
///
/// Generated by the operation ledger; unique and strictly increasing.
pub type OperationId = u64;

/// Kind of balance mutation recorded by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    /// Adds the amount to the balance
    Credit,

    /// Removes the amount from the balance
    ///
    /// Only recorded when the balance covers the amount.
    Debit,
}

impl OperationType {
    /// Upper-case name as used in ledger output
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Credit => "CREDIT",
            OperationType::Debit => "DEBIT",
        }
    }
}

/// An operation that has not been assigned an ID yet
///
/// The engine builds a draft and hands it to the store, which assigns the
/// ID while committing the matching balance change.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDraft {
    pub player_id: PlayerId,
    pub account_id: AccountId,
    pub op_type: OperationType,
    pub amount: Decimal,
}

impl OperationDraft {
    /// Attach the ledger-generated ID, producing the stored operation
    pub fn into_operation(self, operation_id: OperationId) -> Operation {
        Operation {
            operation_id,
            player_id: self.player_id,
            account_id: self.account_id,
            op_type: self.op_type,
            amount: self.amount,
        }
    }
}

/// A stored ledger operation
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Ledger-generated ID
    pub operation_id: OperationId,

    /// Player who performed the operation (always the account owner)
    pub player_id: PlayerId,

    /// Account the operation applies to
    pub account_id: AccountId,

    /// Credit or debit
    pub op_type: OperationType,

    /// Strictly positive amount
    pub amount: Decimal,
}

impl Operation {
    /// The amount with the sign of its effect on the balance
    pub fn signed_amount(&self) -> Decimal {
        match self.op_type {
            OperationType::Credit => self.amount,
            OperationType::Debit => -self.amount,
        }
    }
}

/// Rebuild a balance from its operation history
///
/// Returns the sum of credit amounts minus the sum of debit amounts. For
/// any account this equals the stored balance.
pub fn replay_balance<'a, I>(operations: I) -> Decimal
where
    I: IntoIterator<Item = &'a Operation>,
{
    operations
        .into_iter()
        .fold(Decimal::ZERO, |balance, op| balance + op.signed_amount())
}

/// Parse an amount supplied by a caller
///
/// Accepts any decimal literal that `rust_decimal` can represent exactly.
/// Literals with more fractional digits than fit are rejected rather than
/// rounded, as are scientific notation, empty text, zero and negative values.
/// The error is `AmountInvalid` carrying the text as given.
pub fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    let amount =
        Decimal::from_str_exact(raw.trim()).map_err(|_| LedgerError::amount_invalid(raw))?;
    ensure_positive(amount)
}

/// Reject amounts that are not strictly positive
pub fn ensure_positive(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::amount_invalid(amount));
    }
    Ok(amount)
}
