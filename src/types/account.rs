//! Account-related types for the player ledger
//!
//! This module defines the Account structure and the identifier aliases
//! shared by every other component.

use rust_decimal::Decimal;

/// Player identifier
///
/// Opaque to the ledger; issued by the player directory.
pub type PlayerId = u64;

/// Account identifier
///
/// Generated by the account store, unique and increasing.
pub type AccountId = u64;

/// Player account state
///
/// An account belongs to exactly one player for its whole life. The
/// balance is the only mutable field and only the ledger engine changes it,
/// through credits and debits that are recorded as operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Store-generated account ID
    pub account_id: AccountId,

    /// Owning player
    ///
    /// Used for ownership checks only. Never changes after creation.
    pub player_id: PlayerId,

    /// Current balance
    ///
    /// Always non-negative, and always equal to the sum of credit
    /// operations minus the sum of debit operations on this account.
    pub balance: Decimal,
}

impl Account {
    /// Create a new account with a zero balance
    ///
    /// # Arguments
    ///
    /// * `account_id` - The ID allocated by the store
    /// * `player_id` - The owning player
    pub fn new(account_id: AccountId, player_id: PlayerId) -> Self {
        Account {
            account_id,
            player_id,
            balance: Decimal::ZERO,
        }
    }

    /// Whether `player_id` owns this account
    pub fn is_owned_by(&self, player_id: PlayerId) -> bool {
        self.player_id == player_id
    }
}
