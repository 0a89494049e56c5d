//! Player identity as seen by the ledger

use super::account::PlayerId;

/// A registered player
///
/// Created once by the player directory and immutable afterwards.
/// Credentials live with the authentication layer, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub player_id: PlayerId,

    /// Unique display name
    pub name: String,
}
