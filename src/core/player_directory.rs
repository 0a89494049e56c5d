//! Player directory
//!
//! Maps unique player names to the opaque `PlayerId`s the ledger works
//! with. The request shell uses it to turn the name on an incoming command
//! into an authenticated player ID before calling the engine.

use crate::types::{DirectoryError, Player, PlayerId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe registry of players
#[derive(Debug)]
pub struct PlayerDirectory {
    /// Name to ID index; its entry lock serialises registration per name
    by_name: DashMap<String, PlayerId>,
    players: DashMap<PlayerId, Player>,
    next_player_id: AtomicU64,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            players: DashMap::new(),
            next_player_id: AtomicU64::new(1),
        }
    }

    /// Register a new player under a unique name
    ///
    /// # Errors
    ///
    /// `NameTaken` if a player with this name already exists.
    pub fn register(&self, name: &str) -> Result<Player, DirectoryError> {
        match self.by_name.entry(name.to_string()) {
            Entry::Occupied(_) => Err(DirectoryError::NameTaken {
                name: name.to_string(),
            }),
            Entry::Vacant(entry) => {
                let player = self.insert_player(name);
                entry.insert(player.player_id);
                Ok(player)
            }
        }
    }

    /// ID for `name`, registering the player on first sight
    ///
    /// Concurrent calls with the same name all get the same ID.
    pub fn resolve_or_register(&self, name: &str) -> PlayerId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        *self
            .by_name
            .entry(name.to_string())
            .or_insert_with(|| self.insert_player(name).player_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<Player> {
        let id = *self.by_name.get(name)?;
        self.find_by_id(id)
    }

    pub fn find_by_id(&self, player_id: PlayerId) -> Option<Player> {
        self.players.get(&player_id).map(|p| p.value().clone())
    }

    fn insert_player(&self, name: &str) -> Player {
        let player = Player {
            player_id: self.next_player_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
        };
        self.players.insert(player.player_id, player.clone());
        tracing::debug!(player = player.player_id, name, "player registered");
        player
    }
}

impl Default for PlayerDirectory {
    fn default() -> Self {
        Self::new()
    }
}
