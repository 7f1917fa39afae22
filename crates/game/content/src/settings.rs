//! World-wide settings that are not part of any single room.

use std::time::Duration;

use adventure_core::RoomId;
use serde::{Deserialize, Serialize};

/// Settings read from `settings.toml`. Every field has a default, so an empty
/// file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Room every new player is placed in.
    pub start_room: RoomId,
    /// Room whose description dead players see.
    pub death_room: RoomId,
    /// Seconds between monster wanderings.
    pub monster_move_interval_secs: u64,
}

impl WorldSettings {
    pub fn monster_move_interval(&self) -> Duration {
        Duration::from_secs(self.monster_move_interval_secs)
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            start_room: RoomId(0),
            death_room: RoomId(-2),
            monster_move_interval_secs: 150,
        }
    }
}
