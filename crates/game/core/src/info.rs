//! Immutable value records exchanged between actors.
//!
//! None of these are owned by an actor; they are snapshots copied into
//! messages and into actor state.

use std::collections::{BTreeMap, BTreeSet};

use crate::ids::{MonsterId, PlayerKey, RoomId, ThingId};

/// Category tag that lets a thing kill another player.
pub const WEAPON_CATEGORY: &str = "weapon";

/// Public record of a player. Equality is by key only.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerInfo {
    pub key: PlayerKey,
    pub name: String,
}

impl PlayerInfo {
    pub fn new(key: PlayerKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }
}

impl PartialEq for PlayerInfo {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PlayerInfo {}

impl std::hash::Hash for PlayerInfo {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Public record of a monster.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterInfo {
    pub id: MonsterId,
    pub name: String,
    /// Things able to kill this monster, by thing id.
    pub killed_by: BTreeSet<ThingId>,
}

impl MonsterInfo {
    pub fn new(id: MonsterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            killed_by: BTreeSet::new(),
        }
    }

    pub fn with_killed_by(mut self, things: impl IntoIterator<Item = ThingId>) -> Self {
        self.killed_by.extend(things);
        self
    }

    pub fn is_killed_by(&self, thing: &Thing) -> bool {
        self.killed_by.contains(&thing.id)
    }
}

/// An in-world item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thing {
    pub id: ThingId,
    pub name: String,
    pub category: String,
}

impl Thing {
    pub fn new(id: ThingId, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.category == WEAPON_CATEGORY
    }
}

/// Configuration-time description of a room.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomInfo {
    pub description: String,
    /// Direction name → destination room.
    pub directions: BTreeMap<String, RoomId>,
}

impl RoomInfo {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            directions: BTreeMap::new(),
        }
    }

    pub fn with_exit(mut self, direction: impl Into<String>, room: RoomId) -> Self {
        self.directions.insert(direction.into(), room);
        self
    }
}

/// Anything that can stand in a room.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occupant {
    Player(PlayerInfo),
    Monster(MonsterInfo),
}

impl Occupant {
    pub fn name(&self) -> &str {
        match self {
            Occupant::Player(player) => &player.name,
            Occupant::Monster(monster) => &monster.name,
        }
    }

    /// Player key to leave out of a broadcast about this occupant.
    ///
    /// Monsters have no inbox, so nobody is excluded for them.
    pub fn excluded_player(&self) -> Option<PlayerKey> {
        match self {
            Occupant::Player(player) => Some(player.key),
            Occupant::Monster(_) => None,
        }
    }
}

impl From<PlayerInfo> for Occupant {
    fn from(info: PlayerInfo) -> Self {
        Occupant::Player(info)
    }
}

impl From<MonsterInfo> for Occupant {
    fn from(info: MonsterInfo) -> Self {
        Occupant::Monster(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_equality_ignores_name() {
        let key = PlayerKey::new();
        assert_eq!(PlayerInfo::new(key, "Amy"), PlayerInfo::new(key, "Amelia"));
        assert_ne!(
            PlayerInfo::new(key, "Amy"),
            PlayerInfo::new(PlayerKey::new(), "Amy")
        );
    }

    #[test]
    fn monster_kill_tags_match_thing_ids() {
        let sword = Thing::new(ThingId(4), "sword", WEAPON_CATEGORY);
        let apple = Thing::new(ThingId(5), "apple", "food");
        let goblin = MonsterInfo::new(MonsterId(1), "Goblin").with_killed_by([ThingId(4)]);

        assert!(goblin.is_killed_by(&sword));
        assert!(!goblin.is_killed_by(&apple));
        assert!(sword.is_weapon());
        assert!(!apple.is_weapon());
    }
}
