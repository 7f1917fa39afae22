//! Map document: the static layout of a world.

use std::collections::{BTreeMap, BTreeSet};

use adventure_core::{MonsterId, MonsterInfo, RoomId, RoomInfo, Thing, ThingId};
use serde::{Deserialize, Serialize};

/// A room definition as written in a map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub id: RoomId,
    /// Short label used in logs; players only ever see the description.
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub directions: BTreeMap<String, RoomId>,
}

impl RoomSpec {
    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            description: self.description.clone(),
            directions: self.directions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThingSpec {
    pub id: ThingId,
    pub name: String,
    pub category: String,
    pub found_in: RoomId,
}

impl ThingSpec {
    pub fn thing(&self) -> Thing {
        Thing::new(self.id, self.name.clone(), self.category.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSpec {
    pub id: MonsterId,
    pub name: String,
    #[serde(default)]
    pub killed_by: Vec<ThingId>,
    pub found_in: RoomId,
}

impl MonsterSpec {
    pub fn info(&self) -> MonsterInfo {
        MonsterInfo::new(self.id, self.name.clone()).with_killed_by(self.killed_by.iter().copied())
    }
}

/// Complete map file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDocument {
    pub rooms: Vec<RoomSpec>,
    #[serde(default)]
    pub things: Vec<ThingSpec>,
    #[serde(default)]
    pub monsters: Vec<MonsterSpec>,
}

impl MapDocument {
    pub fn room(&self, id: RoomId) -> Option<&RoomSpec> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Lists every dangling reference and duplicate id in the document.
    ///
    /// An empty list means the map can be loaded into a world.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let mut rooms = BTreeSet::new();
        for room in &self.rooms {
            if !rooms.insert(room.id) {
                problems.push(format!("duplicate room id {}", room.id.get()));
            }
        }

        for room in &self.rooms {
            for (direction, target) in &room.directions {
                if !rooms.contains(target) {
                    problems.push(format!(
                        "room {} exit '{}' leads to undefined room {}",
                        room.id.get(),
                        direction,
                        target.get()
                    ));
                }
            }
        }

        let mut things = BTreeSet::new();
        for thing in &self.things {
            if !things.insert(thing.id) {
                problems.push(format!("duplicate thing id {}", thing.id.get()));
            }
            if !rooms.contains(&thing.found_in) {
                problems.push(format!(
                    "thing '{}' is placed in undefined room {}",
                    thing.name,
                    thing.found_in.get()
                ));
            }
        }

        let mut monsters = BTreeSet::new();
        for monster in &self.monsters {
            if !monsters.insert(monster.id) {
                problems.push(format!("duplicate monster id {}", monster.id.get()));
            }
            if !rooms.contains(&monster.found_in) {
                problems.push(format!(
                    "monster '{}' is placed in undefined room {}",
                    monster.name,
                    monster.found_in.get()
                ));
            }
            for tag in &monster.killed_by {
                if !things.contains(tag) {
                    problems.push(format!(
                        "monster '{}' is killed by undefined thing {}",
                        monster.name,
                        tag.get()
                    ));
                }
            }
        }

        problems
    }
}
