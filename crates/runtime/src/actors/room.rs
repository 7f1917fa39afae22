//! Room actor: a location in the world graph.
//!
//! A room owns who is present and what lies on its floor, and relays chat and
//! arrivals to its player occupants. It never waits on another actor:
//! broadcasts are `tell`s into player mailboxes.

use std::collections::BTreeMap;

use adventure_core::{
    ActorKey, MonsterInfo, Occupant, PlayerInfo, PlayerKey, RoomId, RoomInfo, Thing, narrative,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::Result;
use crate::events::{Departure, WorldEvent};
use crate::host::{Actor, ActorRef, ActorSystem, Reply, respond};

/// Persisted state of a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomState {
    pub description: String,
    pub players: Vec<PlayerInfo>,
    pub monsters: Vec<MonsterInfo>,
    pub things: Vec<Thing>,
    pub exits: BTreeMap<String, RoomId>,
}

impl RoomState {
    fn remove(&mut self, occupant: &Occupant) {
        match occupant {
            Occupant::Player(player) => self.players.retain(|p| p.key != player.key),
            Occupant::Monster(monster) => self.monsters.retain(|m| m.id != monster.id),
        }
    }

    fn add(&mut self, occupant: Occupant) {
        match occupant {
            Occupant::Player(player) => self.players.push(player),
            Occupant::Monster(monster) => self.monsters.push(monster),
        }
    }

    pub fn has_player(&self, key: PlayerKey) -> bool {
        self.players.iter().any(|p| p.key == key)
    }

    pub fn has_thing(&self, name: &str) -> bool {
        self.things.iter().any(|t| t.name == name)
    }
}

pub enum RoomCommand {
    Enter {
        occupant: Occupant,
        reply: Reply<()>,
    },
    Exit {
        occupant: Occupant,
        reply: Reply<()>,
    },
    ExitDead {
        victim: Occupant,
        killer: Option<PlayerInfo>,
        weapon: Option<Thing>,
        reply: Reply<()>,
    },
    Leave {
        player: PlayerInfo,
        reply: Reply<()>,
    },
    Take {
        thing: Thing,
        reply: Reply<Option<Thing>>,
    },
    Drop {
        thing: Thing,
        reply: Reply<()>,
    },
    Whisper {
        words: String,
        sender: PlayerInfo,
        reply: Reply<()>,
    },
    Shout {
        words: String,
        sender: PlayerInfo,
        reply: Reply<()>,
    },
    SetInfo {
        info: RoomInfo,
        reply: Reply<()>,
    },
    FindThing {
        name: String,
        reply: Reply<Option<Thing>>,
    },
    FindPlayer {
        fragment: String,
        reply: Reply<Option<PlayerInfo>>,
    },
    FindMonster {
        fragment: String,
        reply: Reply<Option<MonsterInfo>>,
    },
    Description {
        asker: PlayerInfo,
        reply: Reply<String>,
    },
    ExitTo {
        direction: String,
        reply: Reply<Option<RoomId>>,
    },
    Snapshot {
        reply: Reply<RoomState>,
    },
}

pub struct RoomActor {
    id: RoomId,
    state: RoomState,
    system: ActorSystem,
}

impl RoomActor {
    pub(crate) fn activate(id: RoomId, system: ActorSystem) -> Result<Self> {
        let state = system
            .storage()
            .load(ActorKey::Room(id))?
            .unwrap_or_default();
        Ok(Self { id, state, system })
    }

    fn persist(&self) -> Result<()> {
        self.system
            .storage()
            .save(ActorKey::Room(self.id), &self.state)?;
        Ok(())
    }

    /// Tells every player occupant except `except`.
    fn broadcast(&self, message: &str, except: Option<PlayerKey>) {
        for player in &self.state.players {
            if Some(player.key) == except {
                continue;
            }
            match self.system.player(player.key) {
                Ok(player) => player.send_message(message),
                Err(e) => warn!(room = %self.id, "cannot reach {}: {}", player.name, e),
            }
        }
    }

    fn publish(&self, event: WorldEvent) {
        self.system.events().publish(event);
    }

    fn enter(&mut self, occupant: Occupant) -> Result<()> {
        self.state.remove(&occupant);
        self.state.add(occupant.clone());
        self.persist()?;

        self.broadcast(&narrative::entered(occupant.name()), occupant.excluded_player());
        self.publish(WorldEvent::Entered {
            room: self.id,
            who: occupant_key(&occupant),
            name: occupant.name().to_string(),
        });
        Ok(())
    }

    fn depart(&mut self, occupant: Occupant, how: Departure) -> Result<()> {
        self.state.remove(&occupant);
        self.persist()?;

        let message = match how {
            Departure::Exit => narrative::left_room(occupant.name()),
            Departure::Leave => narrative::left_game(occupant.name()),
        };
        self.broadcast(&message, occupant.excluded_player());
        self.publish(WorldEvent::Left {
            room: self.id,
            who: occupant_key(&occupant),
            name: occupant.name().to_string(),
            how,
        });
        Ok(())
    }

    fn exit_dead(
        &mut self,
        victim: Occupant,
        killer: Option<PlayerInfo>,
        weapon: Option<Thing>,
    ) -> Result<()> {
        self.state.remove(&victim);
        self.persist()?;

        let killer = killer.map(|k| k.name);
        let weapon = weapon.map(|w| w.name);
        let message = narrative::death(victim.name(), killer.as_deref(), weapon.as_deref());
        self.broadcast(&message, victim.excluded_player());
        self.publish(WorldEvent::Died {
            room: self.id,
            victim: victim.name().to_string(),
            killer,
            weapon,
        });
        Ok(())
    }

    fn take(&mut self, thing: Thing) -> Result<Option<Thing>> {
        let Some(index) = self.state.things.iter().position(|t| t.name == thing.name) else {
            return Ok(None);
        };
        let taken = self.state.things.remove(index);
        self.persist()?;

        self.publish(WorldEvent::ThingTaken {
            room: self.id,
            thing: taken.clone(),
        });
        Ok(Some(taken))
    }

    fn drop_thing(&mut self, thing: Thing) -> Result<()> {
        self.state.things.retain(|t| t.id != thing.id);
        self.state.things.push(thing.clone());
        self.persist()?;

        self.publish(WorldEvent::ThingDropped {
            room: self.id,
            thing,
        });
        Ok(())
    }

    fn whisper(&self, words: String, sender: PlayerInfo) {
        self.broadcast(&narrative::whispers(&sender.name, &words), Some(sender.key));
        self.publish(WorldEvent::Whispered {
            room: self.id,
            sender: sender.name,
            words,
        });
    }

    fn shout(&self, words: String, sender: PlayerInfo) {
        self.broadcast(&narrative::shouts(&sender.name, &words), Some(sender.key));
        self.publish(WorldEvent::Shouted {
            room: self.id,
            sender: sender.name,
            words,
        });
    }

    fn set_info(&mut self, info: RoomInfo) -> Result<()> {
        self.state.description = info.description;
        self.state.exits.extend(info.directions);
        self.persist()
    }

    fn find_player(&self, fragment: &str) -> Option<PlayerInfo> {
        let fragment = fragment.to_lowercase();
        self.state
            .players
            .iter()
            .find(|p| p.name.to_lowercase().contains(&fragment))
            .cloned()
    }

    fn find_monster(&self, fragment: &str) -> Option<MonsterInfo> {
        let fragment = fragment.to_lowercase();
        self.state
            .monsters
            .iter()
            .find(|m| m.name.to_lowercase().contains(&fragment))
            .cloned()
    }

    fn description(&self, asker: &PlayerInfo) -> String {
        let things = self.state.things.iter().map(|t| t.name.as_str());
        let others = self
            .state
            .players
            .iter()
            .filter(|p| p.key != asker.key)
            .map(|p| p.name.as_str())
            .chain(self.state.monsters.iter().map(|m| m.name.as_str()));
        narrative::describe_room(&self.state.description, things, others)
    }
}

fn occupant_key(occupant: &Occupant) -> ActorKey {
    match occupant {
        Occupant::Player(player) => ActorKey::Player(player.key),
        Occupant::Monster(monster) => ActorKey::Monster(monster.id),
    }
}

#[async_trait]
impl Actor for RoomActor {
    type Command = RoomCommand;

    fn key(&self) -> ActorKey {
        ActorKey::Room(self.id)
    }

    async fn handle(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Enter { occupant, reply } => respond(reply, self.enter(occupant)),
            RoomCommand::Exit { occupant, reply } => {
                respond(reply, self.depart(occupant, Departure::Exit))
            }
            RoomCommand::ExitDead {
                victim,
                killer,
                weapon,
                reply,
            } => respond(reply, self.exit_dead(victim, killer, weapon)),
            RoomCommand::Leave { player, reply } => {
                respond(reply, self.depart(player.into(), Departure::Leave))
            }
            RoomCommand::Take { thing, reply } => respond(reply, self.take(thing)),
            RoomCommand::Drop { thing, reply } => respond(reply, self.drop_thing(thing)),
            RoomCommand::Whisper {
                words,
                sender,
                reply,
            } => {
                self.whisper(words, sender);
                respond(reply, Ok(()));
            }
            RoomCommand::Shout {
                words,
                sender,
                reply,
            } => {
                self.shout(words, sender);
                respond(reply, Ok(()));
            }
            RoomCommand::SetInfo { info, reply } => {
                debug!(room = %self.id, exits = info.directions.len(), "room configured");
                respond(reply, self.set_info(info))
            }
            RoomCommand::FindThing { name, reply } => {
                let found = self.state.things.iter().find(|t| t.name == name).cloned();
                respond(reply, Ok(found))
            }
            RoomCommand::FindPlayer { fragment, reply } => {
                respond(reply, Ok(self.find_player(&fragment)))
            }
            RoomCommand::FindMonster { fragment, reply } => {
                respond(reply, Ok(self.find_monster(&fragment)))
            }
            RoomCommand::Description { asker, reply } => {
                respond(reply, Ok(self.description(&asker)))
            }
            RoomCommand::ExitTo { direction, reply } => {
                respond(reply, Ok(self.state.exits.get(&direction).copied()))
            }
            RoomCommand::Snapshot { reply } => respond(reply, Ok(self.state.clone())),
        }
    }
}

/// Typed address of a room.
#[derive(Clone, Debug)]
pub struct RoomRef {
    id: RoomId,
    inner: ActorRef<RoomCommand>,
}

impl RoomRef {
    pub(crate) fn new(id: RoomId, inner: ActorRef<RoomCommand>) -> Self {
        Self { id, inner }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Adds an occupant, replacing any stale entry with the same identity.
    pub async fn enter(&self, occupant: impl Into<Occupant>) -> Result<()> {
        let occupant = occupant.into();
        self.inner
            .call(|reply| RoomCommand::Enter { occupant, reply })
            .await
    }

    pub async fn exit(&self, occupant: impl Into<Occupant>) -> Result<()> {
        let occupant = occupant.into();
        self.inner
            .call(|reply| RoomCommand::Exit { occupant, reply })
            .await
    }

    pub async fn exit_dead(
        &self,
        victim: impl Into<Occupant>,
        killer: Option<PlayerInfo>,
        weapon: Option<Thing>,
    ) -> Result<()> {
        let victim = victim.into();
        self.inner
            .call(|reply| RoomCommand::ExitDead {
                victim,
                killer,
                weapon,
                reply,
            })
            .await
    }

    pub async fn leave(&self, player: PlayerInfo) -> Result<()> {
        self.inner
            .call(|reply| RoomCommand::Leave { player, reply })
            .await
    }

    /// Removes the first thing named like `thing`. `None` when someone else
    /// already took it.
    pub async fn take(&self, thing: Thing) -> Result<Option<Thing>> {
        self.inner
            .call(|reply| RoomCommand::Take { thing, reply })
            .await
    }

    pub async fn drop_thing(&self, thing: Thing) -> Result<()> {
        self.inner
            .call(|reply| RoomCommand::Drop { thing, reply })
            .await
    }

    pub async fn whisper(&self, words: impl Into<String>, sender: PlayerInfo) -> Result<()> {
        let words = words.into();
        self.inner
            .call(|reply| RoomCommand::Whisper {
                words,
                sender,
                reply,
            })
            .await
    }

    pub async fn shout(&self, words: impl Into<String>, sender: PlayerInfo) -> Result<()> {
        let words = words.into();
        self.inner
            .call(|reply| RoomCommand::Shout {
                words,
                sender,
                reply,
            })
            .await
    }

    pub async fn set_info(&self, info: RoomInfo) -> Result<()> {
        self.inner
            .call(|reply| RoomCommand::SetInfo { info, reply })
            .await
    }

    pub async fn find_thing(&self, name: impl Into<String>) -> Result<Option<Thing>> {
        let name = name.into();
        self.inner
            .call(|reply| RoomCommand::FindThing { name, reply })
            .await
    }

    pub async fn find_player(&self, fragment: impl Into<String>) -> Result<Option<PlayerInfo>> {
        let fragment = fragment.into();
        self.inner
            .call(|reply| RoomCommand::FindPlayer { fragment, reply })
            .await
    }

    pub async fn find_monster(&self, fragment: impl Into<String>) -> Result<Option<MonsterInfo>> {
        let fragment = fragment.into();
        self.inner
            .call(|reply| RoomCommand::FindMonster { fragment, reply })
            .await
    }

    pub async fn description(&self, asker: PlayerInfo) -> Result<String> {
        self.inner
            .call(|reply| RoomCommand::Description { asker, reply })
            .await
    }

    pub async fn exit_to(&self, direction: impl Into<String>) -> Result<Option<RoomId>> {
        let direction = direction.into();
        self.inner
            .call(|reply| RoomCommand::ExitTo { direction, reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<RoomState> {
        self.inner
            .call(|reply| RoomCommand::Snapshot { reply })
            .await
    }
}
