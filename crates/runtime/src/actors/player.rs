//! Player actor: one connected participant.
//!
//! Interprets command lines, owns the inventory and the current-room
//! reference, and pushes asynchronous messages to its subscribed observers.

use std::sync::Arc;

use adventure_core::{
    ActorKey, Command, PlayerInfo, PlayerKey, RoomId, Thing, narrative, parse_command,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actors::RoomRef;
use crate::api::{MessageSink, ObserverId, ObserverSet, Result};
use crate::host::{Actor, ActorRef, ActorSystem, Reply, respond};

/// Persisted state of a player. Subscriptions are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub info: PlayerInfo,
    pub room: Option<RoomId>,
    pub things: Vec<Thing>,
    pub killed: bool,
}

impl PlayerState {
    fn new(key: PlayerKey) -> Self {
        Self {
            info: PlayerInfo::new(key, narrative::DEFAULT_PLAYER_NAME),
            room: None,
            things: Vec::new(),
            killed: false,
        }
    }

    fn thing_names(&self) -> impl Iterator<Item = &str> {
        self.things.iter().map(|t| t.name.as_str())
    }
}

pub enum PlayerCommand {
    Play {
        line: String,
        reply: Reply<String>,
    },
    Go {
        direction: String,
        reply: Reply<String>,
    },
    Subscribe {
        sink: Arc<dyn MessageSink>,
        reply: Reply<ObserverId>,
    },
    Unsubscribe {
        id: ObserverId,
        reply: Reply<bool>,
    },
    /// Push `text` to every observer. Rooms send this without a reply slot.
    SendMessage {
        text: String,
        reply: Option<Reply<usize>>,
    },
    SetName {
        name: String,
        reply: Reply<()>,
    },
    Name {
        reply: Reply<String>,
    },
    Room {
        reply: Reply<Option<RoomId>>,
    },
    SetRoom {
        room: RoomId,
        reply: Reply<()>,
    },
    /// Killers send this without a reply slot so two players striking each
    /// other at once never wait on each other's mailbox.
    Die {
        killer: Option<PlayerInfo>,
        weapon: Option<Thing>,
        reply: Option<Reply<()>>,
    },
    Snapshot {
        reply: Reply<PlayerState>,
    },
}

pub struct PlayerActor {
    key: PlayerKey,
    state: PlayerState,
    observers: ObserverSet,
    system: ActorSystem,
}

impl PlayerActor {
    pub(crate) fn activate(key: PlayerKey, system: ActorSystem) -> Result<Self> {
        let state = system
            .storage()
            .load(ActorKey::Player(key))?
            .unwrap_or_else(|| PlayerState::new(key));
        Ok(Self {
            key,
            state,
            observers: ObserverSet::new(),
            system,
        })
    }

    fn persist(&self) -> Result<()> {
        self.system
            .storage()
            .save(ActorKey::Player(self.key), &self.state)?;
        Ok(())
    }

    fn info(&self) -> PlayerInfo {
        self.state.info.clone()
    }

    fn current_room(&self) -> Result<Option<RoomRef>> {
        self.state.room.map(|id| self.system.room(id)).transpose()
    }

    fn send_update_message(&mut self, text: &str) -> usize {
        self.observers.notify(text)
    }

    // ========================================================================
    // Command interpretation
    // ========================================================================

    async fn play(&mut self, line: &str) -> Result<String> {
        let command = parse_command(line);
        debug!(player = %self.state.info.name, ?command, "play");

        if self.state.killed && !command.allowed_when_dead() {
            return self.terminal_description().await;
        }

        match command {
            Command::Look => match self.current_room()? {
                Some(room) => room.description(self.info()).await,
                None => Ok(narrative::NOT_IN_ROOM.to_string()),
            },
            Command::Go(None) => Ok(narrative::GO_WHERE.to_string()),
            Command::Go(Some(direction)) => self.go(&direction).await,
            Command::Kill(None) => Ok(narrative::KILL_WHAT.to_string()),
            Command::Kill(Some(target)) => self.kill(&target).await,
            Command::Drop(name) => self.drop_thing(&name).await,
            Command::Take(name) => self.take(&name).await,
            Command::Inventory => Ok(narrative::inventory(self.state.thing_names())),
            Command::Shout(words) => {
                if let Some(room) = self.current_room()? {
                    room.shout(words.clone(), self.info()).await?;
                }
                Ok(narrative::you_shouted(&words))
            }
            Command::Whisper(words) => {
                if let Some(room) = self.current_room()? {
                    room.whisper(words.clone(), self.info()).await?;
                }
                Ok(narrative::you_whispered(&words))
            }
            Command::Help => Ok(narrative::HELP.to_string()),
            Command::End => {
                self.leave().await?;
                Ok(String::new())
            }
            Command::Unknown => Ok(narrative::DONT_UNDERSTAND.to_string()),
        }
    }

    /// What a dead player sees: the place of no return.
    async fn terminal_description(&self) -> Result<String> {
        let room = self.system.room(self.system.config().death_room)?;
        room.description(self.info()).await
    }

    async fn go(&mut self, direction: &str) -> Result<String> {
        let Some(origin) = self.current_room()? else {
            return Ok(narrative::NOT_IN_ROOM.to_string());
        };

        let mut response = match origin.exit_to(direction).await? {
            Some(target) => {
                let destination = self.system.room(target)?;
                origin.exit(self.info()).await?;
                destination.enter(self.info()).await?;

                self.state.room = Some(target);
                self.persist()?;

                destination.description(self.info()).await?
            }
            None => narrative::CANNOT_GO.to_string(),
        };

        let holding = narrative::holding(self.state.thing_names());
        if !holding.is_empty() {
            if !response.ends_with('\n') {
                response.push('\n');
            }
            response.push_str(&holding);
        }
        Ok(response)
    }

    async fn kill(&mut self, target: &str) -> Result<String> {
        if self.state.things.is_empty() {
            return Ok(narrative::BARE_HANDS.to_string());
        }
        let Some(room) = self.current_room()? else {
            return Ok(narrative::NOT_IN_ROOM.to_string());
        };

        if let Some(victim) = room.find_player(target).await? {
            if victim.key == self.key {
                return Ok(narrative::KILL_YOURSELF.to_string());
            }
            let Some(weapon) = self.state.things.iter().find(|t| t.is_weapon()).cloned() else {
                return Ok(narrative::BARE_HANDS.to_string());
            };

            info!(killer = %self.state.info.name, victim = %victim.name, weapon = %weapon.name, "player killed");
            self.system
                .player(victim.key)?
                .die_later(Some(self.info()), Some(weapon));
            return Ok(narrative::now_dead(target));
        }

        if let Some(monster) = room.find_monster(target).await? {
            let usable: Vec<&Thing> = self
                .state
                .things
                .iter()
                .filter(|t| monster.is_killed_by(t))
                .collect();
            let Some(weapon) = usable
                .iter()
                .find(|t| t.is_weapon())
                .or_else(|| usable.first())
                .map(|t| (*t).clone())
            else {
                return Ok(narrative::BARE_HANDS.to_string());
            };

            return self
                .system
                .monster(monster.id)?
                .kill(room.id(), Some(self.info()), Some(weapon))
                .await;
        }

        Ok(narrative::cannot_see(target))
    }

    async fn take(&mut self, name: &str) -> Result<String> {
        let Some(room) = self.current_room()? else {
            return Ok(narrative::NOT_IN_ROOM.to_string());
        };
        let Some(thing) = room.find_thing(name).await? else {
            return Ok(narrative::DONT_UNDERSTAND.to_string());
        };
        // Someone else may have taken it between the lookup and now.
        let Some(taken) = room.take(thing).await? else {
            return Ok(narrative::DONT_UNDERSTAND.to_string());
        };

        self.state.things.push(taken);
        self.persist()?;
        Ok(narrative::OKAY.to_string())
    }

    async fn drop_thing(&mut self, name: &str) -> Result<String> {
        let Some(index) = self.state.things.iter().position(|t| t.name == name) else {
            return Ok(narrative::DONT_UNDERSTAND.to_string());
        };
        let Some(room) = self.current_room()? else {
            return Ok(narrative::NOT_IN_ROOM.to_string());
        };

        room.drop_thing(self.state.things[index].clone()).await?;
        self.state.things.remove(index);
        self.persist()?;
        Ok(narrative::OKAY.to_string())
    }

    /// Puts every carried thing on the floor of the current room. Without a
    /// room there is no floor and the inventory is kept.
    async fn drop_all(&mut self) -> Result<()> {
        let Some(room) = self.current_room()? else {
            return Ok(());
        };
        while let Some(thing) = self.state.things.first().cloned() {
            room.drop_thing(thing).await?;
            self.state.things.remove(0);
        }
        self.persist()
    }

    async fn leave(&mut self) -> Result<()> {
        self.drop_all().await?;
        if let Some(room) = self.current_room()? {
            room.leave(self.info()).await?;
        }
        self.state.room = None;
        self.persist()?;
        info!(player = %self.state.info.name, "left the game");
        Ok(())
    }

    async fn die(&mut self, killer: Option<PlayerInfo>, weapon: Option<Thing>) -> Result<()> {
        self.drop_all().await?;
        if let Some(room) = self.current_room()? {
            room.exit_dead(self.info(), killer.clone(), weapon).await?;
        }
        self.state.room = None;
        self.state.killed = true;
        self.persist()?;

        let notice = narrative::killed_notice(killer.as_ref().map(|k| k.name.as_str()));
        self.send_update_message(&notice);
        Ok(())
    }

    async fn set_room(&mut self, room: RoomId) -> Result<()> {
        self.state.room = Some(room);
        self.system.room(room)?.enter(self.info()).await?;
        self.persist()
    }
}

#[async_trait]
impl Actor for PlayerActor {
    type Command = PlayerCommand;

    fn key(&self) -> ActorKey {
        ActorKey::Player(self.key)
    }

    async fn handle(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Play { line, reply } => {
                let result = self.play(&line).await;
                respond(reply, result);
            }
            PlayerCommand::Go { direction, reply } => {
                let result = self.go(&direction).await;
                respond(reply, result);
            }
            PlayerCommand::Subscribe { sink, reply } => {
                respond(reply, Ok(self.observers.subscribe(sink)));
            }
            PlayerCommand::Unsubscribe { id, reply } => {
                respond(reply, Ok(self.observers.unsubscribe(id)));
            }
            PlayerCommand::SendMessage { text, reply } => {
                let delivered = self.send_update_message(&text);
                if let Some(reply) = reply {
                    respond(reply, Ok(delivered));
                }
            }
            PlayerCommand::SetName { name, reply } => {
                self.state.info.name = name;
                respond(reply, self.persist());
            }
            PlayerCommand::Name { reply } => respond(reply, Ok(self.state.info.name.clone())),
            PlayerCommand::Room { reply } => respond(reply, Ok(self.state.room)),
            PlayerCommand::SetRoom { room, reply } => {
                let result = self.set_room(room).await;
                respond(reply, result);
            }
            PlayerCommand::Die {
                killer,
                weapon,
                reply,
            } => {
                let result = self.die(killer, weapon).await;
                match reply {
                    Some(reply) => respond(reply, result),
                    None => {
                        if let Err(e) = result {
                            tracing::warn!(player = %self.key, "death not recorded: {}", e);
                        }
                    }
                }
            }
            PlayerCommand::Snapshot { reply } => respond(reply, Ok(self.state.clone())),
        }
    }
}

/// Typed address of a player.
#[derive(Clone, Debug)]
pub struct PlayerRef {
    key: PlayerKey,
    inner: ActorRef<PlayerCommand>,
}

impl PlayerRef {
    pub(crate) fn new(key: PlayerKey, inner: ActorRef<PlayerCommand>) -> Self {
        Self { key, inner }
    }

    pub fn key(&self) -> PlayerKey {
        self.key
    }

    /// Runs one command line and returns the response text. An empty
    /// response means the session is over.
    pub async fn play(&self, line: impl Into<String>) -> Result<String> {
        let line = line.into();
        self.inner
            .call(|reply| PlayerCommand::Play { line, reply })
            .await
    }

    pub async fn go(&self, direction: impl Into<String>) -> Result<String> {
        let direction = direction.into();
        self.inner
            .call(|reply| PlayerCommand::Go { direction, reply })
            .await
    }

    pub async fn subscribe(&self, sink: Arc<dyn MessageSink>) -> Result<ObserverId> {
        self.inner
            .call(|reply| PlayerCommand::Subscribe { sink, reply })
            .await
    }

    pub async fn unsubscribe(&self, id: ObserverId) -> Result<bool> {
        self.inner
            .call(|reply| PlayerCommand::Unsubscribe { id, reply })
            .await
    }

    /// Queues a message for the player's observers without waiting.
    pub fn send_message(&self, text: impl Into<String>) {
        self.inner.tell(PlayerCommand::SendMessage {
            text: text.into(),
            reply: None,
        });
    }

    /// Pushes a message to the observers and returns how many accepted it.
    pub async fn send_update_message(&self, text: impl Into<String>) -> Result<usize> {
        let text = text.into();
        self.inner
            .call(|reply| PlayerCommand::SendMessage {
                text,
                reply: Some(reply),
            })
            .await
    }

    pub async fn set_name(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.inner
            .call(|reply| PlayerCommand::SetName { name, reply })
            .await
    }

    pub async fn name(&self) -> Result<String> {
        self.inner.call(|reply| PlayerCommand::Name { reply }).await
    }

    pub async fn room(&self) -> Result<Option<RoomId>> {
        self.inner.call(|reply| PlayerCommand::Room { reply }).await
    }

    /// Initial placement: enters `room` without leaving any previous one.
    pub async fn set_room(&self, room: RoomId) -> Result<()> {
        self.inner
            .call(|reply| PlayerCommand::SetRoom { room, reply })
            .await
    }

    pub async fn die(&self, killer: Option<PlayerInfo>, weapon: Option<Thing>) -> Result<()> {
        self.inner
            .call(|reply| PlayerCommand::Die {
                killer,
                weapon,
                reply: Some(reply),
            })
            .await
    }

    /// Queues a death without waiting for it to be processed.
    ///
    /// The caller carries on before the victim handles it: a killer's
    /// "now dead" answer, and a `look` right after it, can still show the
    /// victim in the room. Later calls on the victim are queued behind it.
    pub fn die_later(&self, killer: Option<PlayerInfo>, weapon: Option<Thing>) {
        self.inner.tell(PlayerCommand::Die {
            killer,
            weapon,
            reply: None,
        });
    }

    pub async fn snapshot(&self) -> Result<PlayerState> {
        self.inner
            .call(|reply| PlayerCommand::Snapshot { reply })
            .await
    }
}
