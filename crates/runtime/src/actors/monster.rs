//! Monster actor: a wandering NPC that can be killed.

use std::time::Duration;

use adventure_core::{
    ActorKey, Direction, MonsterId, MonsterInfo, PlayerInfo, RoomId, Thing, narrative,
};
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::VariantArray;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::Result;
use crate::host::{Actor, ActorRef, ActorSystem, Reply, respond, timer};

/// Persisted state of a monster. `room` is `None` once it is dead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterState {
    pub info: MonsterInfo,
    pub room: Option<RoomId>,
}

pub enum MonsterCommand {
    SetInfo {
        info: MonsterInfo,
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
    /// Posted by the movement timer.
    Move,
    Kill {
        room: RoomId,
        killer: Option<PlayerInfo>,
        weapon: Option<Thing>,
        reply: Reply<String>,
    },
    Snapshot {
        reply: Reply<MonsterState>,
    },
}

pub struct MonsterActor {
    id: MonsterId,
    state: MonsterState,
    system: ActorSystem,
    timer: Option<JoinHandle<()>>,
}

impl MonsterActor {
    pub(crate) fn activate(id: MonsterId, system: ActorSystem) -> Result<Self> {
        let mut state: MonsterState = system
            .storage()
            .load(ActorKey::Monster(id))?
            .unwrap_or_default();
        state.info.id = id;

        Ok(Self {
            id,
            state,
            system,
            timer: None,
        })
    }

    fn persist(&self) -> Result<()> {
        self.system
            .storage()
            .save(ActorKey::Monster(self.id), &self.state)?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.state.info.name
    }

    async fn set_room(&mut self, room: RoomId) -> Result<()> {
        if let Some(previous) = self.state.room {
            self.system
                .room(previous)?
                .exit(self.state.info.clone())
                .await?;
        }
        self.state.room = Some(room);
        self.persist()?;

        self.system.room(room)?.enter(self.state.info.clone()).await
    }

    /// Wanders through a random cardinal exit, if the room has one.
    async fn wander(&mut self) -> Result<()> {
        let Some(current) = self.state.room else {
            return Ok(());
        };
        let direction = random_direction();

        let origin = self.system.room(current)?;
        let Some(target) = origin.exit_to(direction.name()).await? else {
            return Ok(());
        };

        origin.exit(self.state.info.clone()).await?;
        self.system
            .room(target)?
            .enter(self.state.info.clone())
            .await?;

        self.state.room = Some(target);
        self.persist()?;
        debug!(monster = %self.name(), from = %current, to = %target, "wandered {}", direction);
        Ok(())
    }

    async fn kill(
        &mut self,
        room: RoomId,
        killer: Option<PlayerInfo>,
        weapon: Option<Thing>,
    ) -> Result<String> {
        let Some(current) = self.state.room else {
            return Ok(narrative::already_dead(self.name()));
        };
        if current != room {
            return Ok(narrative::snuck_away(self.name()));
        }

        self.system
            .room(current)?
            .exit_dead(self.state.info.clone(), killer, weapon)
            .await?;
        self.state.room = None;
        self.persist()?;

        info!(monster = %self.name(), "killed");
        Ok(narrative::monster_dead(self.name()))
    }
}

fn random_direction() -> Direction {
    let index = rand::rng().random_range(0..Direction::VARIANTS.len());
    Direction::VARIANTS[index]
}

#[async_trait]
impl Actor for MonsterActor {
    type Command = MonsterCommand;

    fn key(&self) -> ActorKey {
        ActorKey::Monster(self.id)
    }

    fn started(&mut self, mailbox: &mpsc::UnboundedSender<MonsterCommand>) {
        let period = self.system.config().monster_move_interval;
        if period > Duration::ZERO {
            self.timer = Some(timer::every(mailbox.downgrade(), period, || {
                MonsterCommand::Move
            }));
        }
    }

    async fn handle(&mut self, command: MonsterCommand) {
        match command {
            MonsterCommand::SetInfo { mut info, reply } => {
                info.id = self.id;
                self.state.info = info;
                respond(reply, self.persist());
            }
            MonsterCommand::Name { reply } => respond(reply, Ok(self.state.info.name.clone())),
            MonsterCommand::Room { reply } => respond(reply, Ok(self.state.room)),
            MonsterCommand::SetRoom { room, reply } => {
                let result = self.set_room(room).await;
                respond(reply, result);
            }
            MonsterCommand::Move => {
                if let Err(e) = self.wander().await {
                    warn!(monster = %self.id, "move failed: {}", e);
                }
            }
            MonsterCommand::Kill {
                room,
                killer,
                weapon,
                reply,
            } => {
                let result = self.kill(room, killer, weapon).await;
                respond(reply, result);
            }
            MonsterCommand::Snapshot { reply } => respond(reply, Ok(self.state.clone())),
        }
    }

    fn stopped(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// Typed address of a monster.
#[derive(Clone, Debug)]
pub struct MonsterRef {
    id: MonsterId,
    inner: ActorRef<MonsterCommand>,
}

impl MonsterRef {
    pub(crate) fn new(id: MonsterId, inner: ActorRef<MonsterCommand>) -> Self {
        Self { id, inner }
    }

    pub fn id(&self) -> MonsterId {
        self.id
    }

    pub async fn set_info(&self, info: MonsterInfo) -> Result<()> {
        self.inner
            .call(|reply| MonsterCommand::SetInfo { info, reply })
            .await
    }

    pub async fn name(&self) -> Result<String> {
        self.inner.call(|reply| MonsterCommand::Name { reply }).await
    }

    pub async fn room(&self) -> Result<Option<RoomId>> {
        self.inner.call(|reply| MonsterCommand::Room { reply }).await
    }

    /// Places the monster, leaving its previous room first.
    pub async fn set_room(&self, room: RoomId) -> Result<()> {
        self.inner
            .call(|reply| MonsterCommand::SetRoom { room, reply })
            .await
    }

    /// Triggers one wandering step now instead of waiting for the timer.
    pub fn nudge(&self) {
        self.inner.tell(MonsterCommand::Move);
    }

    /// Attempts a kill from `room`. Never fails on a stale caller: a monster
    /// that moved or already died answers with narrative text.
    pub async fn kill(
        &self,
        room: RoomId,
        killer: Option<PlayerInfo>,
        weapon: Option<Thing>,
    ) -> Result<String> {
        self.inner
            .call(|reply| MonsterCommand::Kill {
                room,
                killer,
                weapon,
                reply,
            })
            .await
    }

    pub async fn snapshot(&self) -> Result<MonsterState> {
        self.inner
            .call(|reply| MonsterCommand::Snapshot { reply })
            .await
    }
}
