//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use adventure_content::{MapDocument, MonsterSpec, RoomSpec, ThingSpec};
use adventure_core::{MonsterId, RoomId, ThingId};
use runtime::{ActorSystem, ChannelObserver, Joined, RuntimeBuilder, RuntimeConfig, join};
use tokio::sync::mpsc::UnboundedReceiver;

pub const CLEARING: RoomId = RoomId(0);
pub const CAVE: RoomId = RoomId(1);
pub const NO_RETURN: RoomId = RoomId(-2);
pub const GOBLIN: MonsterId = MonsterId(1);

pub const CLEARING_TEXT: &str = "You are standing in a sunny clearing.";
pub const CAVE_TEXT: &str = "You are in a damp cave.";
pub const NO_RETURN_TEXT: &str = "You are in the place of no return.";

fn room(id: RoomId, name: &str, description: &str, exits: &[(&str, RoomId)]) -> RoomSpec {
    RoomSpec {
        id,
        name: name.to_string(),
        description: description.to_string(),
        directions: exits
            .iter()
            .map(|(direction, to)| (direction.to_string(), *to))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// Clearing (sword) north to Cave (torch, Goblin), plus the death room.
pub fn small_map() -> MapDocument {
    MapDocument {
        rooms: vec![
            room(CLEARING, "clearing", CLEARING_TEXT, &[("north", CAVE)]),
            room(CAVE, "cave", CAVE_TEXT, &[("south", CLEARING)]),
            room(NO_RETURN, "no-return", NO_RETURN_TEXT, &[]),
        ],
        things: vec![
            ThingSpec {
                id: ThingId(100),
                name: "torch".to_string(),
                category: "light".to_string(),
                found_in: CAVE,
            },
            ThingSpec {
                id: ThingId(101),
                name: "sword".to_string(),
                category: "weapon".to_string(),
                found_in: CLEARING,
            },
        ],
        monsters: vec![MonsterSpec {
            id: GOBLIN,
            name: "Goblin".to_string(),
            killed_by: vec![ThingId(101)],
            found_in: CAVE,
        }],
    }
}

/// Two rooms whose every exit leads to the other one.
pub fn ring_map() -> MapDocument {
    let all = |to: RoomId| {
        [
            ("north", to),
            ("south", to),
            ("east", to),
            ("west", to),
        ]
    };
    MapDocument {
        rooms: vec![
            room(RoomId(0), "east-wing", "East wing.", &all(RoomId(1))),
            room(RoomId(1), "west-wing", "West wing.", &all(RoomId(0))),
        ],
        things: Vec::new(),
        monsters: vec![MonsterSpec {
            id: GOBLIN,
            name: "Goblin".to_string(),
            killed_by: Vec::new(),
            found_in: RoomId(0),
        }],
    }
}

/// Configuration with the monster timer disabled.
pub fn quiet_config() -> RuntimeConfig {
    RuntimeConfig {
        monster_move_interval: Duration::ZERO,
        call_timeout: Duration::from_secs(5),
        start_room: CLEARING,
        death_room: NO_RETURN,
        ..RuntimeConfig::default()
    }
}

pub async fn world(map: &MapDocument) -> ActorSystem {
    world_with(quiet_config(), map).await
}

pub async fn world_with(config: RuntimeConfig, map: &MapDocument) -> ActorSystem {
    let system = RuntimeBuilder::new()
        .config(config)
        .build()
        .expect("runtime should build");
    runtime::configure_world(&system, map)
        .await
        .expect("map should load");
    system
}

pub struct Session {
    pub joined: Joined,
    pub inbox: UnboundedReceiver<String>,
}

impl Session {
    pub async fn play(&self, line: &str) -> String {
        self.joined
            .player
            .play(line)
            .await
            .expect("command should complete")
    }

    /// Reads pushed messages until one contains `needle`.
    pub async fn expect_message(&mut self, needle: &str) -> String {
        let wait = async {
            while let Some(message) = self.inbox.recv().await {
                if message.contains(needle) {
                    return message;
                }
            }
            panic!("inbox closed before '{needle}' arrived");
        };
        tokio::time::timeout(Duration::from_secs(2), wait)
            .await
            .unwrap_or_else(|_| panic!("no message containing '{needle}'"))
    }
}

pub async fn connect(system: &ActorSystem, name: &str) -> Session {
    let (observer, inbox) = ChannelObserver::new();
    let joined = join(system, name, Arc::new(observer))
        .await
        .expect("join should succeed");
    Session { joined, inbox }
}
