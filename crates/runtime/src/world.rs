//! Loading map content into a running actor system.

use std::sync::Arc;

use adventure_content::MapDocument;
use adventure_core::PlayerKey;
use tracing::info;

use crate::actors::PlayerRef;
use crate::api::{MessageSink, ObserverId, Result};
use crate::host::ActorSystem;

/// Pushes a map into the actors: room info first, then things, then monsters.
pub async fn configure_world(system: &ActorSystem, map: &MapDocument) -> Result<()> {
    for room in &map.rooms {
        system.room(room.id)?.set_info(room.info()).await?;
    }

    for thing in &map.things {
        system.room(thing.found_in)?.drop_thing(thing.thing()).await?;
    }

    for monster in &map.monsters {
        let actor = system.monster(monster.id)?;
        actor.set_info(monster.info()).await?;
        actor.set_room(monster.found_in).await?;
    }

    info!(
        "World configured: {} rooms, {} things, {} monsters",
        map.rooms.len(),
        map.things.len(),
        map.monsters.len()
    );
    Ok(())
}

/// A freshly joined player and the subscription feeding its listener.
#[derive(Debug, Clone)]
pub struct Joined {
    pub player: PlayerRef,
    pub observer: ObserverId,
}

/// Creates a player with a new identity, subscribes `sink`, and places the
/// player in the start room.
pub async fn join(
    system: &ActorSystem,
    name: impl Into<String>,
    sink: Arc<dyn MessageSink>,
) -> Result<Joined> {
    join_as(system, PlayerKey::new(), name, sink).await
}

/// Like [`join`], but under a caller-chosen identity.
///
/// Repeating it with the same key reuses that player instead of creating
/// another one.
pub async fn join_as(
    system: &ActorSystem,
    key: PlayerKey,
    name: impl Into<String>,
    sink: Arc<dyn MessageSink>,
) -> Result<Joined> {
    let player = system.player(key)?;
    player.set_name(name).await?;
    let observer = player.subscribe(sink).await?;
    player.set_room(system.config().start_room).await?;

    Ok(Joined { player, observer })
}

/// Ends a session: the player leaves the game, stops listening and goes
/// inert.
pub async fn depart(system: &ActorSystem, joined: &Joined) -> Result<()> {
    let result = joined.player.play("end").await;
    if let Err(e) = joined.player.unsubscribe(joined.observer).await {
        tracing::debug!("unsubscribe after end failed: {}", e);
    }
    system.deactivate_player(joined.player.key());
    result.map(|_| ())
}
