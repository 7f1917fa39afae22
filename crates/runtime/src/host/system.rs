//! Identity-addressed registry of live actors.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use adventure_core::{MonsterId, PlayerKey, RoomId};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::mailbox::{self, Actor, ActorRef};
use crate::actors::{
    MonsterActor, MonsterCommand, MonsterRef, PlayerActor, PlayerCommand, PlayerRef, RoomActor,
    RoomCommand, RoomRef,
};
use crate::api::{Result, RuntimeError};
use crate::events::EventBus;
use crate::repository::Storage;
use crate::runtime::RuntimeConfig;

struct Entry<C> {
    actor: ActorRef<C>,
    task: JoinHandle<()>,
}

/// Live actors of one kind.
///
/// The lock only guards lookup and insertion; it is never held across an
/// actor call or a storage load.
struct Directory<K, C> {
    entries: Mutex<HashMap<K, Entry<C>>>,
    /// Bumped on every insertion, under the lock
    activations: AtomicU64,
}

impl<K: Eq + Hash + Copy, C: Send + 'static> Directory<K, C> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            activations: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<C>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live(entries: &HashMap<K, Entry<C>>, id: &K) -> Option<ActorRef<C>> {
        entries
            .get(id)
            .filter(|entry| entry.actor.is_alive())
            .map(|entry| entry.actor.clone())
    }

    /// Returns the live actor for `id`, activating it when absent or stopped.
    ///
    /// `load` runs unlocked. When another activation of this kind lands while
    /// it runs, the loaded actor is discarded and the lookup starts over, so
    /// at most one worker serves an identity and it starts from the latest
    /// stored state.
    fn resolve<A>(
        &self,
        id: K,
        load: impl Fn() -> Result<A>,
        spawn: impl Fn(A) -> (ActorRef<C>, JoinHandle<()>),
    ) -> Result<ActorRef<C>> {
        loop {
            let seen = {
                let entries = self.lock();
                if let Some(actor) = Self::live(&entries, &id) {
                    return Ok(actor);
                }
                self.activations.load(Ordering::SeqCst)
            };

            let loaded = load()?;

            let mut entries = self.lock();
            if let Some(actor) = Self::live(&entries, &id) {
                return Ok(actor);
            }
            if self.activations.load(Ordering::SeqCst) != seen {
                continue;
            }

            let (actor, task) = spawn(loaded);
            entries.insert(
                id,
                Entry {
                    actor: actor.clone(),
                    task,
                },
            );
            self.activations.fetch_add(1, Ordering::SeqCst);
            return Ok(actor);
        }
    }

    fn remove(&self, id: &K) -> Option<Entry<C>> {
        self.lock().remove(id)
    }

    fn drain(&self) -> Vec<JoinHandle<()>> {
        self.lock().drain().map(|(_, entry)| entry.task).collect()
    }

    fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|entry| entry.actor.is_alive())
            .count()
    }
}

struct Inner {
    config: RuntimeConfig,
    storage: Storage,
    events: EventBus,
    rooms: Directory<RoomId, RoomCommand>,
    players: Directory<PlayerKey, PlayerCommand>,
    monsters: Directory<MonsterId, MonsterCommand>,
    shutting_down: AtomicBool,
}

/// Cloneable handle to the world's actors.
///
/// Any identity can be resolved at any time; the first resolution activates
/// the actor from storage. Actors hold a clone of the system so they can
/// address each other by identity.
#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<Inner>,
}

impl ActorSystem {
    pub(crate) fn new(config: RuntimeConfig, storage: Storage) -> Self {
        let events = EventBus::with_capacity(config.event_buffer_size);
        Self {
            inner: Arc::new(Inner {
                config,
                storage,
                events,
                rooms: Directory::new(),
                players: Directory::new(),
                monsters: Directory::new(),
                shutting_down: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn room(&self, id: RoomId) -> Result<RoomRef> {
        self.ensure_running()?;
        self.inner
            .rooms
            .resolve(
                id,
                || RoomActor::activate(id, self.clone()),
                |actor| self.spawn(actor),
            )
            .map(|inner| RoomRef::new(id, inner))
    }

    pub fn player(&self, key: PlayerKey) -> Result<PlayerRef> {
        self.ensure_running()?;
        self.inner
            .players
            .resolve(
                key,
                || PlayerActor::activate(key, self.clone()),
                |actor| self.spawn(actor),
            )
            .map(|inner| PlayerRef::new(key, inner))
    }

    pub fn monster(&self, id: MonsterId) -> Result<MonsterRef> {
        self.ensure_running()?;
        self.inner
            .monsters
            .resolve(
                id,
                || MonsterActor::activate(id, self.clone()),
                |actor| self.spawn(actor),
            )
            .map(|inner| MonsterRef::new(id, inner))
    }

    /// Forgets a player's worker. It stops once its queued commands drain;
    /// a later resolution reactivates it from storage.
    pub fn deactivate_player(&self, key: PlayerKey) {
        if self.inner.players.remove(&key).is_some() {
            debug!(player = %key, "player deactivated");
        }
    }

    /// Number of live actors across all kinds.
    pub fn active_actors(&self) -> usize {
        self.inner.rooms.len() + self.inner.players.len() + self.inner.monsters.len()
    }

    /// Stops resolving identities and waits for every worker to finish.
    pub async fn shutdown(&self) {
        if self.inner.shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut tasks = self.inner.players.drain();
        tasks.extend(self.inner.monsters.drain());
        tasks.extend(self.inner.rooms.drain());
        info!("Shutting down {} actors", tasks.len());

        let timeout = self.inner.config.call_timeout;
        for task in tasks {
            match tokio::time::timeout(timeout, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("actor worker ended abnormally: {}", e),
                Err(_) => warn!("actor worker did not stop within {:?}", timeout),
            }
        }
    }

    fn ensure_running(&self) -> Result<()> {
        if self.inner.shutting_down.load(Ordering::SeqCst) {
            return Err(RuntimeError::ShuttingDown);
        }
        Ok(())
    }

    fn spawn<A: Actor>(&self, actor: A) -> (ActorRef<A::Command>, JoinHandle<()>) {
        mailbox::spawn(actor, self.inner.config.call_timeout)
    }
}

impl std::fmt::Debug for ActorSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorSystem")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
