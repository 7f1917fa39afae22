//! Runtime configuration and the builder that assembles an [`ActorSystem`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use adventure_content::WorldSettings;
use adventure_core::RoomId;

use crate::api::Result;
use crate::host::ActorSystem;
use crate::repository::{FileStateRepository, Storage};

/// Tunables shared by every actor.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Upper bound on one actor-to-actor call
    pub call_timeout: Duration,
    pub event_buffer_size: usize,
    pub monster_move_interval: Duration,
    /// Room new players are placed in
    pub start_room: RoomId,
    /// Room whose description dead players see
    pub death_room: RoomId,
}

impl RuntimeConfig {
    /// Applies the world-level settings from a content file.
    pub fn with_settings(mut self, settings: &WorldSettings) -> Self {
        self.start_room = settings.start_room;
        self.death_room = settings.death_room;
        self.monster_move_interval = settings.monster_move_interval();
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let settings = WorldSettings::default();
        Self {
            call_timeout: Duration::from_secs(30),
            event_buffer_size: 100,
            monster_move_interval: settings.monster_move_interval(),
            start_room: settings.start_room,
            death_room: settings.death_room,
        }
    }
}

/// Builder for [`ActorSystem`].
///
/// # Example
///
/// ```rust,ignore
/// let system = RuntimeBuilder::new()
///     .config(RuntimeConfig::default().with_settings(&settings))
///     .file_storage("./state")?
///     .fresh_start(true)
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    storage: Option<Storage>,
    fresh_start: bool,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            storage: None,
            fresh_start: false,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom storage backend (in-memory when not set)
    pub fn storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Persist actor state as files under `dir`
    pub fn file_storage(self, dir: impl AsRef<Path>) -> Result<Self> {
        let repo = FileStateRepository::new(dir)?;
        Ok(self.storage(Storage::new(Arc::new(repo))))
    }

    /// Discard previously stored state when building
    pub fn fresh_start(mut self, fresh: bool) -> Self {
        self.fresh_start = fresh;
        self
    }

    pub fn build(self) -> Result<ActorSystem> {
        let storage = self.storage.unwrap_or_else(Storage::in_memory);

        if self.fresh_start {
            let removed = storage.clear()?;
            if removed > 0 {
                tracing::info!("Fresh start: discarded {} stored actor states", removed);
            }
        }

        Ok(ActorSystem::new(self.config, storage))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
