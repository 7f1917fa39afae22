//! Typed access to actor state on top of a byte repository.

use std::sync::Arc;

use adventure_core::ActorKey;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{InMemoryStateRepo, RepositoryError, Result, StateRepository};

/// Cloneable handle that encodes actor state with bincode.
#[derive(Clone)]
pub struct Storage {
    repo: Arc<dyn StateRepository>,
}

impl Storage {
    pub fn new(repo: Arc<dyn StateRepository>) -> Self {
        Self { repo }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStateRepo::new()))
    }

    pub fn save<T: Serialize>(&self, key: ActorKey, state: &T) -> Result<()> {
        let bytes =
            bincode::serialize(state).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        self.repo.save(&key, &bytes)
    }

    pub fn load<T: DeserializeOwned>(&self, key: ActorKey) -> Result<Option<T>> {
        let Some(bytes) = self.repo.load(&key)? else {
            return Ok(None);
        };
        let state = bincode::deserialize(&bytes).map_err(|e| RepositoryError::CorruptedData {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(state))
    }

    /// Removes every stored state. Used for a fresh start.
    pub fn clear(&self) -> Result<usize> {
        self.repo.clear()
    }

    pub fn repository(&self) -> &Arc<dyn StateRepository> {
        &self.repo
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
