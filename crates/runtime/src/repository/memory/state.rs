//! In-memory StateRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use adventure_core::ActorKey;

use crate::repository::{RepositoryError, Result, StateRepository};

/// In-memory implementation of StateRepository.
///
/// State lives only as long as the process; it is the default backend.
pub struct InMemoryStateRepo {
    states: RwLock<HashMap<ActorKey, Vec<u8>>>,
}

impl InMemoryStateRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Number of actors with stored state.
    pub fn len(&self) -> usize {
        self.states.read().map(|states| states.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStateRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRepository for InMemoryStateRepo {
    fn save(&self, key: &ActorKey, bytes: &[u8]) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.insert(*key, bytes.to_vec());
        Ok(())
    }

    fn load(&self, key: &ActorKey) -> Result<Option<Vec<u8>>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.get(key).cloned())
    }

    fn exists(&self, key: &ActorKey) -> bool {
        self.states
            .read()
            .map(|states| states.contains_key(key))
            .unwrap_or(false)
    }

    fn delete(&self, key: &ActorKey) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<ActorKey>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use adventure_core::{MonsterId, RoomId};

    use super::*;

    #[test]
    fn save_overwrites_previous_value() {
        let repo = InMemoryStateRepo::new();
        let key = ActorKey::Room(RoomId(1));

        repo.save(&key, b"first").unwrap();
        repo.save(&key, b"second").unwrap();

        assert_eq!(repo.load(&key).unwrap(), Some(b"second".to_vec()));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let repo = InMemoryStateRepo::new();
        repo.save(&ActorKey::Room(RoomId(1)), b"a").unwrap();
        repo.save(&ActorKey::Monster(MonsterId(2)), b"b").unwrap();

        assert_eq!(repo.clear().unwrap(), 2);
        assert!(repo.is_empty());
        assert!(!repo.exists(&ActorKey::Room(RoomId(1))));
    }
}
