//! Repository contract for saving and loading actor state.

use adventure_core::ActorKey;

use crate::repository::Result;

/// Durable key/value store for actor state.
///
/// Values are opaque encoded bytes; [`Storage`](crate::repository::Storage)
/// handles the typed layer. Implementations must make a `save` visible to any
/// later `load` once it returns.
pub trait StateRepository: Send + Sync {
    /// Save the encoded state of one actor, replacing any previous value
    fn save(&self, key: &ActorKey, bytes: &[u8]) -> Result<()>;

    /// Load the encoded state of one actor
    fn load(&self, key: &ActorKey) -> Result<Option<Vec<u8>>>;

    /// Check if a state exists
    fn exists(&self, key: &ActorKey) -> bool;

    /// Delete a state
    fn delete(&self, key: &ActorKey) -> Result<()>;

    /// List every key with stored state
    fn list_keys(&self) -> Result<Vec<ActorKey>> {
        Ok(vec![])
    }

    /// Delete every stored state, returning how many were removed
    fn clear(&self) -> Result<usize> {
        let keys = self.list_keys()?;
        for key in &keys {
            self.delete(key)?;
        }
        Ok(keys.len())
    }
}
