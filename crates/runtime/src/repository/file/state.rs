//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use adventure_core::ActorKey;

use crate::repository::{RepositoryError, Result, StateRepository};

/// File-based implementation of StateRepository.
///
/// # File Format
///
/// Each actor is stored as `{kind}_{id}.bin` (see [`ActorKey::file_stem`])
/// holding the bincode bytes produced by [`Storage`](crate::repository::Storage).
/// Writes go to a temp file first and are renamed into place, so a crash never
/// leaves a half-written state behind.
pub struct FileStateRepository {
    base_dir: PathBuf,
}

impl FileStateRepository {
    /// Create a new file-based state repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn state_path(&self, key: &ActorKey) -> PathBuf {
        self.base_dir.join(format!("{}.bin", key.file_stem()))
    }
}

impl StateRepository for FileStateRepository {
    fn save(&self, key: &ActorKey, bytes: &[u8]) -> Result<()> {
        let path = self.state_path(key);
        let temp_path = path.with_extension("bin.tmp");

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!("Saved state[{}] to {}", key, path.display());

        Ok(())
    }

    fn load(&self, key: &ActorKey) -> Result<Option<Vec<u8>>> {
        let path = self.state_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;

        tracing::debug!("Loaded state[{}] from {}", key, path.display());

        Ok(Some(bytes))
    }

    fn exists(&self, key: &ActorKey) -> bool {
        self.state_path(key).exists()
    }

    fn delete(&self, key: &ActorKey) -> Result<()> {
        let path = self.state_path(key);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Deleted state[{}]", key);
        }

        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<ActorKey>> {
        let mut keys = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(stem) = filename.strip_suffix(".bin")
                && let Some(key) = ActorKey::from_file_stem(stem)
            {
                keys.push(key);
            }
        }

        Ok(keys)
    }
}
