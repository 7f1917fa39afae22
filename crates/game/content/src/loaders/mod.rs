//! Content loaders for reading world data from files.
//!
//! Maps are RON or JSON (picked by file extension); settings are TOML.

pub mod factory;
pub mod map;
pub mod settings;

pub use factory::ContentFactory;
pub use map::{MapFormat, MapLoader};
pub use settings::SettingsLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
