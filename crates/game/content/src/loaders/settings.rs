//! World settings loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::settings::WorldSettings;

/// Loader for world settings from TOML files.
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing WorldSettings
    pub fn load(path: &Path) -> LoadResult<WorldSettings> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<WorldSettings> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse settings TOML: {}", e))
    }
}
