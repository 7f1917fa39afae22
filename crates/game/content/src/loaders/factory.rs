//! Content factory for locating world data files.

use std::path::{Path, PathBuf};

use crate::loaders::{LoadResult, MapLoader, SettingsLoader};
use crate::map::MapDocument;
use crate::settings::WorldSettings;

/// Content factory that loads world content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── settings.toml
/// └── maps/
///     ├── adventure.ron
///     └── tiny.json
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load world settings from `settings.toml`, falling back to defaults
    /// when the file does not exist.
    pub fn load_settings(&self) -> LoadResult<WorldSettings> {
        let path = self.data_dir.join("settings.toml");
        if !path.exists() {
            return Ok(WorldSettings::default());
        }
        SettingsLoader::load(&path)
    }

    /// Load a map from `maps/{map_name}.ron`, or `maps/{map_name}.json` when
    /// no RON file exists.
    pub fn load_map(&self, map_name: &str) -> LoadResult<MapDocument> {
        let maps = self.data_dir.join("maps");
        let ron = maps.join(format!("{map_name}.ron"));
        if ron.exists() {
            return MapLoader::load(&ron);
        }
        MapLoader::load(&maps.join(format!("{map_name}.json")))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
