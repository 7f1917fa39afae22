//! Map document loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::map::MapDocument;

/// On-disk encoding of a map document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    Ron,
    Json,
}

impl MapFormat {
    /// Picks the format from the file extension (`.ron` or `.json`).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("ron") => Ok(MapFormat::Ron),
            Some("json") => Ok(MapFormat::Json),
            _ => anyhow::bail!(
                "Unsupported map file {}: expected a .ron or .json extension",
                path.display()
            ),
        }
    }
}

/// Loader for map documents.
pub struct MapLoader;

impl MapLoader {
    /// Load and validate a map document.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a `.ron` or `.json` map file
    ///
    /// # Returns
    ///
    /// Returns the document once every room reference in it resolves.
    pub fn load(path: &Path) -> LoadResult<MapDocument> {
        let format = MapFormat::from_path(path)?;
        let content = read_file(path)?;
        Self::parse(&content, format)
    }

    /// Parse and validate map text that has already been read.
    pub fn parse(content: &str, format: MapFormat) -> LoadResult<MapDocument> {
        let map: MapDocument = match format {
            MapFormat::Ron => ron::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?,
            MapFormat::Json => serde_json::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse map JSON: {}", e))?,
        };

        let problems = map.problems();
        if !problems.is_empty() {
            anyhow::bail!("Invalid map: {}", problems.join("; "));
        }

        Ok(map)
    }
}
