//! Data-driven world content and its loaders.
//!
//! This crate houses the static description of an adventure world:
//! - Map documents (rooms, things, monsters) in RON or JSON
//! - World settings (start room, place of no return, monster pacing) in TOML
//!
//! Content is read once at bootstrap and pushed into the actors through their
//! configuration operations; it never appears in actor state directly.

pub mod map;
pub mod settings;

#[cfg(feature = "loaders")]
pub mod loaders;

/// Content shipped with this crate: `settings.toml` and `maps/adventure.ron`.
pub const BUNDLED_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

pub use map::{MapDocument, MonsterSpec, RoomSpec, ThingSpec};
pub use settings::WorldSettings;

#[cfg(feature = "loaders")]
pub use loaders::{ContentFactory, MapFormat, MapLoader, SettingsLoader};
