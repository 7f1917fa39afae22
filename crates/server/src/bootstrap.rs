//! Assembles a configured actor system from content files.
use adventure_content::{ContentFactory, SettingsLoader, WorldSettings};
use anyhow::{Context, Result};
use runtime::{ActorSystem, RuntimeBuilder, RuntimeConfig, configure_world};
use tracing::info;

use crate::config::{ServerConfig, StorageKind};

/// Loads settings and the map, builds the runtime and pushes the map into
/// the actors.
pub async fn build_world(config: &ServerConfig) -> Result<ActorSystem> {
    let factory = ContentFactory::new(&config.data_dir);
    let settings = load_settings(config, &factory)?;
    let map = factory
        .load_map(&config.map)
        .with_context(|| format!("Failed to load map '{}'", config.map))?;

    let runtime_config = RuntimeConfig {
        call_timeout: config.call_timeout,
        ..RuntimeConfig::default()
    }
    .with_settings(&settings);

    let mut builder = RuntimeBuilder::new()
        .config(runtime_config)
        .fresh_start(config.fresh_start);
    if let StorageKind::Files(dir) = &config.storage {
        info!("Persisting actor state under {}", dir.display());
        builder = builder
            .file_storage(dir)
            .with_context(|| format!("Failed to open state directory {}", dir.display()))?;
    }
    let system = builder.build()?;

    configure_world(&system, &map)
        .await
        .context("Failed to configure world")?;
    info!(map = %config.map, start_room = %settings.start_room, "World ready");
    Ok(system)
}

fn load_settings(config: &ServerConfig, factory: &ContentFactory) -> Result<WorldSettings> {
    match &config.settings {
        Some(path) => SettingsLoader::load(path),
        None => factory.load_settings(),
    }
}
