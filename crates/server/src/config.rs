//! Server configuration loaded from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use adventure_content::BUNDLED_DATA_DIR;

use crate::retry::RetryPolicy;

/// Where actor state lives between runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Files(PathBuf),
}

impl StorageKind {
    /// `memory` (any case) keeps state in process; anything else is a
    /// directory for state files.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("memory") {
            StorageKind::Memory
        } else {
            StorageKind::Files(PathBuf::from(value.trim()))
        }
    }
}

/// Everything the binary needs to assemble and expose a world.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Map name under `<data_dir>/maps`
    pub map: String,
    /// Directory holding `settings.toml` and `maps/`
    pub data_dir: PathBuf,
    /// Settings file overriding `<data_dir>/settings.toml`
    pub settings: Option<PathBuf>,
    pub storage: StorageKind,
    pub log_dir: Option<PathBuf>,
    pub call_timeout: Duration,
    pub retry: RetryPolicy,
    pub fresh_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8888,
            map: "adventure".to_string(),
            data_dir: PathBuf::from(BUNDLED_DATA_DIR),
            settings: None,
            storage: StorageKind::Memory,
            log_dir: None,
            call_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            fresh_start: false,
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ADVENTURE_PORT` - TCP port (default: 8888)
    /// - `ADVENTURE_MAP` - Map name (default: adventure)
    /// - `ADVENTURE_DATA_DIR` - Content directory (default: bundled content)
    /// - `ADVENTURE_SETTINGS` - Settings file path (default: `<data_dir>/settings.toml`)
    /// - `ADVENTURE_STORAGE` - `memory` or a state directory (default: memory)
    /// - `ADVENTURE_LOG_DIR` - Directory for daily log files (default: stderr only)
    /// - `ADVENTURE_CALL_TIMEOUT_SECS` - Actor call timeout (default: 30)
    /// - `ADVENTURE_RETRY_ATTEMPTS` - Attempts per player command (default: 5)
    /// - `ADVENTURE_RETRY_BACKOFF_SECS` - Pause between attempts (default: 4)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = read_env::<u16>("ADVENTURE_PORT") {
            config.port = port;
        }
        if let Ok(map) = env::var("ADVENTURE_MAP") {
            config.map = map;
        }
        if let Ok(dir) = env::var("ADVENTURE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.settings = env::var("ADVENTURE_SETTINGS").ok().map(PathBuf::from);
        if let Ok(storage) = env::var("ADVENTURE_STORAGE") {
            config.storage = StorageKind::parse(&storage);
        }
        config.log_dir = env::var("ADVENTURE_LOG_DIR").ok().map(PathBuf::from);

        if let Some(secs) = read_env::<u64>("ADVENTURE_CALL_TIMEOUT_SECS") {
            config.call_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(attempts) = read_env::<u32>("ADVENTURE_RETRY_ATTEMPTS") {
            config.retry.attempts = attempts.max(1);
        }
        if let Some(secs) = read_env::<u64>("ADVENTURE_RETRY_BACKOFF_SECS") {
            config.retry.backoff = Duration::from_secs(secs);
        }

        config
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(|| self.data_dir.join("settings.toml"))
    }
}

/// Platform data directory for persisted actor state.
///
/// Falls back to `./state` when no home directory can be determined.
pub fn default_state_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "adventure")
        .map(|dirs| dirs.data_dir().join("state"))
        .unwrap_or_else(|| PathBuf::from("./state"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_kind_parsing() {
        assert_eq!(StorageKind::parse("memory"), StorageKind::Memory);
        assert_eq!(StorageKind::parse(" Memory "), StorageKind::Memory);
        assert_eq!(
            StorageKind::parse("/var/lib/adventure"),
            StorageKind::Files(PathBuf::from("/var/lib/adventure"))
        );
    }

    #[test]
    fn defaults_point_at_bundled_content() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8888);
        assert_eq!(config.settings_path(), config.data_dir.join("settings.toml"));
        assert!(config.data_dir.join("maps").join("adventure.ron").exists());
    }
}
