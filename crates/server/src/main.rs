//! Adventure server binary.
//!
//! Loads a map into the actor runtime and exposes it either as a TCP line
//! server (`serve`) or as a single local game on the terminal (`play`).
//!
//! # Examples
//!
//! ```bash
//! # Serve the bundled map on port 8888
//! cargo run -p adventure-server -- serve
//!
//! # Play locally with state kept between runs
//! cargo run -p adventure-server -- play --persist
//! ```

mod bootstrap;
mod config;
mod logging;
mod retry;
mod server;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tokio::io::BufReader;

use crate::config::{ServerConfig, StorageKind, default_state_dir};

/// Multiplayer text adventure on a virtual-actor runtime
#[derive(Parser)]
#[command(name = "adventure")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    world: WorldArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Accept players over TCP
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play one game on this terminal
    Play,
}

/// Overrides applied on top of the environment configuration.
#[derive(Args)]
struct WorldArgs {
    /// Map name under the data directory's `maps/`
    #[arg(long, global = true)]
    map: Option<String>,

    /// Content directory holding `settings.toml` and `maps/`
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep actor state in this directory
    #[arg(long, global = true, conflicts_with = "persist")]
    state_dir: Option<PathBuf>,

    /// Keep actor state in the platform data directory
    #[arg(long, global = true)]
    persist: bool,

    /// Discard stored actor state before starting
    #[arg(long, global = true)]
    fresh: bool,
}

impl WorldArgs {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(map) = self.map {
            config.map = map;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(dir) = self.state_dir {
            config.storage = StorageKind::Files(dir);
        } else if self.persist {
            config.storage = StorageKind::Files(default_state_dir());
        }
        config.fresh_start |= self.fresh;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = ServerConfig::from_env();
    cli.world.apply(&mut config);

    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    let system = bootstrap::build_world(&config).await?;

    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.port);
            server::serve(system, port, config.retry).await
        }
        Command::Play => {
            let stdin = BufReader::new(tokio::io::stdin());
            let result =
                session::run_session(&system, config.retry, stdin, tokio::io::stdout(), "\n").await;
            system.shutdown().await;
            result
        }
    }
}
