//! TCP front-end: one session task per connection.
use std::net::SocketAddr;

use anyhow::{Context, Result};
use runtime::ActorSystem;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

use crate::retry::RetryPolicy;
use crate::session::run_session;

/// Accepts connections until Ctrl-C, then shuts the actor system down.
pub async fn serve(system: ActorSystem, port: u16, retry: RetryPolicy) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                tokio::spawn(handle_connection(system.clone(), stream, peer, retry));
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    system.shutdown().await;
    Ok(())
}

async fn handle_connection(
    system: ActorSystem,
    stream: TcpStream,
    peer: SocketAddr,
    retry: RetryPolicy,
) {
    info!(%peer, "connection opened");
    let (read, write) = stream.into_split();

    if let Err(e) = run_session(&system, retry, BufReader::new(read), write, "\r\n").await {
        error!(%peer, "session failed: {:#}", e);
    }
    info!(%peer, "connection closed");
}
