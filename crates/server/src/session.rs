//! One line-oriented conversation between a client and its player actor.
//!
//! The same loop serves TCP connections and the local console: it reads
//! command lines, writes responses, and interleaves push notifications as
//! they arrive.
use std::sync::Arc;

use adventure_core::PlayerKey;
use adventure_core::narrative::DEFAULT_PLAYER_NAME;
use anyhow::Result;
use runtime::{ActorSystem, ChannelObserver, depart, join_as};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::retry::RetryPolicy;

pub const BANNER: &str = "Welcome to the adventure!";
pub const ASK_NAME: &str = "What's your name?";
pub const EMPTY_LINE: &str = "Please type something.";
pub const FAREWELL: &str = "Have a good day!";

/// Writes text one line at a time with a fixed terminator.
struct LineWriter<W> {
    inner: W,
    ending: &'static str,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    /// Writes every line of `text`. Empty text writes nothing.
    async fn send(&mut self, text: &str) -> std::io::Result<()> {
        for line in text.lines() {
            self.inner.write_all(line.as_bytes()).await?;
            self.inner.write_all(self.ending.as_bytes()).await?;
        }
        self.inner.flush().await
    }
}

/// How a session loop ended.
enum Outcome {
    Farewell,
    Disconnected,
    Failed(String),
}

/// Serves one client until it says `end`, disconnects or hits a fault.
///
/// The player is always taken out of the world before returning.
pub async fn run_session<R, W>(
    system: &ActorSystem,
    retry: RetryPolicy,
    reader: R,
    writer: W,
    ending: &'static str,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut out = LineWriter {
        inner: writer,
        ending,
    };

    out.send(BANNER).await?;
    out.send(ASK_NAME).await?;
    let Some(name) = lines.next_line().await? else {
        return Ok(());
    };
    let name = match name.trim() {
        "" => DEFAULT_PLAYER_NAME.to_string(),
        name => name.to_string(),
    };

    let (observer, mut pushes) = ChannelObserver::new();
    let key = PlayerKey::new();
    let joined = retry
        .run(|| join_as(system, key, name.clone(), Arc::new(observer.clone())))
        .await?;
    info!(player = %key, %name, "session started");

    let outcome = converse(system, key, retry, &mut lines, &mut out, &mut pushes).await;

    if let Err(e) = depart(system, &joined).await {
        warn!(player = %joined.player.key(), "departure failed: {}", e);
    }

    match outcome? {
        Outcome::Farewell => out.send(FAREWELL).await?,
        Outcome::Disconnected => {}
        Outcome::Failed(message) => out.send(&format!("Unexpected exception: {message}")).await?,
    }
    info!(%name, "session closed");
    Ok(())
}

/// Runs one command line, resolving the player afresh on every attempt.
///
/// Only commands that never reached the actor are retried, so a line takes
/// effect at most once.
async fn play_line(
    system: &ActorSystem,
    retry: RetryPolicy,
    player: PlayerKey,
    line: &str,
) -> runtime::Result<String> {
    retry
        .run(|| async move { system.player(player)?.play(line).await })
        .await
}

async fn converse<R, W>(
    system: &ActorSystem,
    player: PlayerKey,
    retry: RetryPolicy,
    lines: &mut tokio::io::Lines<R>,
    out: &mut LineWriter<W>,
    pushes: &mut tokio::sync::mpsc::UnboundedReceiver<String>,
) -> Result<Outcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match play_line(system, retry, player, "look").await {
        Ok(room) => out.send(&room).await?,
        Err(e) => return Ok(Outcome::Failed(e.to_string())),
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(Outcome::Disconnected);
                };
                let line = line.trim();
                if line.is_empty() {
                    out.send(EMPTY_LINE).await?;
                    continue;
                }
                if line.eq_ignore_ascii_case("end") {
                    return Ok(Outcome::Farewell);
                }

                match play_line(system, retry, player, line).await {
                    Ok(response) if response.is_empty() => return Ok(Outcome::Farewell),
                    Ok(response) => out.send(&response).await?,
                    Err(e) => return Ok(Outcome::Failed(e.to_string())),
                }
            }
            Some(message) = pushes.recv() => out.send(&message).await?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use adventure_content::{MapDocument, RoomSpec, ThingSpec};
    use adventure_core::{ActorKey, RoomId, ThingId};
    use runtime::repository::Result as RepoResult;
    use runtime::{
        InMemoryStateRepo, RuntimeBuilder, RuntimeConfig, RuntimeError, StateRepository,
        Storage, configure_world,
    };
    use tokio::io::{AsyncReadExt, BufReader};

    use super::*;

    const HALL: RoomId = RoomId(0);

    /// In-memory repository whose next player save can be made to stall.
    #[derive(Default)]
    struct StallingRepo {
        inner: InMemoryStateRepo,
        stall_next_player_save: AtomicBool,
    }

    impl StateRepository for StallingRepo {
        fn save(&self, key: &ActorKey, bytes: &[u8]) -> RepoResult<()> {
            if matches!(key, ActorKey::Player(_))
                && self.stall_next_player_save.swap(false, Ordering::SeqCst)
            {
                std::thread::sleep(Duration::from_millis(300));
            }
            self.inner.save(key, bytes)
        }

        fn load(&self, key: &ActorKey) -> RepoResult<Option<Vec<u8>>> {
            self.inner.load(key)
        }

        fn exists(&self, key: &ActorKey) -> bool {
            self.inner.exists(key)
        }

        fn delete(&self, key: &ActorKey) -> RepoResult<()> {
            self.inner.delete(key)
        }
    }

    async fn hall_world(storage: Storage, call_timeout: Duration) -> ActorSystem {
        let map = MapDocument {
            rooms: vec![RoomSpec {
                id: HALL,
                name: "hall".to_string(),
                description: "A quiet hall.".to_string(),
                directions: BTreeMap::new(),
            }],
            things: vec![ThingSpec {
                id: ThingId(1),
                name: "sword".to_string(),
                category: "weapon".to_string(),
                found_in: HALL,
            }],
            ..MapDocument::default()
        };
        let config = RuntimeConfig {
            monster_move_interval: Duration::ZERO,
            call_timeout,
            ..RuntimeConfig::default()
        };
        let system = RuntimeBuilder::new()
            .config(config)
            .storage(storage)
            .build()
            .unwrap();
        configure_world(&system, &map).await.unwrap();
        system
    }

    async fn one_room_world() -> ActorSystem {
        hall_world(Storage::in_memory(), Duration::from_secs(5)).await
    }

    async fn transcript(input: &str) -> String {
        let system = one_room_world().await;
        let (mut client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);

        client.write_all(input.as_bytes()).await.unwrap();
        client.shutdown().await.unwrap();
        run_session(
            &system,
            RetryPolicy::default(),
            BufReader::new(server_read),
            server_write,
            "\r\n",
        )
        .await
        .unwrap();

        let mut output = String::new();
        client.read_to_string(&mut output).await.unwrap();
        output
    }

    #[tokio::test]
    async fn greets_describes_and_says_goodbye() {
        let output = transcript("Amy\r\nlook\r\nEND\r\n").await;

        assert!(output.starts_with("Welcome to the adventure!\r\nWhat's your name?\r\n"));
        assert!(output.contains("A quiet hall.\r\n"));
        assert!(output.ends_with("Have a good day!\r\n"));
    }

    #[tokio::test]
    async fn empty_lines_are_rejected_politely() {
        let output = transcript("Amy\r\n   \r\nend\r\n").await;
        assert!(output.contains("Please type something.\r\n"));
    }

    #[tokio::test]
    async fn disconnect_ends_quietly() {
        let output = transcript("Amy\r\ninventory\r\n").await;
        assert!(output.contains("You are carrying:"));
        assert!(!output.contains("Have a good day!"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn timed_out_command_is_not_replayed() {
        let repo = Arc::new(StallingRepo::default());
        let system = hall_world(Storage::new(repo.clone()), Duration::from_millis(100)).await;
        let (observer, _pushes) = ChannelObserver::new();
        let key = PlayerKey::new();
        join_as(&system, key, "Amy", Arc::new(observer)).await.unwrap();
        let retry = RetryPolicy {
            attempts: 3,
            backoff: Duration::ZERO,
        };

        repo.stall_next_player_save.store(true, Ordering::SeqCst);
        let err = play_line(&system, retry, key, "take sword").await.unwrap_err();
        assert!(matches!(err, RuntimeError::CallTimeout { .. }));

        // Let the stalled save finish before looking.
        tokio::time::sleep(Duration::from_millis(400)).await;
        let player = system.player(key).unwrap().snapshot().await.unwrap();
        let carried: Vec<_> = player.things.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(carried, ["sword"]);
        let hall = system.room(HALL).unwrap().snapshot().await.unwrap();
        assert!(hall.things.is_empty());
    }

    #[tokio::test]
    async fn commands_reach_a_reactivated_player() {
        let system = one_room_world().await;
        let (observer, _pushes) = ChannelObserver::new();
        let key = PlayerKey::new();
        join_as(&system, key, "Amy", Arc::new(observer)).await.unwrap();

        system.deactivate_player(key);
        let response = play_line(&system, RetryPolicy::default(), key, "take sword")
            .await
            .unwrap();
        assert_eq!(response, "Okay.");
    }
}
