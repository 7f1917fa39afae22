//! Per-identity mailboxes and the worker loop that drains them.

use std::fmt;
use std::time::Duration;

use adventure_core::ActorKey;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{Result, RuntimeError};

/// Reply slot carried by every request command.
pub type Reply<T> = oneshot::Sender<Result<T>>;

/// Answers a request, tolerating callers that gave up waiting.
pub(crate) fn respond<T>(reply: Reply<T>, result: Result<T>) {
    if reply.send(result).is_err() {
        debug!("reply channel closed (caller dropped)");
    }
}

/// Behaviour of one actor kind.
///
/// The worker owns the actor exclusively, so `handle` runs one command at a
/// time in mailbox order.
#[async_trait]
pub trait Actor: Send + 'static {
    type Command: Send + 'static;

    fn key(&self) -> ActorKey;

    /// Runs once on the worker's behalf before the first command.
    fn started(&mut self, _mailbox: &mpsc::UnboundedSender<Self::Command>) {}

    async fn handle(&mut self, command: Self::Command);

    /// Runs once after the mailbox closes.
    fn stopped(&mut self) {}
}

/// Address of a live actor: identity plus mailbox sender.
///
/// Mailboxes are unbounded so that `tell` never waits and never reorders:
/// every command from one sender lands in the queue in the order it was sent.
pub struct ActorRef<C> {
    key: ActorKey,
    tx: mpsc::UnboundedSender<C>,
    call_timeout: Duration,
}

impl<C> Clone for ActorRef<C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            tx: self.tx.clone(),
            call_timeout: self.call_timeout,
        }
    }
}

impl<C> fmt::Debug for ActorRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("key", &self.key)
            .field("alive", &!self.tx.is_closed())
            .finish()
    }
}

impl<C: Send + 'static> ActorRef<C> {
    pub fn key(&self) -> ActorKey {
        self.key
    }

    pub fn is_alive(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Sends a request and waits for its reply, bounded by the call timeout.
    pub async fn call<T>(&self, request: impl FnOnce(Reply<T>) -> C) -> Result<T> {
        let actor = self.key;
        let (reply_tx, reply_rx) = oneshot::channel();

        let exchange = async move {
            self.tx
                .send(request(reply_tx))
                .map_err(|_| RuntimeError::MailboxClosed { actor })?;

            reply_rx
                .await
                .map_err(|source| RuntimeError::ReplyDropped { actor, source })?
        };

        tokio::time::timeout(self.call_timeout, exchange)
            .await
            .map_err(|_| RuntimeError::CallTimeout {
                actor,
                timeout: self.call_timeout,
            })?
    }

    /// Enqueues a command without waiting for the actor.
    pub fn tell(&self, command: C) {
        if self.tx.send(command).is_err() {
            debug!(actor = %self.key, "dropping message for stopped actor");
        }
    }
}

/// Starts a worker task for `actor` and returns its address.
pub(crate) fn spawn<A: Actor>(
    mut actor: A,
    call_timeout: Duration,
) -> (ActorRef<A::Command>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let key = actor.key();

    actor.started(&tx);
    let task = tokio::spawn(run(actor, rx));

    debug!(actor = %key, "activated");
    (
        ActorRef {
            key,
            tx,
            call_timeout,
        },
        task,
    )
}

async fn run<A: Actor>(mut actor: A, mut mailbox: mpsc::UnboundedReceiver<A::Command>) {
    while let Some(command) = mailbox.recv().await {
        actor.handle(command).await;
    }
    actor.stopped();
    debug!(actor = %actor.key(), "deactivated");
}

#[cfg(test)]
mod tests {
    use adventure_core::RoomId;

    use super::*;

    enum CounterCommand {
        Add(u32),
        Get { reply: Reply<u32> },
        Hang { reply: Reply<u32> },
    }

    struct Counter {
        total: u32,
        parked: Vec<Reply<u32>>,
    }

    #[async_trait]
    impl Actor for Counter {
        type Command = CounterCommand;

        fn key(&self) -> ActorKey {
            ActorKey::Room(RoomId(0))
        }

        async fn handle(&mut self, command: CounterCommand) {
            match command {
                CounterCommand::Add(n) => self.total += n,
                CounterCommand::Get { reply } => respond(reply, Ok(self.total)),
                CounterCommand::Hang { reply } => self.parked.push(reply),
            }
        }
    }

    fn counter() -> Counter {
        Counter {
            total: 0,
            parked: Vec::new(),
        }
    }

    #[tokio::test]
    async fn tells_are_processed_in_order_before_later_calls() {
        let (counter, _task) = spawn(counter(), Duration::from_secs(1));
        for n in 1..=10 {
            counter.tell(CounterCommand::Add(n));
        }

        let total = counter
            .call(|reply| CounterCommand::Get { reply })
            .await
            .unwrap();
        assert_eq!(total, 55);
    }

    enum RecorderCommand {
        Push(u32),
        Take { reply: Reply<Vec<u32>> },
    }

    struct Recorder {
        seen: Vec<u32>,
    }

    #[async_trait]
    impl Actor for Recorder {
        type Command = RecorderCommand;

        fn key(&self) -> ActorKey {
            ActorKey::Room(RoomId(1))
        }

        async fn handle(&mut self, command: RecorderCommand) {
            match command {
                RecorderCommand::Push(n) => {
                    self.seen.push(n);
                    tokio::task::yield_now().await;
                }
                RecorderCommand::Take { reply } => {
                    respond(reply, Ok(std::mem::take(&mut self.seen)));
                }
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn tells_keep_order_under_load() {
        let (recorder, _task) = spawn(Recorder { seen: Vec::new() }, Duration::from_secs(5));
        for n in 0..2000 {
            recorder.tell(RecorderCommand::Push(n));
        }

        let seen = recorder
            .call(|reply| RecorderCommand::Take { reply })
            .await
            .unwrap();
        assert_eq!(seen, (0..2000).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn unanswered_call_times_out() {
        let (counter, _task) = spawn(counter(), Duration::from_millis(20));

        let err = counter
            .call(|reply| CounterCommand::Hang { reply })
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::CallTimeout { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn stopped_worker_reports_closed_mailbox() {
        let (counter, task) = spawn(counter(), Duration::from_secs(1));
        task.abort();
        let _ = task.await;

        assert!(!counter.is_alive());
        let err = counter
            .call(|reply| CounterCommand::Get { reply })
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::MailboxClosed { .. }));
    }
}
