//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from mailbox coordination and repositories so the transport
//! can decide what to retry and what to report.
use std::time::Duration;

use adventure_core::ActorKey;
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("mailbox of {actor} is closed")]
    MailboxClosed { actor: ActorKey },

    #[error("{actor} dropped the reply")]
    ReplyDropped {
        actor: ActorKey,
        #[source]
        source: oneshot::error::RecvError,
    },

    #[error("call to {actor} timed out after {timeout:?}")]
    CallTimeout { actor: ActorKey, timeout: Duration },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("actor system is shutting down")]
    ShuttingDown,
}

impl RuntimeError {
    /// Whether the command provably never reached the actor.
    ///
    /// Only a closed mailbox qualifies. A timeout or a dropped reply may come
    /// after the command took effect, so repeating it could apply it twice.
    /// Retry by resolving the identity again through the [`ActorSystem`],
    /// which reactivates a stopped actor.
    ///
    /// [`ActorSystem`]: crate::ActorSystem
    pub fn is_retryable(&self) -> bool {
        matches!(self, RuntimeError::MailboxClosed { .. })
    }
}

#[cfg(test)]
mod tests {
    use adventure_core::RoomId;

    use super::*;

    #[test]
    fn only_undelivered_commands_are_retryable() {
        let actor = ActorKey::Room(RoomId(1));
        assert!(RuntimeError::MailboxClosed { actor }.is_retryable());
        assert!(
            !RuntimeError::CallTimeout {
                actor,
                timeout: Duration::from_secs(1)
            }
            .is_retryable()
        );
        assert!(!RuntimeError::ShuttingDown.is_retryable());
        assert!(!RuntimeError::Repository(RepositoryError::LockPoisoned).is_retryable());
    }

    #[tokio::test]
    async fn dropped_reply_is_not_retryable() {
        let (reply, rx) = oneshot::channel::<()>();
        drop(reply);
        let source = rx.await.unwrap_err();

        let err = RuntimeError::ReplyDropped {
            actor: ActorKey::Room(RoomId(1)),
            source,
        };
        assert!(!err.is_retryable());
    }
}
