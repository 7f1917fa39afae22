//! Bounded retries for commands that never reached their actor.
use std::future::Future;
use std::time::Duration;

use runtime::Result;
use tracing::warn;

/// Fixed-backoff retry for errors that report themselves retryable.
///
/// The operation should resolve its actor inside the closure so that each
/// attempt addresses a live worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            backoff: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    warn!(attempt, "transient failure, retrying: {}", e);
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use adventure_core::{ActorKey, RoomId};
    use runtime::RuntimeError;

    use super::*;

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            backoff: Duration::ZERO,
        }
    }

    fn closed() -> RuntimeError {
        RuntimeError::MailboxClosed {
            actor: ActorKey::Room(RoomId(1)),
        }
    }

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let mut calls = 0;
        let result = policy(5)
            .run(|| {
                calls += 1;
                let outcome = if calls < 3 { Err(closed()) } else { Ok(calls) };
                async move { outcome }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_last_attempt() {
        let mut calls = 0;
        let result: Result<()> = policy(2)
            .run(|| {
                calls += 1;
                async { Err(closed()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let mut calls = 0;
        let result: Result<()> = policy(5)
            .run(|| {
                calls += 1;
                async { Err(RuntimeError::ShuttingDown) }
            })
            .await;

        assert!(matches!(result, Err(RuntimeError::ShuttingDown)));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn timeouts_are_not_retried() {
        let mut calls = 0;
        let result: Result<()> = policy(5)
            .run(|| {
                calls += 1;
                async {
                    Err(RuntimeError::CallTimeout {
                        actor: ActorKey::Room(RoomId(1)),
                        timeout: Duration::from_millis(100),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(RuntimeError::CallTimeout { .. })));
        assert_eq!(calls, 1);
    }
}
