//! Recurring self-addressed messages.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Posts `make()` into `mailbox` every `period`, first after one period.
///
/// The timer holds only a weak sender: it stops on its own once the actor's
/// mailbox is gone. Abort the returned handle to stop it earlier.
pub(crate) fn every<C, F>(
    mailbox: mpsc::WeakUnboundedSender<C>,
    period: Duration,
    mut make: F,
) -> JoinHandle<()>
where
    C: Send + 'static,
    F: FnMut() -> C + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(tx) = mailbox.upgrade() else {
                break;
            };
            if tx.send(make()).is_err() {
                break;
            }
        }
    })
}
