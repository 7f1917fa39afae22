//! Push-notification channel from a player actor to its listeners.
//!
//! Delivery is fire-and-forget: a listener that has gone away is pruned on the
//! next notification and never fails the notifying operation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl ObserverId {
    pub fn next() -> Self {
        Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// Receiver of asynchronous text messages.
pub trait MessageSink: Send + Sync {
    /// Hands one message to the listener. Returns `false` once the listener
    /// is gone for good.
    fn deliver(&self, message: &str) -> bool;
}

/// Sink backed by an unbounded channel; the transport drains the receiver.
#[derive(Clone, Debug)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MessageSink for ChannelObserver {
    fn deliver(&self, message: &str) -> bool {
        self.tx.send(message.to_string()).is_ok()
    }
}

/// Subscriber list owned by one player actor. Not persisted.
#[derive(Default)]
pub struct ObserverSet {
    sinks: HashMap<ObserverId, Arc<dyn MessageSink>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Arc<dyn MessageSink>) -> ObserverId {
        let id = ObserverId::next();
        self.sinks.insert(id, sink);
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.sinks.remove(&id).is_some()
    }

    /// Sends `message` to every subscriber and prunes the ones that are gone.
    ///
    /// Returns how many subscribers accepted the message.
    pub fn notify(&mut self, message: &str) -> usize {
        self.sinks.retain(|id, sink| {
            let alive = sink.deliver(message);
            if !alive {
                tracing::debug!(observer = %id, "pruning closed observer");
            }
            alive
        });
        self.sinks.len()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("subscribers", &self.sinks.len())
            .finish()
    }
}
