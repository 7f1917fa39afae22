//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use super::types::WorldEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, strum::Display)]
pub enum Topic {
    /// Players and monsters entering or leaving rooms
    Movement,
    /// Deaths
    Combat,
    /// Whispers and shouts
    Chat,
    /// Things taken from or dropped into rooms
    Items,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Movement, Topic::Combat, Topic::Chat, Topic::Items];
}

/// Topic-based event bus
///
/// Rooms publish every state change here. Consumers subscribe to the topics
/// they care about; publishing never blocks and never fails the publisher.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<WorldEvent>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: WorldEvent) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<WorldEvent> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is created up front; this arm only exists for totality.
            None => broadcast::channel(1).1,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
