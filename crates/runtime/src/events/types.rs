//! Event types published by rooms.

use adventure_core::{ActorKey, RoomId, Thing};

/// Why an occupant left a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// Walked through an exit.
    Exit,
    /// Left the game.
    Leave,
}

/// A change in some room, as seen from outside the actors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    Entered {
        room: RoomId,
        who: ActorKey,
        name: String,
    },
    Left {
        room: RoomId,
        who: ActorKey,
        name: String,
        how: Departure,
    },
    Died {
        room: RoomId,
        victim: String,
        killer: Option<String>,
        weapon: Option<String>,
    },
    Whispered {
        room: RoomId,
        sender: String,
        words: String,
    },
    Shouted {
        room: RoomId,
        sender: String,
        words: String,
    },
    ThingTaken {
        room: RoomId,
        thing: Thing,
    },
    ThingDropped {
        room: RoomId,
        thing: Thing,
    },
}

impl WorldEvent {
    pub fn topic(&self) -> super::Topic {
        use super::Topic;

        match self {
            WorldEvent::Entered { .. } | WorldEvent::Left { .. } => Topic::Movement,
            WorldEvent::Died { .. } => Topic::Combat,
            WorldEvent::Whispered { .. } | WorldEvent::Shouted { .. } => Topic::Chat,
            WorldEvent::ThingTaken { .. } | WorldEvent::ThingDropped { .. } => Topic::Items,
        }
    }

    pub fn room(&self) -> RoomId {
        match self {
            WorldEvent::Entered { room, .. }
            | WorldEvent::Left { room, .. }
            | WorldEvent::Died { room, .. }
            | WorldEvent::Whispered { room, .. }
            | WorldEvent::Shouted { room, .. }
            | WorldEvent::ThingTaken { room, .. }
            | WorldEvent::ThingDropped { room, .. } => *room,
        }
    }
}
