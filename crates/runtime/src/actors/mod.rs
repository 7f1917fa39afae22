//! The three actor kinds that make up a world.
//!
//! Each module holds the persisted state, the mailbox command enum, the
//! worker behaviour and a typed reference with one async method per
//! operation.

mod monster;
mod player;
mod room;

pub use monster::{MonsterActor, MonsterCommand, MonsterRef, MonsterState};
pub use player::{PlayerActor, PlayerCommand, PlayerRef, PlayerState};
pub use room::{RoomActor, RoomCommand, RoomRef, RoomState};
