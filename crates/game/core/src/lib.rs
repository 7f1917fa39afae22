//! World vocabulary shared by the actor runtime, the content loaders and the
//! transport.
//!
//! `adventure-core` defines the identifiers actors are addressed by, the
//! immutable value records exchanged between actors, the text command parser
//! and every narrative line the world produces. Nothing here performs I/O or
//! knows about mailboxes; the runtime crate owns all mutable state.
pub mod command;
pub mod direction;
pub mod ids;
pub mod info;
pub mod narrative;

pub use command::{Command, parse_command};
pub use direction::Direction;
pub use ids::{ActorKey, ActorKind, MonsterId, PlayerKey, RoomId, ThingId};
pub use info::{MonsterInfo, Occupant, PlayerInfo, RoomInfo, Thing, WEAPON_CATEGORY};
