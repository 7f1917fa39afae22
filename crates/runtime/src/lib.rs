//! Virtual-actor runtime for the adventure world.
//!
//! This crate hosts rooms, players and monsters as identity-addressed actors:
//! each identity runs one command at a time, persists its state after every
//! change, and reaches other actors only by identity through the
//! [`ActorSystem`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] holds the configuration and the builder
//! - [`host`] provides mailboxes, the registry and recurring timers
//! - [`actors`] implements the Room, Player and Monster behaviour
//! - [`api`] exposes errors and the observer contract for push messages
//! - [`events`] provides a topic-based bus of world changes
//! - [`repository`] persists actor state
//! - [`world`] loads map content and manages player sessions
pub mod actors;
pub mod api;
pub mod events;
pub mod host;
pub mod repository;
pub mod runtime;
pub mod world;

pub use actors::{MonsterRef, MonsterState, PlayerRef, PlayerState, RoomRef, RoomState};
pub use api::{ChannelObserver, MessageSink, ObserverId, ObserverSet, Result, RuntimeError};
pub use events::{Departure, EventBus, Topic, WorldEvent};
pub use host::ActorSystem;
pub use repository::{
    FileStateRepository, InMemoryStateRepo, RepositoryError, StateRepository, Storage,
};
pub use runtime::{RuntimeBuilder, RuntimeConfig};
pub use world::{Joined, configure_world, depart, join, join_as};
