//! Topic-based event bus for world events.
//!
//! Rooms publish every change to their occupants or floor here, so tools and
//! tests can watch the world without subscribing to individual players.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{Departure, WorldEvent};
