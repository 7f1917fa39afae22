//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate:
//! errors and the observer contract used to receive push notifications.

pub mod errors;
pub mod observer;

pub use errors::{Result, RuntimeError};
pub use observer::{ChannelObserver, MessageSink, ObserverId, ObserverSet};
