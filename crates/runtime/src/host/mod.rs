//! In-process virtual-actor host.
//!
//! Each identity is served by one tokio task draining an unbounded mailbox, so
//! commands for that identity execute one at a time in arrival order. The
//! [`ActorSystem`] maps identities to mailboxes and activates actors on first
//! use.

mod mailbox;
mod system;
pub(crate) mod timer;

pub use mailbox::{Actor, ActorRef, Reply};
pub use system::ActorSystem;

pub(crate) use mailbox::respond;
