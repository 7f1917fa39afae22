//! Repository layer for durable actor state.
//!
//! Every actor persists its own state under its [`ActorKey`](adventure_core::ActorKey)
//! at the tail of each mutating operation:
//! - [`StateRepository`] stores opaque bytes per key
//! - [`Storage`] encodes typed actor state with bincode on top of a repository
//!
//! Static world content (rooms, things, monsters) lives in map files and is
//! pushed into actors at bootstrap, not read from here.

mod error;
mod file;
mod memory;
mod storage;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStateRepository;
pub use memory::InMemoryStateRepo;
pub use storage::Storage;
pub use traits::StateRepository;
