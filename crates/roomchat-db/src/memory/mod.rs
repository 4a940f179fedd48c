//! In-memory repository implementations
//!
//! Process-local storage backed by `DashMap`, used by single-node deployments
//! (`STORAGE_BACKEND=memory`) and by tests. Each operation that must be atomic
//! holds the relevant map entry for its whole duration.

mod identity;
mod message;
mod room;

pub use identity::MemoryIdentityRepository;
pub use message::MemoryMessageRepository;
pub use room::MemoryRoomRepository;
