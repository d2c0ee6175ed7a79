//! Typed access to the backend's five record collections.

pub mod memory;
pub mod pg;
pub mod store;

pub use memory::{MemoryStore, StoreOp};
pub use pg::PgStore;
pub use store::RecordStore;
