//! Kernel module - storage infrastructure behind the board domains.

pub mod stores;
pub mod test_dependencies;
pub mod traits;

pub use stores::{MemoryStore, PostgresStore, RestStore};
pub use test_dependencies::{CountingStore, FailingStore, GatedStore, StallingStore, StoreCall};
pub use traits::*;
