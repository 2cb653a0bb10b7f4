//! Board store backends.

pub mod memory;
pub mod postgres;
pub mod rest;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use rest::RestStore;
