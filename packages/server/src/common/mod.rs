// Common types and utilities shared across the board's domains

pub mod entity_ids;
pub mod id;
pub mod utils;

pub use entity_ids::*;
pub use id::Id;
