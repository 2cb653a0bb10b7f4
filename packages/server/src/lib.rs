// Club Board - student club role postings core
//
// Browse postings joined with their clubs, filter them by role, club category
// and free text, and submit new postings with club resolve-or-create.
//
// Storage sits behind kernel::BaseBoardStore (Postgres, REST query API or
// in-memory); the `board` binary is a thin presentation layer on top.

pub mod common;
pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;

pub use config::*;
pub use error::{BoardError, Result, ValidationError};
