// Postings domain - browsing advertised club roles
//
// Responsibilities:
// - Posting model and the fixed role category set
// - Fetching the joined posting snapshot and single-posting detail (PostingFeed)
// - Filtering the snapshot by role, club category and free text

pub mod actions;
pub mod filter;
pub mod models;

pub use actions::*;
pub use filter::*;
pub use models::*;
