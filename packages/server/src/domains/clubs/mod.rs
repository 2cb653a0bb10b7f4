// Clubs domain - the organizations that own postings
//
// Responsibilities:
// - Club model and the fixed club category set
// - Resolving a submitted club name to a club id (ClubRegistrar)

pub mod actions;
pub mod models;

pub use actions::*;
pub use models::*;
