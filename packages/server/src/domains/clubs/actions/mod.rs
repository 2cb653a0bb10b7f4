//! Club domain actions

mod resolve;

pub use resolve::{normalize_club_name, ClubRegistrar, RegistrationMode};
