//! Test fixtures for building drafts and seeding stores.

use club_board::domains::clubs::{ClubCategory, NewClub};
use club_board::domains::postings::RoleCategory;
use club_board::domains::submissions::PostingDraft;
use uuid::Uuid;

/// A draft that passes every validation rule.
pub fn valid_draft(club_name: &str, title: &str) -> PostingDraft {
    PostingDraft {
        club_name: club_name.to_string(),
        club_category: ClubCategory::Tech,
        club_ig_handle: None,
        club_logo_url: None,
        title: title.to_string(),
        role_category: RoleCategory::Engineering,
        description: "Help us build and ship the club's projects this term.".to_string(),
        deadline: "2026-03-01".to_string(),
        apply_url: "https://forms.example.com/apply".to_string(),
        ig_post_url: "https://www.instagram.com/p/example/".to_string(),
    }
}

pub fn new_club(name: &str, category: ClubCategory) -> NewClub {
    NewClub {
        name: name.to_string(),
        category,
        ig_handle: None,
        logo_url: None,
    }
}

/// A club name no other test uses, for tests sharing one database.
pub fn unique_club_name(prefix: &str) -> String {
    format!("{} {}", prefix, Uuid::new_v4().simple())
}
