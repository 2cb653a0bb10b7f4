//! Filter engine for browsed postings.
//!
//! A pure function of (postings snapshot, filter state): no I/O, no hidden
//! state. Three predicates are combined with AND:
//!
//! - role: wildcard, or the posting's role category equals the selection
//! - club: wildcard, or the joined club's category equals the selection
//! - text: blank query, or the trimmed case-folded query is a substring of the
//!   title, the description or the club name
//!
//! A posting whose club did not join reads as empty club fields. Input order is
//! preserved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::utils::fold_case;
use crate::domains::clubs::models::ClubCategory;
use crate::domains::postings::models::{PostingWithClub, RoleCategory};
use crate::error::ValidationError;

/// Label of the wildcard selection.
pub const ALL_LABEL: &str = "All";

/// A category selection: the wildcard or one concrete category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: fmt::Display> Selection<T> {
    /// True for the wildcard, otherwise compares against the selection's text.
    fn admits(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected.to_string() == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_LABEL),
            Selection::Only(selected) => selected.fmt(f),
        }
    }
}

impl<T: FromStr<Err = ValidationError>> FromStr for Selection<T> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_LABEL {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

/// Current search/category constraints. Transient and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub role: Selection<RoleCategory>,
    pub club: Selection<ClubCategory>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_role(mut self, role: Selection<RoleCategory>) -> Self {
        self.role = role;
        self
    }

    pub fn with_club(mut self, club: Selection<ClubCategory>) -> Self {
        self.club = club;
        self
    }

    /// Whether `posting` passes all three predicates.
    pub fn matches(&self, posting: &PostingWithClub) -> bool {
        let needle = fold_case(self.query.trim());
        self.matches_folded(posting, &needle)
    }

    fn matches_folded(&self, posting: &PostingWithClub, needle: &str) -> bool {
        let role_ok = self.role.admits(posting.role_category());
        let club_ok = self.club.admits(posting.club_category());
        let text_ok = needle.is_empty()
            || [
                posting.title.as_str(),
                posting.description.as_str(),
                posting.club_name(),
            ]
            .iter()
            .any(|field| fold_case(field).contains(needle));

        role_ok && club_ok && text_ok
    }
}

/// Apply `state` to `postings`, keeping matches in their original order.
pub fn filter_postings(postings: &[PostingWithClub], state: &FilterState) -> Vec<PostingWithClub> {
    let needle = fold_case(state.query.trim());
    postings
        .iter()
        .filter(|p| state.matches_folded(p, &needle))
        .cloned()
        .collect()
}
