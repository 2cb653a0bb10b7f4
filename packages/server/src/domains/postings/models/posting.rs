use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::{ClubId, PostingId};
use crate::domains::clubs::models::ClubSummary;
use crate::error::ValidationError;

/// Posting - a single advertised club role.
///
/// Created once at submission time and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub id: PostingId,
    pub club_id: ClubId,
    pub title: String,
    pub category: RoleCategory,
    pub description: String,
    pub deadline: NaiveDate,
    pub apply_url: String,
    pub ig_post_url: String,
    pub created_at: DateTime<Utc>,
}

/// A posting to insert. Fields are already validated and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPosting {
    pub club_id: ClubId,
    pub title: String,
    pub category: RoleCategory,
    pub description: String,
    pub deadline: NaiveDate,
    pub apply_url: String,
    pub ig_post_url: String,
}

impl NewPosting {
    pub fn into_posting(self, id: PostingId, created_at: DateTime<Utc>) -> Posting {
        Posting {
            id,
            club_id: self.club_id,
            title: self.title,
            category: self.category,
            description: self.description,
            deadline: self.deadline,
            apply_url: self.apply_url,
            ig_post_url: self.ig_post_url,
            created_at,
        }
    }
}

/// A posting joined with its owning club, as browsed.
///
/// `club` is `None` when the join found no club row. Text fields are kept as
/// stored; a missing role category is `None` and filters as the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingWithClub {
    pub id: PostingId,
    pub club_id: Option<ClubId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub apply_url: String,
    #[serde(default)]
    pub ig_post_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub club: Option<ClubSummary>,
}

impl PostingWithClub {
    pub fn from_parts(posting: Posting, club: Option<ClubSummary>) -> Self {
        Self {
            id: posting.id,
            club_id: Some(posting.club_id),
            title: posting.title,
            category: Some(posting.category.to_string()),
            description: posting.description,
            deadline: Some(posting.deadline),
            apply_url: posting.apply_url,
            ig_post_url: posting.ig_post_url,
            created_at: posting.created_at,
            club,
        }
    }

    pub fn role_category(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn club_name(&self) -> &str {
        self.club.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn club_category(&self) -> &str {
        self.club.as_ref().map(|c| c.category.as_str()).unwrap_or("")
    }

    /// One-line summary: `title • club • club category • role • deadline`.
    pub fn headline(&self) -> String {
        let mut line = if self.title.is_empty() {
            "Untitled role".to_string()
        } else {
            self.title.clone()
        };
        line.push_str(" • ");
        line.push_str(match self.club_name() {
            "" => "Unknown club",
            name => name,
        });
        for part in [self.club_category(), self.role_category()] {
            if !part.is_empty() {
                line.push_str(" • ");
                line.push_str(part);
            }
        }
        if let Some(deadline) = self.deadline {
            line.push_str(&format!(" • Deadline: {}", deadline.format("%Y-%m-%d")));
        }
        line
    }
}

// =============================================================================
// Role category
// =============================================================================

/// What kind of work a posting is. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleCategory {
    Engineering,
    Design,
    Marketing,
    Product,
    Operations,
    Finance,
    Research,
    Events,
    Content,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 9] = [
        Self::Engineering,
        Self::Design,
        Self::Marketing,
        Self::Product,
        Self::Operations,
        Self::Finance,
        Self::Research,
        Self::Events,
        Self::Content,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engineering => "Engineering",
            Self::Design => "Design",
            Self::Marketing => "Marketing",
            Self::Product => "Product",
            Self::Operations => "Operations",
            Self::Finance => "Finance",
            Self::Research => "Research",
            Self::Events => "Events",
            Self::Content => "Content",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory {
                kind: "role",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PostingWithClub {
        PostingWithClub {
            id: PostingId::new(),
            club_id: None,
            title: "Frontend Dev".into(),
            category: Some("Engineering".into()),
            description: String::new(),
            deadline: NaiveDate::from_ymd_opt(2026, 1, 31),
            apply_url: String::new(),
            ig_post_url: String::new(),
            created_at: Utc::now(),
            club: None,
        }
    }

    #[test]
    fn role_categories_round_trip_through_from_str() {
        for category in RoleCategory::ALL {
            assert_eq!(category.as_str().parse::<RoleCategory>(), Ok(category));
        }
        assert!("engineering".parse::<RoleCategory>().is_err());
    }

    #[test]
    fn missing_club_reads_as_empty_strings() {
        let posting = sample();
        assert_eq!(posting.club_name(), "");
        assert_eq!(posting.club_category(), "");
    }

    #[test]
    fn missing_category_reads_as_empty_string() {
        let mut posting = sample();
        posting.category = None;
        assert_eq!(posting.role_category(), "");
    }

    #[test]
    fn headline_skips_missing_parts() {
        let posting = sample();
        assert_eq!(
            posting.headline(),
            "Frontend Dev • Unknown club • Engineering • Deadline: 2026-01-31"
        );
    }
}
