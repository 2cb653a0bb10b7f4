use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::ClubId;
use crate::error::ValidationError;

/// Club - the organization that owns zero or more postings.
///
/// `name` is the logical identity of a club (compared case-insensitively) but
/// is not guaranteed unique by every backend; see `ClubRegistrar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub category: ClubCategory,
    pub ig_handle: Option<String>,
    pub logo_url: Option<String>,
    pub verified: bool,
}

/// Display attributes of a club as embedded in a joined posting row.
///
/// Read models stay string-typed so a row with an unexpected category still
/// loads; filtering compares the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubSummary {
    pub id: ClubId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub ig_handle: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

/// Attributes for a club about to be created. Always created unverified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClub {
    pub name: String,
    pub category: ClubCategory,
    pub ig_handle: Option<String>,
    pub logo_url: Option<String>,
}

impl NewClub {
    pub fn into_club(self, id: ClubId) -> Club {
        Club {
            id,
            name: self.name,
            category: self.category,
            ig_handle: self.ig_handle,
            logo_url: self.logo_url,
            verified: false,
        }
    }
}

impl From<&Club> for ClubSummary {
    fn from(club: &Club) -> Self {
        Self {
            id: club.id,
            name: club.name.clone(),
            category: club.category.to_string(),
            ig_handle: club.ig_handle.clone(),
            logo_url: club.logo_url.clone(),
            verified: club.verified,
        }
    }
}

// =============================================================================
// Club category
// =============================================================================

/// What kind of organization a club is. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClubCategory {
    Tech,
    Business,
    Cultural,
    Sports,
    Academic,
    Community,
    #[serde(rename = "Arts/Media")]
    ArtsMedia,
    #[serde(rename = "Student Gov")]
    StudentGov,
}

impl ClubCategory {
    pub const ALL: [ClubCategory; 8] = [
        Self::Tech,
        Self::Business,
        Self::Cultural,
        Self::Sports,
        Self::Academic,
        Self::Community,
        Self::ArtsMedia,
        Self::StudentGov,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "Tech",
            Self::Business => "Business",
            Self::Cultural => "Cultural",
            Self::Sports => "Sports",
            Self::Academic => "Academic",
            Self::Community => "Community",
            Self::ArtsMedia => "Arts/Media",
            Self::StudentGov => "Student Gov",
        }
    }
}

impl fmt::Display for ClubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClubCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory {
                kind: "club",
                value: s.to_string(),
            })
    }
}
