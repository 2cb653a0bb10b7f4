use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::common::utils::blank_to_none;
use crate::common::ClubId;
use crate::domains::clubs::models::ClubCategory;
use crate::domains::clubs::normalize_club_name;
use crate::domains::postings::models::{NewPosting, RoleCategory};
use crate::error::{ValidationError, MIN_DESCRIPTION_CHARS};

/// Raw form input for a new posting, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingDraft {
    pub club_name: String,
    pub club_category: ClubCategory,
    #[serde(default)]
    pub club_ig_handle: Option<String>,
    #[serde(default)]
    pub club_logo_url: Option<String>,
    pub title: String,
    pub role_category: RoleCategory,
    pub description: String,
    /// `YYYY-MM-DD`
    pub deadline: String,
    pub apply_url: String,
    pub ig_post_url: String,
}

/// A draft that passed every rule, with all text trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub club_name: String,
    pub club_category: ClubCategory,
    pub club_ig_handle: Option<String>,
    pub club_logo_url: Option<String>,
    pub title: String,
    pub role_category: RoleCategory,
    pub description: String,
    pub deadline: NaiveDate,
    pub apply_url: String,
    pub ig_post_url: String,
}

impl PostingDraft {
    /// Check the draft rule by rule, stopping at the first failure.
    ///
    /// Order: club name, title, description length, deadline present,
    /// deadline format, apply URL, source post URL.
    pub fn validate(&self) -> Result<ValidDraft, ValidationError> {
        let club_name = normalize_club_name(&self.club_name)?;

        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let description = self.description.trim();
        let length = description.chars().count();
        if length < MIN_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooShort { length });
        }

        let deadline = self.deadline.trim();
        if deadline.is_empty() {
            return Err(ValidationError::MissingDeadline);
        }
        let deadline = NaiveDate::parse_from_str(deadline, "%Y-%m-%d").map_err(|_| {
            ValidationError::InvalidDeadline {
                value: deadline.to_string(),
            }
        })?;

        let apply_url = self.apply_url.trim();
        if !is_web_url(apply_url) {
            return Err(ValidationError::InvalidApplyUrl);
        }

        let ig_post_url = self.ig_post_url.trim();
        if !is_web_url(ig_post_url) {
            return Err(ValidationError::InvalidSourcePostUrl);
        }

        Ok(ValidDraft {
            club_name,
            club_category: self.club_category,
            club_ig_handle: blank_to_none(self.club_ig_handle.as_deref()),
            club_logo_url: blank_to_none(self.club_logo_url.as_deref()),
            title: title.to_string(),
            role_category: self.role_category,
            description: description.to_string(),
            deadline,
            apply_url: apply_url.to_string(),
            ig_post_url: ig_post_url.to_string(),
        })
    }
}

impl ValidDraft {
    /// The posting row this draft becomes once its club is known.
    pub fn to_new_posting(&self, club_id: ClubId) -> NewPosting {
        NewPosting {
            club_id,
            title: self.title.clone(),
            category: self.role_category,
            description: self.description.clone(),
            deadline: self.deadline,
            apply_url: self.apply_url.clone(),
            ig_post_url: self.ig_post_url.clone(),
        }
    }
}

/// Non-empty and parses as an absolute `http`/`https` URL.
pub fn is_web_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
