//! Resolve-or-create for clubs named in a submission.
//!
//! `LookupThenInsert` reads before it writes, so two concurrent submissions
//! for a brand-new name can both miss the lookup and both insert: the store
//! then holds two rows for one logical club, and later lookups return either
//! of them. `AtomicUpsert` hands the whole decision to the store's
//! uniqueness-guarded `upsert_club`, which closes that window.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::common::utils::blank_to_none;
use crate::common::ClubId;
use crate::domains::clubs::models::{ClubCategory, NewClub};
use crate::error::{Result, ValidationError, MIN_CLUB_NAME_CHARS};
use crate::kernel::BaseBoardStore;

/// How a club name is mapped onto a club row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationMode {
    /// Case-insensitive lookup, insert when nothing matched.
    #[default]
    LookupThenInsert,
    /// Single conflict-aware insert against a unique normalized name.
    AtomicUpsert,
}

/// Trim a submitted club name and enforce the minimum length.
pub fn normalize_club_name(name: &str) -> std::result::Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_CLUB_NAME_CHARS {
        return Err(ValidationError::ClubNameTooShort);
    }
    Ok(trimmed.to_string())
}

/// Maps club names to stable club ids, creating clubs on first use.
#[derive(Clone)]
pub struct ClubRegistrar {
    store: Arc<dyn BaseBoardStore>,
    mode: RegistrationMode,
}

impl ClubRegistrar {
    pub fn new(store: Arc<dyn BaseBoardStore>, mode: RegistrationMode) -> Self {
        Self { store, mode }
    }

    /// Return the id of the club called `name` (ignoring case and surrounding
    /// whitespace), creating an unverified club when none exists.
    ///
    /// The stored name keeps the submitted casing. Blank handle/logo values
    /// are stored as absent. Attributes of an existing club are never changed.
    pub async fn resolve_or_create(
        &self,
        name: &str,
        category: ClubCategory,
        ig_handle: Option<&str>,
        logo_url: Option<&str>,
    ) -> Result<ClubId> {
        let name = normalize_club_name(name)?;
        let club = NewClub {
            name,
            category,
            ig_handle: blank_to_none(ig_handle),
            logo_url: blank_to_none(logo_url),
        };

        match self.mode {
            RegistrationMode::LookupThenInsert => {
                if let Some(id) = self.store.find_club_by_name(&club.name).await? {
                    debug!(club_id = %id, name = %club.name, "club already registered");
                    return Ok(id);
                }
                let id = self.store.insert_club(&club).await?;
                info!(club_id = %id, name = %club.name, category = %club.category, "club created");
                Ok(id)
            }
            RegistrationMode::AtomicUpsert => {
                let id = self.store.upsert_club(&club).await?;
                debug!(club_id = %id, name = %club.name, "club resolved by upsert");
                Ok(id)
            }
        }
    }
}
