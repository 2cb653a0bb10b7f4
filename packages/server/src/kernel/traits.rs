// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Validation, dedup policy and filtering live in the domains and call these.
//
// Naming convention: Base* for trait names (e.g., BaseBoardStore)

use async_trait::async_trait;
use std::sync::Arc;

use crate::common::{ClubId, PostingId};
use crate::domains::clubs::models::NewClub;
use crate::domains::postings::models::{NewPosting, Posting, PostingWithClub};
use crate::error::Result;

// =============================================================================
// Board store (the remote record store)
// =============================================================================

/// The query-capable record store holding clubs and postings.
///
/// Every failure is reported as `BoardError::Remote` with the backend's own
/// message.
#[async_trait]
pub trait BaseBoardStore: Send + Sync {
    /// All postings with their club left-joined, newest `created_at` first.
    async fn list_postings(&self) -> Result<Vec<PostingWithClub>>;

    /// One posting with its club, or `None` when no row has this id.
    async fn find_posting(&self, id: PostingId) -> Result<Option<PostingWithClub>>;

    /// Any club whose stored name equals `name` ignoring case.
    ///
    /// With several matches the choice is unspecified.
    async fn find_club_by_name(&self, name: &str) -> Result<Option<ClubId>>;

    /// Create a club row unconditionally (`verified = false`).
    async fn insert_club(&self, club: &NewClub) -> Result<ClubId>;

    /// Create the club unless one with the same normalized name exists, in a
    /// single atomic step. Returns the id of whichever row now owns the name;
    /// an existing row is left untouched.
    async fn upsert_club(&self, club: &NewClub) -> Result<ClubId>;

    /// Insert a posting and return the stored row.
    async fn insert_posting(&self, posting: &NewPosting) -> Result<Posting>;
}

/// Shared handles are stores too, so doubles can wrap a store the caller keeps.
#[async_trait]
impl<T: BaseBoardStore + ?Sized> BaseBoardStore for Arc<T> {
    async fn list_postings(&self) -> Result<Vec<PostingWithClub>> {
        (**self).list_postings().await
    }

    async fn find_posting(&self, id: PostingId) -> Result<Option<PostingWithClub>> {
        (**self).find_posting(id).await
    }

    async fn find_club_by_name(&self, name: &str) -> Result<Option<ClubId>> {
        (**self).find_club_by_name(name).await
    }

    async fn insert_club(&self, club: &NewClub) -> Result<ClubId> {
        (**self).insert_club(club).await
    }

    async fn upsert_club(&self, club: &NewClub) -> Result<ClubId> {
        (**self).upsert_club(club).await
    }

    async fn insert_posting(&self, posting: &NewPosting) -> Result<Posting> {
        (**self).insert_posting(posting).await
    }
}
