//! In-memory board store for tests, demos and local development.
//!
//! Mirrors the relational backend closely enough to exercise the core:
//! postings reference clubs by id (checked on insert), listing left-joins the
//! club, and `insert_club` enforces no name uniqueness while `upsert_club` does
//! its check-and-insert under one write lock.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::common::utils::fold_case;
use crate::common::{ClubId, PostingId};
use crate::domains::clubs::models::{Club, ClubSummary, NewClub};
use crate::domains::postings::models::{NewPosting, Posting, PostingWithClub};
use crate::error::{BoardError, Result};
use crate::kernel::traits::BaseBoardStore;

#[derive(Default)]
struct Tables {
    clubs: Vec<Club>,
    postings: Vec<Posting>,
    last_created_at: Option<DateTime<Utc>>,
}

impl Tables {
    fn club_by_name(&self, name: &str) -> Option<&Club> {
        let key = fold_case(name);
        self.clubs.iter().find(|c| fold_case(&c.name) == key)
    }

    fn join(&self, posting: &Posting) -> PostingWithClub {
        let club = self
            .clubs
            .iter()
            .find(|c| c.id == posting.club_id)
            .map(ClubSummary::from);
        PostingWithClub::from_parts(posting.clone(), club)
    }

    /// Strictly increasing timestamps so "newest first" never ties.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created_at = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }
}

/// In-memory storage for clubs and postings. Data is lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a club row as-is, bypassing every check (seeding).
    pub async fn seed_club(&self, club: Club) {
        self.tables.write().await.clubs.push(club);
    }

    /// Store a posting row as-is, without checking that its club exists.
    ///
    /// Lets tests reproduce rows whose club no longer joins.
    pub async fn seed_posting(&self, posting: Posting) {
        let mut tables = self.tables.write().await;
        tables.last_created_at = tables.last_created_at.max(Some(posting.created_at));
        tables.postings.push(posting);
    }

    pub async fn club_count(&self) -> usize {
        self.tables.read().await.clubs.len()
    }

    pub async fn posting_count(&self) -> usize {
        self.tables.read().await.postings.len()
    }

    /// All stored clubs whose name equals `name` ignoring case.
    pub async fn clubs_named(&self, name: &str) -> Vec<Club> {
        let key = fold_case(name);
        self.tables
            .read()
            .await
            .clubs
            .iter()
            .filter(|c| fold_case(&c.name) == key)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BaseBoardStore for MemoryStore {
    async fn list_postings(&self) -> Result<Vec<PostingWithClub>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<PostingWithClub> = tables.postings.iter().map(|p| tables.join(p)).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_posting(&self, id: PostingId) -> Result<Option<PostingWithClub>> {
        let tables = self.tables.read().await;
        Ok(tables
            .postings
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.join(p)))
    }

    async fn find_club_by_name(&self, name: &str) -> Result<Option<ClubId>> {
        let found = self.tables.read().await.club_by_name(name).map(|c| c.id);
        debug!(name, found = found.is_some(), "club lookup");
        Ok(found)
    }

    async fn insert_club(&self, club: &NewClub) -> Result<ClubId> {
        let id = ClubId::new();
        self.tables
            .write()
            .await
            .clubs
            .push(club.clone().into_club(id));
        Ok(id)
    }

    async fn upsert_club(&self, club: &NewClub) -> Result<ClubId> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.club_by_name(club.name.trim()) {
            return Ok(existing.id);
        }
        let id = ClubId::new();
        tables.clubs.push(club.clone().into_club(id));
        Ok(id)
    }

    async fn insert_posting(&self, posting: &NewPosting) -> Result<Posting> {
        let mut tables = self.tables.write().await;
        if !tables.clubs.iter().any(|c| c.id == posting.club_id) {
            return Err(BoardError::remote(format!(
                "insert on table \"postings\" violates foreign key constraint: club {} does not exist",
                posting.club_id
            )));
        }
        let created_at = tables.next_created_at();
        let stored = posting.clone().into_posting(PostingId::new(), created_at);
        tables.postings.push(stored.clone());
        Ok(stored)
    }
}
