//! Record fetcher for the browsing screen.
//!
//! `PostingFeed` holds the last snapshot fetched successfully. Nothing but
//! `refresh()` replaces it; filtering only reads it. The presentation layer
//! decides when to refresh (on focus, pull-to-refresh, after a submission).

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::common::utils::bounded;
use crate::common::PostingId;
use crate::domains::postings::filter::{filter_postings, FilterState};
use crate::domains::postings::models::PostingWithClub;
use crate::error::{BoardError, Result};
use crate::kernel::BaseBoardStore;

pub struct PostingFeed {
    store: Arc<dyn BaseBoardStore>,
    timeout: Duration,
    snapshot: Vec<PostingWithClub>,
}

impl PostingFeed {
    pub fn new(store: Arc<dyn BaseBoardStore>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            snapshot: Vec::new(),
        }
    }

    /// Re-fetch every posting, newest first.
    ///
    /// On failure the error is returned and the previous snapshot is kept.
    pub async fn refresh(&mut self) -> Result<&[PostingWithClub]> {
        let fetched = bounded(self.timeout, self.store.list_postings()).await;
        match fetched {
            Ok(postings) => {
                info!(count = postings.len(), "postings refreshed");
                self.snapshot = postings;
                Ok(&self.snapshot)
            }
            Err(e) => {
                warn!(error = %e, kept = self.snapshot.len(), "posting refresh failed");
                Err(e)
            }
        }
    }

    /// The last successfully fetched postings.
    pub fn snapshot(&self) -> &[PostingWithClub] {
        &self.snapshot
    }

    /// The snapshot narrowed by `state`, in snapshot order.
    pub fn visible(&self, state: &FilterState) -> Vec<PostingWithClub> {
        filter_postings(&self.snapshot, state)
    }

    /// Fetch one posting with its club for the detail view.
    pub async fn load_posting(&self, id: PostingId) -> Result<PostingWithClub> {
        let found = bounded(self.timeout, self.store.find_posting(id)).await?;
        debug!(%id, found = found.is_some(), "posting lookup");
        found.ok_or(BoardError::NotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::clubs::models::{ClubCategory, NewClub};
    use crate::domains::postings::filter::Selection;
    use crate::domains::postings::models::{NewPosting, RoleCategory};
    use crate::kernel::{FailingStore, MemoryStore, StallingStore, StoreCall};
    use chrono::NaiveDate;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (club, club_category, title, role) in [
            ("Launch Pad", ClubCategory::Tech, "Frontend Dev", RoleCategory::Engineering),
            ("AMS", ClubCategory::StudentGov, "Marketing Lead", RoleCategory::Marketing),
        ] {
            let club_id = store
                .insert_club(&NewClub {
                    name: club.into(),
                    category: club_category,
                    ig_handle: None,
                    logo_url: None,
                })
                .await
                .unwrap();
            store
                .insert_posting(&NewPosting {
                    club_id,
                    title: title.into(),
                    category: role,
                    description: "Join the team and help us run events this year.".into(),
                    deadline: NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
                    apply_url: "https://forms.example.com/apply".into(),
                    ig_post_url: "https://instagram.com/p/post".into(),
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot_newest_first() {
        let mut feed = PostingFeed::new(Arc::new(seeded().await), Duration::from_secs(5));
        assert!(feed.snapshot().is_empty());

        let titles: Vec<String> = feed
            .refresh()
            .await
            .unwrap()
            .iter()
            .map(|p| p.title.clone())
            .collect();
        assert_eq!(titles, vec!["Marketing Lead", "Frontend Dev"]);
    }

    #[tokio::test]
    async fn visible_applies_filter_to_snapshot() {
        let mut feed = PostingFeed::new(Arc::new(seeded().await), Duration::from_secs(5));
        feed.refresh().await.unwrap();

        let state = FilterState::new().with_club(Selection::Only(ClubCategory::Tech));
        let visible = feed.visible(&state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Frontend Dev");
        assert_eq!(feed.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_reports_error_and_keeps_snapshot() {
        let store = FailingStore::new(seeded().await)
            .failing(StoreCall::ListPostings, "relation \"postings\" does not exist");
        let mut feed = PostingFeed::new(Arc::new(store), Duration::from_secs(5));

        let err = feed.refresh().await.unwrap_err();
        assert_eq!(err.to_string(), "relation \"postings\" does not exist");
        assert!(feed.snapshot().is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_does_not_clear_previous_results() {
        let store = Arc::new(seeded().await);
        let mut feed = PostingFeed::new(store.clone(), Duration::from_secs(5));
        feed.refresh().await.unwrap();

        feed.store = Arc::new(
            FailingStore::new(MemoryStore::new()).failing(StoreCall::ListPostings, "network down"),
        );
        assert!(feed.refresh().await.is_err());
        assert_eq!(feed.snapshot().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_refresh_times_out() {
        let store = StallingStore::new(MemoryStore::new()).stalling(StoreCall::ListPostings);
        let mut feed = PostingFeed::new(Arc::new(store), Duration::from_secs(15));

        let err = feed.refresh().await.unwrap_err();
        assert!(matches!(err, BoardError::Timeout(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn detail_lookup_maps_missing_row_to_not_found() {
        let store = Arc::new(seeded().await);
        let mut feed = PostingFeed::new(store, Duration::from_secs(5));
        let existing = feed.refresh().await.unwrap()[0].clone();

        let loaded = feed.load_posting(existing.id).await.unwrap();
        assert_eq!(loaded, existing);

        let missing = PostingId::new();
        let err = feed.load_posting(missing).await.unwrap_err();
        assert!(matches!(err, BoardError::NotFound { id } if id == missing));
        assert_eq!(err.user_message(), "Couldn't load this posting.");
    }
}
