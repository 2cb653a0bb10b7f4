// Test doubles for the board store
//
// Wrappers around any BaseBoardStore (usually MemoryStore) that count, fail,
// stall or synchronize individual calls. Used by unit tests and by the
// integration tests under tests/.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Barrier;

use super::traits::BaseBoardStore;
use crate::common::{ClubId, PostingId};
use crate::domains::clubs::models::NewClub;
use crate::domains::postings::models::{NewPosting, Posting, PostingWithClub};
use crate::error::{BoardError, Result};

/// One operation of `BaseBoardStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCall {
    ListPostings,
    FindPosting,
    FindClubByName,
    InsertClub,
    UpsertClub,
    InsertPosting,
}

impl StoreCall {
    pub const ALL: [StoreCall; 6] = [
        Self::ListPostings,
        Self::FindPosting,
        Self::FindClubByName,
        Self::InsertClub,
        Self::UpsertClub,
        Self::InsertPosting,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// Counting Store
// =============================================================================

/// Records how many times each operation reached the store.
pub struct CountingStore<S> {
    inner: S,
    counts: [AtomicUsize; 6],
}

impl<S: BaseBoardStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counts: Default::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn calls(&self, call: StoreCall) -> usize {
        self.counts[call.index()].load(Ordering::SeqCst)
    }

    /// Calls across every operation.
    pub fn total_calls(&self) -> usize {
        StoreCall::ALL.iter().map(|c| self.calls(*c)).sum()
    }

    fn record(&self, call: StoreCall) {
        self.counts[call.index()].fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<S: BaseBoardStore> BaseBoardStore for CountingStore<S> {
    async fn list_postings(&self) -> Result<Vec<PostingWithClub>> {
        self.record(StoreCall::ListPostings);
        self.inner.list_postings().await
    }

    async fn find_posting(&self, id: PostingId) -> Result<Option<PostingWithClub>> {
        self.record(StoreCall::FindPosting);
        self.inner.find_posting(id).await
    }

    async fn find_club_by_name(&self, name: &str) -> Result<Option<ClubId>> {
        self.record(StoreCall::FindClubByName);
        self.inner.find_club_by_name(name).await
    }

    async fn insert_club(&self, club: &NewClub) -> Result<ClubId> {
        self.record(StoreCall::InsertClub);
        self.inner.insert_club(club).await
    }

    async fn upsert_club(&self, club: &NewClub) -> Result<ClubId> {
        self.record(StoreCall::UpsertClub);
        self.inner.upsert_club(club).await
    }

    async fn insert_posting(&self, posting: &NewPosting) -> Result<Posting> {
        self.record(StoreCall::InsertPosting);
        self.inner.insert_posting(posting).await
    }
}

// =============================================================================
// Failing Store
// =============================================================================

/// Rejects chosen operations with a fixed backend message.
pub struct FailingStore<S> {
    inner: S,
    failures: HashMap<StoreCall, String>,
}

impl<S: BaseBoardStore> FailingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failures: HashMap::new(),
        }
    }

    /// Make `call` fail with `BoardError::Remote(message)`.
    pub fn failing(mut self, call: StoreCall, message: &str) -> Self {
        self.failures.insert(call, message.to_string());
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self, call: StoreCall) -> Result<()> {
        match self.failures.get(&call) {
            Some(message) => Err(BoardError::Remote(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<S: BaseBoardStore> BaseBoardStore for FailingStore<S> {
    async fn list_postings(&self) -> Result<Vec<PostingWithClub>> {
        self.check(StoreCall::ListPostings)?;
        self.inner.list_postings().await
    }

    async fn find_posting(&self, id: PostingId) -> Result<Option<PostingWithClub>> {
        self.check(StoreCall::FindPosting)?;
        self.inner.find_posting(id).await
    }

    async fn find_club_by_name(&self, name: &str) -> Result<Option<ClubId>> {
        self.check(StoreCall::FindClubByName)?;
        self.inner.find_club_by_name(name).await
    }

    async fn insert_club(&self, club: &NewClub) -> Result<ClubId> {
        self.check(StoreCall::InsertClub)?;
        self.inner.insert_club(club).await
    }

    async fn upsert_club(&self, club: &NewClub) -> Result<ClubId> {
        self.check(StoreCall::UpsertClub)?;
        self.inner.upsert_club(club).await
    }

    async fn insert_posting(&self, posting: &NewPosting) -> Result<Posting> {
        self.check(StoreCall::InsertPosting)?;
        self.inner.insert_posting(posting).await
    }
}

// =============================================================================
// Stalling Store
// =============================================================================

/// Never completes the chosen operations, for exercising timeouts.
pub struct StallingStore<S> {
    inner: S,
    stalled: HashSet<StoreCall>,
}

impl<S: BaseBoardStore> StallingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stalled: HashSet::new(),
        }
    }

    pub fn stalling(mut self, call: StoreCall) -> Self {
        self.stalled.insert(call);
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn gate(&self, call: StoreCall) {
        if self.stalled.contains(&call) {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl<S: BaseBoardStore> BaseBoardStore for StallingStore<S> {
    async fn list_postings(&self) -> Result<Vec<PostingWithClub>> {
        self.gate(StoreCall::ListPostings).await;
        self.inner.list_postings().await
    }

    async fn find_posting(&self, id: PostingId) -> Result<Option<PostingWithClub>> {
        self.gate(StoreCall::FindPosting).await;
        self.inner.find_posting(id).await
    }

    async fn find_club_by_name(&self, name: &str) -> Result<Option<ClubId>> {
        self.gate(StoreCall::FindClubByName).await;
        self.inner.find_club_by_name(name).await
    }

    async fn insert_club(&self, club: &NewClub) -> Result<ClubId> {
        self.gate(StoreCall::InsertClub).await;
        self.inner.insert_club(club).await
    }

    async fn upsert_club(&self, club: &NewClub) -> Result<ClubId> {
        self.gate(StoreCall::UpsertClub).await;
        self.inner.upsert_club(club).await
    }

    async fn insert_posting(&self, posting: &NewPosting) -> Result<Posting> {
        self.gate(StoreCall::InsertPosting).await;
        self.inner.insert_posting(posting).await
    }
}

// =============================================================================
// Gated Store
// =============================================================================

/// Holds every club lookup until `parties` lookups have completed.
///
/// Forces concurrent registrations to all observe the same lookup result
/// before any of them writes, which makes the lookup-then-insert race
/// deterministic.
pub struct GatedStore<S> {
    inner: S,
    after_lookup: Barrier,
}

impl<S: BaseBoardStore> GatedStore<S> {
    pub fn new(inner: S, parties: usize) -> Self {
        Self {
            inner,
            after_lookup: Barrier::new(parties),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: BaseBoardStore> BaseBoardStore for GatedStore<S> {
    async fn list_postings(&self) -> Result<Vec<PostingWithClub>> {
        self.inner.list_postings().await
    }

    async fn find_posting(&self, id: PostingId) -> Result<Option<PostingWithClub>> {
        self.inner.find_posting(id).await
    }

    async fn find_club_by_name(&self, name: &str) -> Result<Option<ClubId>> {
        let found = self.inner.find_club_by_name(name).await;
        self.after_lookup.wait().await;
        found
    }

    async fn insert_club(&self, club: &NewClub) -> Result<ClubId> {
        self.inner.insert_club(club).await
    }

    async fn upsert_club(&self, club: &NewClub) -> Result<ClubId> {
        self.inner.upsert_club(club).await
    }

    async fn insert_posting(&self, posting: &NewPosting) -> Result<Posting> {
        self.inner.insert_posting(posting).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::clubs::models::ClubCategory;
    use crate::kernel::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn club(name: &str) -> NewClub {
        NewClub {
            name: name.into(),
            category: ClubCategory::Sports,
            ig_handle: None,
            logo_url: None,
        }
    }

    #[tokio::test]
    async fn counts_each_operation() {
        let store = CountingStore::new(MemoryStore::new());
        store.find_club_by_name("Rowing").await.unwrap();
        store.insert_club(&club("Rowing")).await.unwrap();
        store.find_club_by_name("Rowing").await.unwrap();

        assert_eq!(store.calls(StoreCall::FindClubByName), 2);
        assert_eq!(store.calls(StoreCall::InsertClub), 1);
        assert_eq!(store.total_calls(), 3);
    }

    #[tokio::test]
    async fn failing_call_carries_message_and_skips_inner() {
        let store = FailingStore::new(MemoryStore::new())
            .failing(StoreCall::InsertClub, "permission denied for table clubs");

        let err = store.insert_club(&club("Rowing")).await.unwrap_err();
        assert_eq!(err.to_string(), "permission denied for table clubs");
        assert_eq!(store.inner().club_count().await, 0);
        assert!(store.list_postings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stalled_call_never_completes() {
        let store = StallingStore::new(MemoryStore::new()).stalling(StoreCall::ListPostings);
        let outcome = tokio::time::timeout(Duration::from_millis(20), store.list_postings()).await;
        assert!(outcome.is_err());
        assert!(store.find_club_by_name("x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn gate_releases_lookups_together() {
        let store = Arc::new(GatedStore::new(MemoryStore::new(), 2));
        let first = tokio::spawn({
            let store = store.clone();
            async move { store.find_club_by_name("Rowing").await }
        });
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.find_club_by_name("Rowing").await }
        });

        assert!(first.await.unwrap().unwrap().is_none());
        assert!(second.await.unwrap().unwrap().is_none());
    }
}
