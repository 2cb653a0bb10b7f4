//! Submission coordinator
//!
//! Drives `SubmissionMachine` and performs the commands it emits: validate the
//! draft, resolve the club, insert the posting. Steps run strictly in order and
//! each backend step is bounded by the configured timeout. When the posting
//! insert fails after the club was created, the club row is left in place.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::common::utils::bounded;
use crate::domains::clubs::ClubRegistrar;
use crate::domains::postings::models::Posting;
use crate::domains::submissions::commands::SubmissionCommand;
use crate::domains::submissions::events::SubmissionEvent;
use crate::domains::submissions::machines::{SubmissionMachine, SubmissionPhase};
use crate::domains::submissions::models::PostingDraft;
use crate::error::{BoardError, Result};
use crate::kernel::BaseBoardStore;

/// What a submit request amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The posting was stored
    Created(Posting),
    /// Another submission was still in flight; this request did nothing
    AlreadySubmitting,
}

pub struct SubmissionCoordinator {
    store: Arc<dyn BaseBoardStore>,
    registrar: ClubRegistrar,
    timeout: Duration,
    machine: Mutex<SubmissionMachine>,
}

impl SubmissionCoordinator {
    pub fn new(store: Arc<dyn BaseBoardStore>, registrar: ClubRegistrar, timeout: Duration) -> Self {
        Self {
            store,
            registrar,
            timeout,
            machine: Mutex::new(SubmissionMachine::new()),
        }
    }

    pub async fn phase(&self) -> SubmissionPhase {
        self.machine.lock().await.phase()
    }

    /// Validate `draft`, resolve its club and store the posting.
    ///
    /// Validation failures never reach the backend. Backend errors are
    /// returned with their original message.
    pub async fn submit(&self, draft: &PostingDraft) -> Result<SubmitOutcome> {
        let first = self
            .machine
            .lock()
            .await
            .decide(&SubmissionEvent::SubmitRequested);
        let Some(command) = first else {
            info!("submission already in progress, ignoring request");
            return Ok(SubmitOutcome::AlreadySubmitting);
        };

        let result = self.drive(command, draft).await;
        self.machine.lock().await.decide(&SubmissionEvent::Settled);

        match &result {
            Ok(posting) => {
                info!(posting_id = %posting.id, club_id = %posting.club_id, "posting submitted")
            }
            Err(BoardError::Validation(reason)) => info!(%reason, "submission rejected"),
            Err(error) => warn!(%error, "submission failed"),
        }
        result.map(SubmitOutcome::Created)
    }

    async fn drive(&self, mut command: SubmissionCommand, draft: &PostingDraft) -> Result<Posting> {
        loop {
            let event = self.execute(command, draft).await;
            let next = self.machine.lock().await.decide(&event);

            command = match (event, next) {
                (SubmissionEvent::PostingCreated { posting }, _) => return Ok(posting),
                (SubmissionEvent::DraftRejected { reason }, _) => return Err(reason.into()),
                (SubmissionEvent::StepFailed { error }, _) => return Err(error),
                (_, Some(next)) => next,
                (event, None) => {
                    return Err(BoardError::remote(format!(
                        "submission stopped after {:?}",
                        event
                    )))
                }
            };
        }
    }

    async fn execute(&self, command: SubmissionCommand, draft: &PostingDraft) -> SubmissionEvent {
        match command {
            SubmissionCommand::ValidateDraft => match draft.validate() {
                Ok(draft) => SubmissionEvent::DraftValidated { draft },
                Err(reason) => SubmissionEvent::DraftRejected { reason },
            },

            SubmissionCommand::ResolveClub { draft } => {
                let resolved = bounded(
                    self.timeout,
                    self.registrar.resolve_or_create(
                        &draft.club_name,
                        draft.club_category,
                        draft.club_ig_handle.as_deref(),
                        draft.club_logo_url.as_deref(),
                    ),
                )
                .await;
                match resolved {
                    Ok(club_id) => SubmissionEvent::ClubResolved { draft, club_id },
                    Err(error) => SubmissionEvent::StepFailed { error },
                }
            }

            SubmissionCommand::InsertPosting { posting } => {
                match bounded(self.timeout, self.store.insert_posting(&posting)).await {
                    Ok(posting) => SubmissionEvent::PostingCreated { posting },
                    Err(error) => SubmissionEvent::StepFailed { error },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::clubs::models::ClubCategory;
    use crate::domains::clubs::RegistrationMode;
    use crate::domains::postings::models::RoleCategory;
    use crate::error::ValidationError;
    use crate::kernel::{CountingStore, FailingStore, MemoryStore, StallingStore, StoreCall};

    fn coordinator<S: BaseBoardStore + 'static>(store: Arc<S>, timeout: Duration) -> SubmissionCoordinator {
        let registrar = ClubRegistrar::new(store.clone(), RegistrationMode::LookupThenInsert);
        SubmissionCoordinator::new(store, registrar, timeout)
    }

    fn draft() -> PostingDraft {
        PostingDraft {
            club_name: "Launch Pad".into(),
            club_category: ClubCategory::Tech,
            club_ig_handle: Some("ubclaunchpad".into()),
            club_logo_url: None,
            title: "Frontend Dev".into(),
            role_category: RoleCategory::Engineering,
            description: "Build the new member portal in React.".into(),
            deadline: "2026-02-14".into(),
            apply_url: "https://forms.example.com/launchpad".into(),
            ig_post_url: "https://instagram.com/p/abc".into(),
        }
    }

    #[tokio::test]
    async fn stores_club_then_posting() {
        let store = Arc::new(CountingStore::new(MemoryStore::new()));
        let coordinator = coordinator(store.clone(), Duration::from_secs(5));

        let outcome = coordinator.submit(&draft()).await.unwrap();
        let SubmitOutcome::Created(posting) = outcome else {
            panic!("expected a created posting");
        };
        assert_eq!(posting.title, "Frontend Dev");
        assert_eq!(store.calls(StoreCall::FindClubByName), 1);
        assert_eq!(store.calls(StoreCall::InsertClub), 1);
        assert_eq!(store.calls(StoreCall::InsertPosting), 1);
        assert_eq!(coordinator.phase().await, SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn short_description_makes_no_backend_call() {
        let store = Arc::new(CountingStore::new(MemoryStore::new()));
        let coordinator = coordinator(store.clone(), Duration::from_secs(5));

        let mut d = draft();
        d.description = "exactly nineteen!!!".into();
        let err = coordinator.submit(&d).await.unwrap_err();

        assert!(matches!(
            err,
            BoardError::Validation(ValidationError::DescriptionTooShort { length: 19 })
        ));
        assert!(!err.is_retryable());
        assert_eq!(store.total_calls(), 0);
        assert_eq!(coordinator.phase().await, SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn ftp_apply_url_makes_no_backend_call() {
        let store = Arc::new(CountingStore::new(MemoryStore::new()));
        let coordinator = coordinator(store.clone(), Duration::from_secs(5));

        let mut d = draft();
        d.apply_url = "ftp://example.com".into();
        let err = coordinator.submit(&d).await.unwrap_err();

        assert_eq!(
            err.user_message(),
            ValidationError::InvalidApplyUrl.to_string()
        );
        assert_eq!(store.total_calls(), 0);
    }

    #[tokio::test]
    async fn failed_insert_keeps_orphan_club_and_message() {
        let message = "new row for relation \"postings\" violates check constraint";
        let store = Arc::new(
            FailingStore::new(MemoryStore::new()).failing(StoreCall::InsertPosting, message),
        );
        let coordinator = coordinator(store.clone(), Duration::from_secs(5));

        let err = coordinator.submit(&draft()).await.unwrap_err();
        assert_eq!(err.user_message(), message);
        assert!(err.is_retryable());
        assert_eq!(store.inner().club_count().await, 1);
        assert_eq!(store.inner().posting_count().await, 0);
        assert_eq!(coordinator.phase().await, SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn resubmitting_reuses_the_club() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(store.clone(), Duration::from_secs(5));

        coordinator.submit(&draft()).await.unwrap();
        let mut second = draft();
        second.club_name = "  LAUNCH PAD".into();
        second.title = "Backend Dev".into();
        coordinator.submit(&second).await.unwrap();

        assert_eq!(store.club_count().await, 1);
        assert_eq!(store.posting_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn second_request_while_submitting_is_a_no_op() {
        let store = Arc::new(
            StallingStore::new(MemoryStore::new()).stalling(StoreCall::InsertPosting),
        );
        let coordinator = Arc::new(coordinator(store.clone(), Duration::from_secs(15)));

        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.submit(&draft()).await }
        });
        while coordinator.phase().await != SubmissionPhase::Submitting {
            tokio::task::yield_now().await;
        }

        let second = coordinator.submit(&draft()).await.unwrap();
        assert_eq!(second, SubmitOutcome::AlreadySubmitting);

        let err = first.await.unwrap().unwrap_err();
        assert!(matches!(err, BoardError::Timeout(d) if d == Duration::from_secs(15)));
        assert_eq!(coordinator.phase().await, SubmissionPhase::Idle);
        assert_eq!(store.inner().club_count().await, 1);
    }
}
