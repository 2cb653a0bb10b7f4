use crate::common::ClubId;
use crate::domains::postings::models::Posting;
use crate::domains::submissions::models::ValidDraft;
use crate::error::{BoardError, ValidationError};

/// Facts reported to the submission machine.
#[derive(Debug)]
pub enum SubmissionEvent {
    /// The user asked to submit the current draft
    SubmitRequested,

    /// Every rule passed
    DraftValidated { draft: ValidDraft },

    /// A rule failed; nothing was sent to the backend
    DraftRejected { reason: ValidationError },

    ClubResolved { draft: ValidDraft, club_id: ClubId },

    PostingCreated { posting: Posting },

    /// A backend step failed or timed out
    StepFailed { error: BoardError },

    /// The outcome has been reported to the caller
    Settled,
}
