use serde::Serialize;

use crate::domains::submissions::commands::SubmissionCommand;
use crate::domains::submissions::events::SubmissionEvent;

/// Where a submission currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    /// A submission is being worked on and new requests are ignored.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }
}

/// Submission state machine
/// Pure decision logic - NO IO, only state transitions
///
/// Idle -> Validating -> Submitting -> {Succeeded, Failed} -> Idle.
/// A rejected draft goes straight from Validating to Failed.
#[derive(Debug, Default)]
pub struct SubmissionMachine {
    phase: SubmissionPhase,
}

impl SubmissionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn decide(&mut self, event: &SubmissionEvent) -> Option<SubmissionCommand> {
        match event {
            SubmissionEvent::SubmitRequested => {
                // Guard against double submission
                if self.phase.is_busy() {
                    return None;
                }
                self.phase = SubmissionPhase::Validating;
                Some(SubmissionCommand::ValidateDraft)
            }

            SubmissionEvent::DraftRejected { .. } => {
                self.phase = SubmissionPhase::Failed;
                None
            }

            SubmissionEvent::DraftValidated { draft } => {
                self.phase = SubmissionPhase::Submitting;
                Some(SubmissionCommand::ResolveClub {
                    draft: draft.clone(),
                })
            }

            SubmissionEvent::ClubResolved { draft, club_id } => {
                Some(SubmissionCommand::InsertPosting {
                    posting: draft.to_new_posting(*club_id),
                })
            }

            SubmissionEvent::PostingCreated { .. } => {
                self.phase = SubmissionPhase::Succeeded;
                None
            }

            SubmissionEvent::StepFailed { .. } => {
                self.phase = SubmissionPhase::Failed;
                None
            }

            SubmissionEvent::Settled => {
                if !self.phase.is_busy() {
                    self.phase = SubmissionPhase::Idle;
                }
                None
            }
        }
    }
}
