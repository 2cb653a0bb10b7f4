// Submissions domain - publishing a new posting
//
// Responsibilities:
// - Form input (PostingDraft) and its validation rules
// - Submission state machine with the double-submit guard
// - Sequencing club resolution and posting insert (SubmissionCoordinator)

pub mod actions;
pub mod commands;
pub mod events;
pub mod machines;
pub mod models;

pub use actions::*;
pub use machines::{SubmissionMachine, SubmissionPhase};
pub use models::*;
