//! Submission domain actions

mod submit;

pub use submit::{SubmissionCoordinator, SubmitOutcome};
