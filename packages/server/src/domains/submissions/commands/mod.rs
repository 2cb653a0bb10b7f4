use crate::domains::postings::models::NewPosting;
use crate::domains::submissions::models::ValidDraft;

/// Work the submission machine asks the coordinator to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionCommand {
    ValidateDraft,
    ResolveClub { draft: ValidDraft },
    InsertPosting { posting: NewPosting },
}
