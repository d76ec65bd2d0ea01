use super::domain::{AssessmentSubmission, FollowUp, SubmissionId};

/// Storage abstraction for submission records so the pipeline can be
/// exercised against in-memory doubles.
pub trait SubmissionRepository: Send + Sync {
    fn create(
        &self,
        record: AssessmentSubmission,
    ) -> Result<AssessmentSubmission, RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<AssessmentSubmission>, RepositoryError>;
    fn update(&self, record: AssessmentSubmission) -> Result<(), RepositoryError>;
}

/// Storage abstraction for scheduled follow-up emails.
pub trait FollowUpRepository: Send + Sync {
    fn schedule(&self, follow_up: FollowUp) -> Result<FollowUp, RepositoryError>;
    fn for_submission(&self, id: &SubmissionId) -> Result<Vec<FollowUp>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
