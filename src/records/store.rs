use super::models::{Answer, Feedback, FeedbackDraft, Interview, InterviewDraft, User};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unknown ID, or a record owned by another user or interview
    #[error("feedback {0} not found")]
    FeedbackNotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the signed-in user from a session credential
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn current_user(&self, session: Option<&str>) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn get_interview(&self, id: &str) -> Result<Option<Interview>, StoreError>;

    /// Merge `draft` into interview `id`, or into a new record when `id` is `None`.
    ///
    /// Returns the interview ID that was written.
    async fn upsert_interview(
        &self,
        id: Option<&str>,
        draft: InterviewDraft,
    ) -> Result<String, StoreError>;

    /// Store an answer, replacing any previous answer with the same sequence
    async fn save_answer(&self, interview_id: &str, answer: Answer) -> Result<(), StoreError>;

    /// Answers for an interview in sequence order
    async fn answers(&self, interview_id: &str) -> Result<Vec<Answer>, StoreError>;
}

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn feedback_for(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<Option<Feedback>, StoreError>;

    /// Create or update a feedback record, returning its ID.
    ///
    /// Updating requires the existing record to belong to the draft's
    /// interview and user; anything else is `FeedbackNotFound`.
    async fn save_feedback(&self, draft: FeedbackDraft) -> Result<String, StoreError>;
}
