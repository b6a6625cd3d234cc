use super::models::{Answer, Feedback, FeedbackDraft, Interview, InterviewDraft, User};
use super::store::{FeedbackStore, InterviewStore, StoreError, UserDirectory};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// In-process record store implementing every collaborator trait
#[derive(Clone, Default)]
pub struct MemoryStore {
    /// Session credential → user
    sessions: Arc<RwLock<HashMap<String, User>>>,

    interviews: Arc<RwLock<HashMap<String, Interview>>>,

    /// Interview ID → answers by sequence
    answers: Arc<RwLock<HashMap<String, BTreeMap<u32, Answer>>>>,

    feedback: Arc<RwLock<HashMap<String, Feedback>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sign-in session for `user`
    pub async fn add_session(&self, token: impl Into<String>, user: User) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.into(), user);
    }

    /// Insert a complete interview record, replacing any with the same ID
    pub async fn insert_interview(&self, interview: Interview) {
        let mut interviews = self.interviews.write().await;
        interviews.insert(interview.id.clone(), interview);
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn current_user(&self, session: Option<&str>) -> Result<Option<User>, StoreError> {
        let Some(session) = session else {
            return Ok(None);
        };
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session).cloned())
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn get_interview(&self, id: &str) -> Result<Option<Interview>, StoreError> {
        let interviews = self.interviews.read().await;
        Ok(interviews.get(id).cloned())
    }

    async fn upsert_interview(
        &self,
        id: Option<&str>,
        draft: InterviewDraft,
    ) -> Result<String, StoreError> {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut interviews = self.interviews.write().await;
        match interviews.get_mut(&id) {
            Some(existing) => {
                existing.user_id = draft.user_id;
                existing.role = draft.role;
                existing.level = draft.level;
                existing.kind = draft.kind;
                existing.techstack = draft.techstack;
                existing.question_count = draft.question_count;
                existing.finalized = false;
            }
            None => {
                interviews.insert(
                    id.clone(),
                    Interview {
                        id: id.clone(),
                        user_id: draft.user_id,
                        role: draft.role,
                        level: draft.level,
                        kind: draft.kind,
                        techstack: draft.techstack,
                        question_count: draft.question_count,
                        questions: Vec::new(),
                        finalized: false,
                        created_at: Utc::now(),
                    },
                );
            }
        }

        info!("Stored interview {}", id);
        Ok(id)
    }

    async fn save_answer(&self, interview_id: &str, answer: Answer) -> Result<(), StoreError> {
        let mut answers = self.answers.write().await;
        answers
            .entry(interview_id.to_string())
            .or_default()
            .insert(answer.sequence, answer);
        Ok(())
    }

    async fn answers(&self, interview_id: &str) -> Result<Vec<Answer>, StoreError> {
        let answers = self.answers.read().await;
        Ok(answers
            .get(interview_id)
            .map(|by_seq| by_seq.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn feedback_for(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<Option<Feedback>, StoreError> {
        let feedback = self.feedback.read().await;
        Ok(feedback
            .values()
            .find(|f| f.interview_id == interview_id && f.user_id == user_id)
            .cloned())
    }

    async fn save_feedback(&self, draft: FeedbackDraft) -> Result<String, StoreError> {
        let mut feedback = self.feedback.write().await;

        let id = match draft.feedback_id {
            Some(id) => match feedback.get(&id) {
                Some(existing)
                    if existing.interview_id == draft.interview_id
                        && existing.user_id == draft.user_id =>
                {
                    id
                }
                _ => return Err(StoreError::FeedbackNotFound(id)),
            },
            None => uuid::Uuid::new_v4().to_string(),
        };

        feedback.insert(
            id.clone(),
            Feedback {
                id: id.clone(),
                interview_id: draft.interview_id,
                user_id: draft.user_id,
                transcript: draft.transcript,
                created_at: Utc::now(),
            },
        );

        info!("Saved feedback {}", id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(role: &str) -> InterviewDraft {
        InterviewDraft {
            user_id: "u1".to_string(),
            role: role.to_string(),
            level: "senior".to_string(),
            kind: "technical".to_string(),
            techstack: vec!["rust".to_string()],
            question_count: 5,
        }
    }

    #[tokio::test]
    async fn test_upsert_merges_into_existing_interview() {
        let store = MemoryStore::new();

        let id = store.upsert_interview(None, draft("backend")).await.unwrap();
        let again = store
            .upsert_interview(Some(&id), draft("platform"))
            .await
            .unwrap();

        assert_eq!(id, again);
        let interview = store.get_interview(&id).await.unwrap().unwrap();
        assert_eq!(interview.role, "platform");
    }

    #[tokio::test]
    async fn test_answers_are_ordered_and_overwritten() {
        let store = MemoryStore::new();
        for (seq, text) in [(2, "b"), (1, "a"), (2, "b2")] {
            store
                .save_answer(
                    "i1",
                    Answer {
                        question: format!("q{}", seq),
                        answer: text.to_string(),
                        sequence: seq,
                        created_at: Utc::now(),
                    },
                )
                .await
                .unwrap();
        }

        let answers = store.answers("i1").await.unwrap();
        let texts: Vec<&str> = answers.iter().map(|a| a.answer.as_str()).collect();
        assert_eq!(texts, vec!["a", "b2"]);
    }

    fn feedback_draft(user_id: &str, feedback_id: Option<String>) -> FeedbackDraft {
        FeedbackDraft {
            interview_id: "i1".to_string(),
            user_id: user_id.to_string(),
            transcript: Vec::new(),
            feedback_id,
        }
    }

    #[tokio::test]
    async fn test_feedback_update_is_scoped_to_owner() {
        let store = MemoryStore::new();
        let id = store.save_feedback(feedback_draft("u1", None)).await.unwrap();

        let err = store
            .save_feedback(feedback_draft("u2", Some(id.clone())))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::FeedbackNotFound(ref missing) if *missing == id));

        let owned = store.feedback_for("i1", "u1").await.unwrap().unwrap();
        assert_eq!(owned.id, id);
        assert!(store.feedback_for("i1", "u2").await.unwrap().is_none());

        let updated = store
            .save_feedback(feedback_draft("u1", Some(id.clone())))
            .await
            .unwrap();
        assert_eq!(updated, id);
    }

    #[tokio::test]
    async fn test_unknown_session_has_no_user() {
        let store = MemoryStore::new();
        store
            .add_session(
                "s1",
                User {
                    id: "u1".to_string(),
                    name: "Ada".to_string(),
                },
            )
            .await;

        assert!(store.current_user(Some("nope")).await.unwrap().is_none());
        assert!(store.current_user(None).await.unwrap().is_none());
        assert_eq!(store.current_user(Some("s1")).await.unwrap().unwrap().id, "u1");
    }
}
