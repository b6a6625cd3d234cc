use super::generator::{GenerationRequest, QuestionGenerator};
use super::metadata::resolve_metadata;
use super::CLOSING_ANNOUNCEMENT;
use crate::records::{Answer, InterviewDraft, InterviewStore, StoreError};
use crate::token::{Mode, SessionMetadata};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("missing interview id in room metadata")]
    MissingInterviewId,

    #[error("missing user identity in room metadata")]
    MissingUserIdentity,

    #[error("interview id missing; nothing to save")]
    NoInterview,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("question generation failed: {0}")]
    Generation(String),
}

/// Mutable state scoped to one agent session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentSessionState {
    pub mode: Mode,
    pub interview_id: Option<String>,
    pub user_id: Option<String>,
    pub metadata_complete: bool,
    pub questions_generated: bool,
    pub current_question_index: usize,
    pub question_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredInterview {
    pub interview_id: String,
}

/// Result of handing the interview definition to the generator
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub status: &'static str,
    pub response: Value,
    /// Line to speak before the session is closed
    #[serde(skip)]
    pub announcement: &'static str,
}

/// Voice interviewer that can both create and conduct interviews
pub struct InterviewAgent {
    name: String,
    state: AgentSessionState,
    interviews: Arc<dyn InterviewStore>,
    generator: Arc<dyn QuestionGenerator>,
}

impl InterviewAgent {
    pub fn new(
        name: impl Into<String>,
        interviews: Arc<dyn InterviewStore>,
        generator: Arc<dyn QuestionGenerator>,
    ) -> Self {
        Self {
            name: name.into(),
            state: AgentSessionState::default(),
            interviews,
            generator,
        }
    }

    /// Agent for one room: resolve the session metadata from the room's
    /// and participants' metadata strings, then enter the session
    pub fn join<'a, I>(
        name: impl Into<String>,
        interviews: Arc<dyn InterviewStore>,
        generator: Arc<dyn QuestionGenerator>,
        metadata_sources: I,
    ) -> Result<Self, AgentError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut agent = Self::new(name, interviews, generator);
        agent.on_enter(resolve_metadata(metadata_sources))?;
        Ok(agent)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &AgentSessionState {
        &self.state
    }

    /// Adopt the room's session metadata.
    ///
    /// Conduct mode without an interview id ends the session.
    pub fn on_enter(&mut self, metadata: SessionMetadata) -> Result<(), AgentError> {
        self.state.user_id = metadata.user_id;
        self.state.interview_id = metadata.interview_id;
        self.state.mode = metadata.mode;

        if self.state.mode == Mode::Conduct && self.state.interview_id.is_none() {
            error!("Missing interview id in room metadata; ending session");
            return Err(AgentError::MissingInterviewId);
        }

        info!(
            "{} entered {} session for {:?}",
            self.name, self.state.mode, self.state.user_id
        );
        Ok(())
    }

    /// Persist the interview setup provided by the candidate
    pub async fn store_user_details(
        &mut self,
        role: &str,
        level: &str,
        tech_stack: &str,
        interview_type: &str,
        question_count: u32,
    ) -> Result<StoredInterview, AgentError> {
        let user_id = self
            .state
            .user_id
            .clone()
            .ok_or(AgentError::MissingUserIdentity)?;

        let draft = InterviewDraft {
            user_id,
            role: role.to_string(),
            level: level.to_string(),
            kind: interview_type.to_string(),
            techstack: split_tech_stack(tech_stack),
            question_count,
        };

        let interview_id = self
            .interviews
            .upsert_interview(self.state.interview_id.as_deref(), draft)
            .await?;

        self.state.interview_id = Some(interview_id.clone());
        self.state.metadata_complete = true;

        info!("Stored interview metadata {}", interview_id);
        Ok(StoredInterview { interview_id })
    }

    /// Ask the web application to generate the interview's questions
    pub async fn request_question_generation(
        &mut self,
        mut request: GenerationRequest,
    ) -> Result<GenerationOutcome, AgentError> {
        if request.userid.is_empty() {
            request.userid = self.state.user_id.clone().unwrap_or_default();
        }

        let response = self
            .generator
            .generate(&request)
            .await
            .map_err(|e| AgentError::Generation(format!("{:#}", e)))?;

        self.state.questions_generated = true;
        self.state.question_list.clear();

        info!("Interview generation triggered for user {}", request.userid);
        Ok(GenerationOutcome {
            status: "triggered",
            response,
            announcement: CLOSING_ANNOUNCEMENT,
        })
    }

    /// Save the candidate's answer for later feedback
    pub async fn save_answer(
        &mut self,
        question: &str,
        answer: &str,
        sequence: u32,
    ) -> Result<(), AgentError> {
        let interview_id = self
            .state
            .interview_id
            .clone()
            .ok_or(AgentError::NoInterview)?;

        self.interviews
            .save_answer(
                &interview_id,
                Answer {
                    question: question.to_string(),
                    answer: answer.to_string(),
                    sequence,
                    created_at: Utc::now(),
                },
            )
            .await?;

        self.state.current_question_index = sequence as usize + 1;

        info!("Saved answer {} for interview {}", sequence, interview_id);
        Ok(())
    }
}

fn split_tech_stack(tech_stack: &str) -> Vec<String> {
    tech_stack
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tech_stack_drops_blanks() {
        assert_eq!(
            split_tech_stack(" rust, tokio ,, axum ,"),
            vec!["rust", "tokio", "axum"]
        );
        assert!(split_tech_stack(" , ").is_empty());
    }
}
