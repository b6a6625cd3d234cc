use crate::records::{
    Feedback, FeedbackDraft, FeedbackStore, Interview, InterviewStore, StoreError, TranscriptEntry,
    User,
};
use crate::token::{room_name, Mode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Props handed to the session launcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherProps {
    pub user_name: String,
    pub user_id: String,
    pub mode: Mode,
    pub room_name: String,
    pub interview_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePage {
    pub user: User,
    pub launcher: LauncherProps,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConductPage {
    pub interview: Interview,
    /// Feedback already recorded for this interview and user
    pub feedback: Option<Feedback>,
    pub launcher: LauncherProps,
}

/// Either a page model to render or a path to redirect to
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    Render(T),
    Redirect(String),
}

impl<T> PageOutcome<T> {
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            PageOutcome::Redirect(to) => Some(to),
            PageOutcome::Render(_) => None,
        }
    }
}

/// Body of the feedback submission action
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,

    /// Existing feedback to update
    #[serde(default)]
    pub feedback_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PagePaths {
    pub home: String,
    pub sign_in: String,
}

impl Default for PagePaths {
    fn default() -> Self {
        Self {
            home: "/".to_string(),
            sign_in: "/sign-in".to_string(),
        }
    }
}

/// Page handlers for the create and conduct flows
#[derive(Clone)]
pub struct Pages {
    interviews: Arc<dyn InterviewStore>,
    feedback: Arc<dyn FeedbackStore>,
    paths: PagePaths,
}

impl Pages {
    pub fn new(
        interviews: Arc<dyn InterviewStore>,
        feedback: Arc<dyn FeedbackStore>,
        paths: PagePaths,
    ) -> Self {
        Self {
            interviews,
            feedback,
            paths,
        }
    }

    pub fn feedback_path(interview_id: &str) -> String {
        format!("/interview/{}/feedback", interview_id)
    }

    pub fn interview_path(interview_id: &str) -> String {
        format!("/interview/{}", interview_id)
    }

    /// Create flow: a fresh room scoped to the user
    pub fn create_page(&self, user: Option<User>) -> PageOutcome<CreatePage> {
        let Some(user) = user else {
            return PageOutcome::Redirect(self.paths.sign_in.clone());
        };

        let launcher = LauncherProps {
            user_name: user.name.clone(),
            user_id: user.id.clone(),
            mode: Mode::Create,
            room_name: room_name(Mode::Create, &user.id),
            interview_id: None,
        };

        info!("Rendering create page for {} in room {}", user.id, launcher.room_name);
        PageOutcome::Render(CreatePage { user, launcher })
    }

    /// Conduct flow: a fresh room scoped to an existing interview
    pub async fn conduct_page(
        &self,
        user: Option<User>,
        interview_id: &str,
    ) -> Result<PageOutcome<ConductPage>, StoreError> {
        let Some(user) = user else {
            return Ok(PageOutcome::Redirect(self.paths.sign_in.clone()));
        };

        let Some(interview) = self.interviews.get_interview(interview_id).await? else {
            warn!("Interview {} not found, sending {} home", interview_id, user.id);
            return Ok(PageOutcome::Redirect(self.paths.home.clone()));
        };

        let feedback = self.feedback.feedback_for(&interview.id, &user.id).await?;

        let launcher = LauncherProps {
            user_name: user.name.clone(),
            user_id: user.id.clone(),
            mode: Mode::Conduct,
            room_name: room_name(Mode::Conduct, &interview.id),
            interview_id: Some(interview.id.clone()),
        };

        info!(
            "Rendering conduct page for interview {} in room {}",
            interview.id, launcher.room_name
        );

        Ok(PageOutcome::Render(ConductPage {
            interview,
            feedback,
            launcher,
        }))
    }

    /// Create or update the feedback record, then go to the feedback view
    pub async fn submit_feedback(
        &self,
        user: Option<User>,
        interview_id: &str,
        submission: FeedbackSubmission,
    ) -> Result<PageOutcome<()>, StoreError> {
        let Some(user) = user else {
            return Ok(PageOutcome::Redirect(self.paths.sign_in.clone()));
        };

        if self.interviews.get_interview(interview_id).await?.is_none() {
            return Ok(PageOutcome::Redirect(self.paths.home.clone()));
        }

        let existing = self
            .feedback
            .feedback_for(interview_id, &user.id)
            .await?
            .map(|f| f.id);

        // A client-supplied ID must name this user's feedback for this interview
        let feedback_id = match submission.feedback_id {
            Some(id) if existing.as_deref() != Some(id.as_str()) => {
                warn!(
                    "Rejecting feedback {} for interview {} from {}",
                    id, interview_id, user.id
                );
                return Err(StoreError::FeedbackNotFound(id));
            }
            Some(id) => Some(id),
            None => existing,
        };

        let transcript = if submission.transcript.is_empty() {
            self.interviews
                .answers(interview_id)
                .await?
                .iter()
                .flat_map(|a| a.to_transcript())
                .collect()
        } else {
            submission.transcript
        };

        let id = self
            .feedback
            .save_feedback(FeedbackDraft {
                interview_id: interview_id.to_string(),
                user_id: user.id.clone(),
                transcript,
                feedback_id,
            })
            .await?;

        info!("Feedback {} recorded for interview {}", id, interview_id);
        Ok(PageOutcome::Redirect(Self::feedback_path(interview_id)))
    }

    /// Feedback view for the signed-in user
    pub async fn feedback_page(
        &self,
        user: Option<User>,
        interview_id: &str,
    ) -> Result<PageOutcome<Feedback>, StoreError> {
        let Some(user) = user else {
            return Ok(PageOutcome::Redirect(self.paths.sign_in.clone()));
        };

        match self.feedback.feedback_for(interview_id, &user.id).await? {
            Some(feedback) => Ok(PageOutcome::Render(feedback)),
            None => Ok(PageOutcome::Redirect(Self::interview_path(interview_id))),
        }
    }
}
