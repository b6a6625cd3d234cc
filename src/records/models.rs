use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// An interview definition captured in create mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub user_id: String,
    pub role: String,
    pub level: String,

    /// Interview type (technical, behavioural, mixed)
    #[serde(rename = "type")]
    pub kind: String,

    pub techstack: Vec<String>,
    pub question_count: u32,

    /// Generated questions, empty until generation finishes
    #[serde(default)]
    pub questions: Vec<String>,

    pub finalized: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields written by the agent when the candidate describes an interview
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewDraft {
    pub user_id: String,
    pub role: String,
    pub level: String,
    pub kind: String,
    pub techstack: Vec<String>,
    pub question_count: u32,
}

/// One answered question, keyed by its sequence number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question: String,
    pub answer: String,
    pub sequence: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptEntry>,
    pub created_at: DateTime<Utc>,
}

/// Input of a feedback write; `feedback_id` selects an existing record to update
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackDraft {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptEntry>,
    pub feedback_id: Option<String>,
}

impl Answer {
    /// Question/answer pair as transcript lines
    pub fn to_transcript(&self) -> [TranscriptEntry; 2] {
        [
            TranscriptEntry {
                role: "assistant".to_string(),
                content: self.question.clone(),
            },
            TranscriptEntry {
                role: "user".to_string(),
                content: self.answer.clone(),
            },
        ]
    }
}
