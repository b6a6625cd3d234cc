//! Interview agent tools
//!
//! The voice agent joining each room reads the token metadata back from
//! the room, then persists what the candidate says through three tools:
//! - `store_user_details` - interview definition (create mode)
//! - `request_question_generation` - hand off to the question generator
//! - `save_answer` - answer transcripts (conduct mode)

mod agent;
mod generator;
mod metadata;

pub use agent::{AgentError, AgentSessionState, GenerationOutcome, InterviewAgent, StoredInterview};
pub use generator::{GenerationRequest, HttpQuestionGenerator, QuestionGenerator, GENERATE_PATH};
pub use metadata::resolve_metadata;

/// Spoken by the agent once questions are requested, before the session ends
pub const CLOSING_ANNOUNCEMENT: &str =
    "Great! I have generated your interview. You will now be redirected to begin.";
