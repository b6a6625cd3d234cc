//! Page orchestration for the interview flows
//!
//! - `create_page` - define a new interview by voice
//! - `conduct_page` - run a previously defined interview
//! - `submit_feedback` / `feedback_page` - follow-up action and view
//!
//! Handlers here are framework independent; `http::handlers` turns a
//! `PageOutcome` into a response.

mod orchestrator;

pub use orchestrator::{
    ConductPage, CreatePage, FeedbackSubmission, LauncherProps, PageOutcome, Pages, PagePaths,
};
