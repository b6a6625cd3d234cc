//! Business records consumed by the page handlers and the interview agent
//!
//! The web application owns users, interviews and feedback; this crate only
//! reaches them through the collaborator traits in `store`. `MemoryStore`
//! backs the binary and the tests.

mod memory;
mod models;
mod store;

pub use memory::MemoryStore;
pub use models::{Answer, Feedback, FeedbackDraft, Interview, InterviewDraft, TranscriptEntry, User};
pub use store::{FeedbackStore, InterviewStore, StoreError, UserDirectory};
