use crate::pages::{PagePaths, Pages};
use crate::records::{FeedbackStore, InterviewStore, MemoryStore, UserDirectory};
use crate::token::TokenIssuer;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Signs LiveKit access tokens
    pub issuer: Arc<TokenIssuer>,

    /// Resolves the signed-in user
    pub users: Arc<dyn UserDirectory>,

    /// Create/conduct page orchestration
    pub pages: Pages,
}

impl AppState {
    pub fn new(
        issuer: TokenIssuer,
        users: Arc<dyn UserDirectory>,
        interviews: Arc<dyn InterviewStore>,
        feedback: Arc<dyn FeedbackStore>,
        paths: PagePaths,
    ) -> Self {
        Self {
            issuer: Arc::new(issuer),
            users,
            pages: Pages::new(interviews, feedback, paths),
        }
    }

    /// State backed by a single in-memory store
    pub fn in_memory(issuer: TokenIssuer, store: MemoryStore, paths: PagePaths) -> Self {
        let store = Arc::new(store);
        Self::new(issuer, store.clone(), store.clone(), store, paths)
    }
}
