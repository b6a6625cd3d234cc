pub mod agent;
pub mod config;
pub mod http;
pub mod launcher;
pub mod pages;
pub mod records;
pub mod token;

pub use agent::{InterviewAgent, QuestionGenerator, resolve_metadata};
pub use config::Config;
pub use http::{create_router, AppState};
pub use launcher::{
    DisconnectReason, HttpTokenClient, LauncherState, LauncherView, Navigator, RoomConnector,
    SessionLauncher, TokenFetcher,
};
pub use pages::{LauncherProps, PageOutcome, PagePaths, Pages};
pub use records::{FeedbackStore, InterviewStore, MemoryStore, User, UserDirectory};
pub use token::{room_name, CredentialRequest, Mode, SessionMetadata, TokenError, TokenIssuer};
