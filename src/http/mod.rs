//! HTTP API server for the interview web application
//!
//! - POST /api/livekit/token - Issue a session token
//! - GET /interview - Create-flow page
//! - GET /interview/:id - Conduct-flow page
//! - POST /interview/:id/feedback - Record feedback for an interview
//! - GET /interview/:id/feedback - Feedback view
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
