//! HTTP API server for the dashboard UI
//!
//! This module provides a REST API for driving the recorder:
//! - POST /call/record/start - Start recording
//! - POST /call/record/stop - Stop recording and finalize
//! - GET /call/status - Query session status
//! - POST /call/summary - Generate a post-call summary
//! - GET /history, /analytics, /summaries - History and analytics
//! - GET /customers/lookup, /customers/recommendations - CRM passthrough
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
