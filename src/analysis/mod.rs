//! Clients for the external analysis backend
//!
//! The backend transcribes uploaded audio, classifies its sentiment and
//! generates post-call summaries. This module only speaks to it; the
//! engine itself is an external collaborator.

mod client;
mod types;

pub use client::{AnalysisApi, HttpAnalysisClient};
pub use types::{AnalysisResponse, SummaryRequest, SummaryResponse};
