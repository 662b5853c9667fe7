pub mod analysis;
pub mod audio;
pub mod config;
pub mod crm;
pub mod history;
pub mod http;
pub mod insights;
pub mod session;

pub use analysis::{AnalysisApi, AnalysisResponse, HttpAnalysisClient, SummaryRequest, SummaryResponse};
pub use audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource, ScriptHandle,
    ScriptSource,
};
pub use config::Config;
pub use crm::{CrmApi, Customer, HttpCrmClient};
pub use history::{CallHistory, SentimentBreakdown, SummaryRecord, TranscriptRecord};
pub use http::{create_router, AppState};
pub use insights::{recommendations_for, tone_hint, Recommendation, ToneHint};
pub use session::{SessionConfig, SessionController, SessionState, SessionStats};
