use crate::analysis::AnalysisApi;
use crate::crm::CrmApi;
use crate::history::CallHistory;
use crate::session::SessionController;
use std::sync::Arc;

/// Shared application state for HTTP handlers
///
/// Holds the single session controller the dashboard drives, plus the
/// clients and history it shares with the handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionController>,
    pub history: Arc<CallHistory>,
    pub analysis: Arc<dyn AnalysisApi>,
    pub crm: Arc<dyn CrmApi>,
}

impl AppState {
    pub fn new(
        session: Arc<SessionController>,
        history: Arc<CallHistory>,
        analysis: Arc<dyn AnalysisApi>,
        crm: Arc<dyn CrmApi>,
    ) -> Self {
        Self {
            session,
            history,
            analysis,
            crm,
        }
    }
}
